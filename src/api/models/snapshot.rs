use crate::api::models::reading::DeviceReading;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One complete state payload from `GET /api/state`. Discarded after
/// rendering; no history is kept client-side.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub armed: bool,
    pub alarm: bool,
    #[serde(default)]
    pub last_alarm_reason: Option<String>,
    /// May go negative; the service owns any clamping.
    #[serde(default)]
    pub people_count: i64,
    #[serde(default)]
    pub timer: Option<TimerState>,
    #[serde(default)]
    pub rgb: Option<RgbState>,
    #[serde(default)]
    pub last_update_ts: i64,
    /// Open-ended sensor map, keyed by device code.
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceReading>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimerState {
    #[serde(default)]
    pub seconds_left: i64,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub add_n_seconds: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RgbState {
    pub on: bool,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
