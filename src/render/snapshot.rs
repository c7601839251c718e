use crate::api::models::snapshot::Snapshot;
use crate::format::{fmt_bool, fmt_rgb, fmt_timer, fmt_ts, PLACEHOLDER};
use crate::render::devices::{device_rows, DeviceRow};

/// Every fixed display field plus the device rows, fully formatted. A pure
/// projection of one snapshot; drawing it twice gives identical output.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub armed: String,
    pub alarm: String,
    pub reason: String,
    pub people: String,
    pub timer: String,
    pub rgb: String,
    pub updated: String,
    pub add_seconds: String,
    pub devices: Vec<DeviceRow>,
    /// Wall time of the successful refresh that produced this view, stamped
    /// by the poll loop; `None` renders as "never".
    pub last_ok: Option<String>,
}

pub struct RenderOutcome {
    pub view: DashboardView,
    /// Set only on the alarm false→true edge, carrying the reason.
    pub alarm_notice: Option<String>,
}

pub fn project(snapshot: &Snapshot) -> DashboardView {
    DashboardView {
        armed: fmt_bool(snapshot.armed).to_string(),
        alarm: fmt_bool(snapshot.alarm).to_string(),
        reason: snapshot
            .last_alarm_reason
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        people: snapshot.people_count.to_string(),
        timer: fmt_timer(snapshot.timer.as_ref()),
        rgb: fmt_rgb(snapshot.rgb.as_ref()),
        updated: fmt_ts(snapshot.last_update_ts),
        add_seconds: snapshot
            .timer
            .as_ref()
            .map(|t| t.add_n_seconds.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        devices: device_rows(&snapshot.devices),
        last_ok: None,
    }
}

/// Owns the only state that outlives a single render: the previous alarm
/// flag (for edge detection) and the last applied sequence number (stale
/// responses are discarded instead of overwriting newer state).
pub struct Presenter {
    last_alarm: bool,
    last_applied_seq: u64,
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            last_alarm: false,
            last_applied_seq: 0,
        }
    }

    /// Apply a fetched snapshot stamped with its request sequence number
    /// (first stamp is 1). Returns `None` for a response older than the
    /// last applied one.
    ///
    /// The alarm notice fires only on the false→true transition relative to
    /// the previously applied snapshot; the flag starts false but is updated
    /// on every apply, so a dashboard that starts with the alarm already on
    /// only notifies for a later transition.
    pub fn apply(&mut self, seq: u64, snapshot: &Snapshot) -> Option<RenderOutcome> {
        if seq <= self.last_applied_seq {
            return None;
        }
        let first_render = self.last_applied_seq == 0;
        self.last_applied_seq = seq;

        let alarm_notice = if !first_render && !self.last_alarm && snapshot.alarm {
            Some(
                snapshot
                    .last_alarm_reason
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        } else {
            None
        };
        self.last_alarm = snapshot.alarm;

        Some(RenderOutcome {
            view: project(snapshot),
            alarm_notice,
        })
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
