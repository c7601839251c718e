use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PinRequest {
    pub pin: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TriggerRequest {
    pub reason: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PeopleRequest {
    pub delta: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TimerSetRequest {
    pub seconds: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TimerAddConfigRequest {
    pub n_seconds: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RgbRequest {
    pub on: bool,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
