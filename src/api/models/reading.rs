use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in the open-ended sensor map: display name (falls back to the
/// map key), reading time, and an untyped value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DeviceReading {
    #[serde(default)]
    pub device: Option<String>,
    pub timestamp: i64,
    pub value: ReadingValue,
}

/// A reading's value has no per-code schema: it is either a single scalar or
/// a flat key→scalar record. Resolved once at deserialization time so the
/// renderer is total over both shapes. `Composite` must come first so
/// objects do not fall through to the catch-all scalar arm.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ReadingValue {
    Composite(serde_json::Map<String, Value>),
    Scalar(Value),
}
