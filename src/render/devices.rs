use crate::api::models::reading::{DeviceReading, ReadingValue};
use crate::format::fmt_time_of_day;
use serde_json::Value;
use std::collections::BTreeMap;

pub const WAITING_FOR_DATA: &str = "Waiting for data...";

/// One rendered device line: name plus code, reading time-of-day, value text.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub name: String,
    pub timestamp: String,
    pub value: String,
}

impl DeviceRow {
    fn placeholder() -> Self {
        Self {
            name: WAITING_FOR_DATA.to_string(),
            timestamp: String::new(),
            value: String::new(),
        }
    }
}

/// Project the open device map into rows. `BTreeMap` iteration gives the
/// lexicographic code order; an empty map yields exactly one placeholder row.
pub fn device_rows(devices: &BTreeMap<String, DeviceReading>) -> Vec<DeviceRow> {
    if devices.is_empty() {
        return vec![DeviceRow::placeholder()];
    }

    devices
        .iter()
        .map(|(code, reading)| DeviceRow {
            name: format!("{} ({})", reading.device.as_deref().unwrap_or(code), code),
            timestamp: fmt_time_of_day(reading.timestamp),
            value: value_text(&reading.value),
        })
        .collect()
}

/// Composite records join `key:value` pairs in source key order with bare
/// value text; scalars keep their JSON form (strings stay quoted), matching
/// the service's own representation.
pub fn value_text(value: &ReadingValue) -> String {
    match value {
        ReadingValue::Composite(map) => map
            .iter()
            .map(|(k, v)| format!("{}:{}", k, bare_text(v)))
            .collect::<Vec<_>>()
            .join(", "),
        ReadingValue::Scalar(v) => v.to_string(),
    }
}

fn bare_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
