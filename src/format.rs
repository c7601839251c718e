//! Pure display formatters. Conversion failures degrade to a `"-"`
//! placeholder and never propagate.

use crate::api::models::snapshot::{RgbState, TimerState};
use chrono::{Local, LocalResult, TimeZone};

pub const PLACEHOLDER: &str = "-";

pub fn fmt_bool(v: bool) -> &'static str {
    if v {
        "ON"
    } else {
        "OFF"
    }
}

/// Unix seconds as a local date-time, `"-"` when out of range.
pub fn fmt_ts(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0) {
        LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Unix seconds as a local time-of-day, for device rows.
pub fn fmt_time_of_day(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0) {
        LocalResult::Single(dt) => dt.format("%H:%M:%S").to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn fmt_rgb(rgb: Option<&RgbState>) -> String {
    match rgb {
        None => PLACEHOLDER.to_string(),
        Some(rgb) => format!("{} ({},{},{})", fmt_bool(rgb.on), rgb.r, rgb.g, rgb.b),
    }
}

/// `running` and `finished` are appended independently; inconsistent source
/// data may show both.
pub fn fmt_timer(timer: Option<&TimerState>) -> String {
    match timer {
        None => PLACEHOLDER.to_string(),
        Some(t) => {
            let mut s = format!("{}s", t.seconds_left);
            if t.running {
                s.push_str(" (running)");
            }
            if t.finished {
                s.push_str(" (finished)");
            }
            s
        }
    }
}

/// `#RRGGBB` (case-insensitive, leading `#` optional) to a color triple.
/// `None` means "undefined color"; callers pick their own fallback.
pub fn parse_hex_color(input: &str) -> Option<(u8, u8, u8)> {
    let h = input.trim().trim_start_matches('#');
    if h.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bools() {
        assert_eq!(fmt_bool(true), "ON");
        assert_eq!(fmt_bool(false), "OFF");
    }

    #[test]
    fn timestamp_out_of_range_degrades_to_placeholder() {
        assert_eq!(fmt_ts(i64::MAX), "-");
        assert_eq!(fmt_time_of_day(i64::MIN), "-");
    }

    #[test]
    fn timestamp_in_range_formats() {
        assert_ne!(fmt_ts(1_700_000_000), "-");
        assert_ne!(fmt_time_of_day(1_700_000_000), "-");
    }

    #[test]
    fn rgb_formatting() {
        assert_eq!(fmt_rgb(None), "-");
        let rgb = RgbState { on: true, r: 255, g: 0, b: 16 };
        assert_eq!(fmt_rgb(Some(&rgb)), "ON (255,0,16)");
        let off = RgbState { on: false, r: 1, g: 2, b: 3 };
        assert_eq!(fmt_rgb(Some(&off)), "OFF (1,2,3)");
    }

    #[test]
    fn timer_formatting() {
        assert_eq!(fmt_timer(None), "-");
        let t = TimerState { seconds_left: 30, running: true, finished: false, add_n_seconds: 5 };
        assert_eq!(fmt_timer(Some(&t)), "30s (running)");
        let both = TimerState { seconds_left: 0, running: true, finished: true, add_n_seconds: 5 };
        assert_eq!(fmt_timer(Some(&both)), "0s (running) (finished)");
        let idle = TimerState { seconds_left: 12, running: false, finished: false, add_n_seconds: 5 };
        assert_eq!(fmt_timer(Some(&idle)), "12s");
    }

    #[test]
    fn hex_color_parsing() {
        assert_eq!(parse_hex_color("#ff0010"), Some((255, 0, 16)));
        assert_eq!(parse_hex_color("FF0010"), Some((255, 0, 16)));
        assert_eq!(parse_hex_color("#AbCdEf"), Some((171, 205, 239)));
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }
}
