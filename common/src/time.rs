//! Timestamp helpers

use crate::types::{FirefighterId, TimestampMs, VitalsEntry};
use chrono::{Local, TimeZone, Utc};
use std::fmt::Display;

pub fn now_ms() -> TimestampMs {
    Utc::now().timestamp_millis()
}

/// "YYYY-MM-DD HH:MM:SS" in the given zone; empty when out of range.
pub fn format_timestamp_in<Tz>(ms: TimestampMs, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

pub fn format_local_timestamp(ms: TimestampMs) -> String {
    format_timestamp_in(ms, &Local)
}

/// "YYYY-MM-DD" in the given zone; empty when out of range.
pub fn format_date_in<Tz>(ms: TimestampMs, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Informational "time since last reading" text.
pub fn format_time_since(last_ms: TimestampMs, now_ms: TimestampMs) -> String {
    let elapsed_secs = (now_ms - last_ms).max(0) / 1000;
    match elapsed_secs {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{} min ago", elapsed_secs / 60),
        3600..=86_399 => {
            let hours = elapsed_secs / 3600;
            let minutes = (elapsed_secs % 3600) / 60;
            if minutes == 0 {
                format!("{} h ago", hours)
            } else {
                format!("{} h {} min ago", hours, minutes)
            }
        }
        _ => format!("{} d ago", elapsed_secs / 86_400),
    }
}

/// Most recent entry for a firefighter; later log position wins a tie.
pub fn latest_reading<'a>(
    entries: &'a [VitalsEntry],
    firefighter_id: &FirefighterId,
) -> Option<&'a VitalsEntry> {
    entries
        .iter()
        .filter(|e| &e.firefighter_id == firefighter_id)
        .max_by_key(|e| e.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryId;

    #[test]
    fn test_format_timestamp_utc() {
        assert_eq!(format_timestamp_in(0, &Utc), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp_in(1_700_000_000_000, &Utc), "2023-11-14 22:13:20");
        assert_eq!(format_date_in(1_700_000_000_000, &Utc), "2023-11-14");
    }

    #[test]
    fn test_format_time_since() {
        assert_eq!(format_time_since(0, 30_000), "just now");
        assert_eq!(format_time_since(0, 5 * 60_000), "5 min ago");
        assert_eq!(format_time_since(0, 2 * 3_600_000), "2 h ago");
        assert_eq!(format_time_since(0, 2 * 3_600_000 + 15 * 60_000), "2 h 15 min ago");
        assert_eq!(format_time_since(0, 3 * 86_400_000), "3 d ago");
        assert_eq!(format_time_since(10_000, 0), "just now");
    }

    #[test]
    fn test_latest_reading() {
        let f1 = FirefighterId::new("f1");
        let entries = vec![
            VitalsEntry { id: EntryId::new("a"), firefighter_id: f1.clone(), timestamp: 300, ..Default::default() },
            VitalsEntry { id: EntryId::new("b"), firefighter_id: FirefighterId::new("f2"), timestamp: 900, ..Default::default() },
            VitalsEntry { id: EntryId::new("c"), firefighter_id: f1.clone(), timestamp: 100, ..Default::default() },
        ];
        assert_eq!(latest_reading(&entries, &f1).map(|e| e.id.as_str()), Some("a"));
        assert!(latest_reading(&entries, &FirefighterId::new("none")).is_none());
    }
}
