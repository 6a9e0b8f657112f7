//! Tabular (CSV) export

use crate::error::{Error, Result};
use crate::time::format_timestamp_in;
use crate::types::{Firefighter, VitalsEntry};
use chrono::{Local, TimeZone};
use std::collections::HashMap;
use std::fmt::Display;

pub const TABLE_HEADER: [&str; 10] = [
    "time",
    "firefighter",
    "unit",
    "heartRate",
    "respRate",
    "oxygenSat",
    "bpSystolic",
    "bpDiastolic",
    "temperatureF",
    "notes",
];

const UNKNOWN_FIREFIGHTER: &str = "Unknown";

/// `120.0` → "120", `98.6` → "98.6"
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn cell(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

/// Builds the CSV using local time.
pub fn build_table(firefighters: &[Firefighter], vitals: &[VitalsEntry]) -> Result<String> {
    build_table_in(firefighters, vitals, &Local)
}

pub fn build_table_in<Tz>(
    firefighters: &[Firefighter],
    vitals: &[VitalsEntry],
    tz: &Tz,
) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let roster: HashMap<_, _> = firefighters.iter().map(|f| (&f.id, f)).collect();

    let mut rows: Vec<&VitalsEntry> = vitals.iter().collect();
    rows.sort_by_key(|e| e.timestamp);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TABLE_HEADER)?;

    for entry in rows {
        let firefighter = roster.get(&entry.firefighter_id);
        let name = firefighter
            .map(|f| f.display_name())
            .unwrap_or_else(|| UNKNOWN_FIREFIGHTER.to_string());
        let unit = firefighter
            .and_then(|f| f.unit.clone())
            .unwrap_or_default();

        writer.write_record([
            format_timestamp_in(entry.timestamp, tz),
            name,
            unit,
            cell(entry.heart_rate),
            cell(entry.resp_rate),
            cell(entry.oxygen_sat),
            cell(entry.bp_systolic),
            cell(entry.bp_diastolic),
            cell(entry.temperature_f),
            entry.notes.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(format!("CSV is not UTF-8: {}", e)))
}
