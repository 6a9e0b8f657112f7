//! Trend series extraction
//!
//! Builds sparse (time, value) sequences for charting. Entries lacking the
//! metric are skipped; ordering is ascending by timestamp and stable on ties.
//! Nothing is cached between calls.

use crate::types::{FirefighterId, TimestampMs, VitalsEntry};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    HeartRate,
    RespRate,
    OxygenSat,
    BloodPressure,
    TemperatureF,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::HeartRate,
        Metric::RespRate,
        Metric::OxygenSat,
        Metric::BloodPressure,
        Metric::TemperatureF,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::HeartRate => "heartRate",
            Self::RespRate => "respRate",
            Self::OxygenSat => "oxygenSat",
            Self::BloodPressure => "bloodPressure",
            Self::TemperatureF => "temperatureF",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::HeartRate => "bpm",
            Self::RespRate => "/min",
            Self::OxygenSat => "%",
            Self::BloodPressure => "mmHg",
            Self::TemperatureF => "°F",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::validation(format!("Unknown metric: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: TimestampMs,
    pub value: f64,
}

/// Output of `build_series`
#[derive(Debug, Clone, PartialEq)]
pub enum TrendSeries {
    Single(Vec<SeriesPoint>),
    /// Systolic and diastolic are filtered independently.
    BloodPressure {
        systolic: Vec<SeriesPoint>,
        diastolic: Vec<SeriesPoint>,
    },
}

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(points) => points.is_empty(),
            Self::BloodPressure { systolic, diastolic } => {
                systolic.is_empty() && diastolic.is_empty()
            }
        }
    }

    /// Points of a single-valued series; empty for blood pressure.
    pub fn points(&self) -> &[SeriesPoint] {
        match self {
            Self::Single(points) => points,
            Self::BloodPressure { .. } => &[],
        }
    }
}

fn extract<F>(entries: &[VitalsEntry], field: F) -> Vec<SeriesPoint>
where
    F: Fn(&VitalsEntry) -> Option<f64>,
{
    let mut points: Vec<SeriesPoint> = entries
        .iter()
        .filter_map(|e| {
            field(e).map(|value| SeriesPoint {
                timestamp: e.timestamp,
                value,
            })
        })
        .collect();
    // sort_by_key is stable
    points.sort_by_key(|p| p.timestamp);
    points
}

pub fn build_series(entries: &[VitalsEntry], metric: Metric) -> TrendSeries {
    match metric {
        Metric::HeartRate => TrendSeries::Single(extract(entries, |e| e.heart_rate)),
        Metric::RespRate => TrendSeries::Single(extract(entries, |e| e.resp_rate)),
        Metric::OxygenSat => TrendSeries::Single(extract(entries, |e| e.oxygen_sat)),
        Metric::TemperatureF => TrendSeries::Single(extract(entries, |e| e.temperature_f)),
        Metric::BloodPressure => TrendSeries::BloodPressure {
            systolic: extract(entries, |e| e.bp_systolic),
            diastolic: extract(entries, |e| e.bp_diastolic),
        },
    }
}

/// `build_series` restricted to one firefighter's entries.
pub fn series_for_firefighter(
    entries: &[VitalsEntry],
    firefighter_id: &FirefighterId,
    metric: Metric,
) -> TrendSeries {
    let own: Vec<VitalsEntry> = entries
        .iter()
        .filter(|e| &e.firefighter_id == firefighter_id)
        .cloned()
        .collect();
    build_series(&own, metric)
}
