//! Threshold alerting
//!
//! `evaluate` flags each physiological category whose reading falls outside
//! the caller's thresholds. Bounds are exclusive, and an absent reading never
//! produces a tag.

use crate::types::{Thresholds, VitalsEntry};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertTag {
    HeartRate,
    RespRate,
    OxygenSat,
    BloodPressure,
    Temperature,
}

impl AlertTag {
    pub const ALL: [AlertTag; 5] = [
        AlertTag::HeartRate,
        AlertTag::RespRate,
        AlertTag::OxygenSat,
        AlertTag::BloodPressure,
        AlertTag::Temperature,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::HeartRate => 1 << 0,
            Self::RespRate => 1 << 1,
            Self::OxygenSat => 1 << 2,
            Self::BloodPressure => 1 << 3,
            Self::Temperature => 1 << 4,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::HeartRate => "heartRate",
            Self::RespRate => "respRate",
            Self::OxygenSat => "oxygenSat",
            Self::BloodPressure => "bloodPressure",
            Self::Temperature => "temperature",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Self::HeartRate => "HR",
            Self::RespRate => "RR",
            Self::OxygenSat => "SpO2",
            Self::BloodPressure => "BP",
            Self::Temperature => "Temp",
        }
    }
}

impl fmt::Display for AlertTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fixed-size set of alert tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AlertSet(u8);

impl AlertSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, tag: AlertTag) {
        self.0 |= tag.bit();
    }

    pub fn contains(self, tag: AlertTag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Tags in declaration order.
    pub fn iter(self) -> impl Iterator<Item = AlertTag> {
        AlertTag::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl FromIterator<AlertTag> for AlertSet {
    fn from_iter<I: IntoIterator<Item = AlertTag>>(iter: I) -> Self {
        let mut set = Self::empty();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl fmt::Display for AlertSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.iter().map(AlertTag::short_label).collect();
        f.write_str(&labels.join(", "))
    }
}

fn outside(value: Option<f64>, low: f64, high: f64) -> bool {
    value.is_some_and(|v| v > high || v < low)
}

/// Evaluates one entry against the supplied thresholds.
pub fn evaluate(entry: &VitalsEntry, thresholds: &Thresholds) -> AlertSet {
    let mut tags = AlertSet::empty();

    if outside(entry.heart_rate, thresholds.hr_low, thresholds.hr_high) {
        tags.insert(AlertTag::HeartRate);
    }
    if outside(entry.resp_rate, thresholds.rr_low, thresholds.rr_high) {
        tags.insert(AlertTag::RespRate);
    }
    if entry.oxygen_sat.is_some_and(|v| v < thresholds.spo2_low) {
        tags.insert(AlertTag::OxygenSat);
    }
    if entry.temperature_f.is_some_and(|v| v > thresholds.temp_high_f) {
        tags.insert(AlertTag::Temperature);
    }
    if outside(entry.bp_systolic, thresholds.bp_sys_low, thresholds.bp_sys_high)
        || outside(entry.bp_diastolic, thresholds.bp_dia_low, thresholds.bp_dia_high)
    {
        tags.insert(AlertTag::BloodPressure);
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> VitalsEntry {
        VitalsEntry::default()
    }

    #[test]
    fn test_absent_fields_never_flag() {
        let thresholds = Thresholds::default();
        assert!(evaluate(&entry(), &thresholds).is_empty());

        let strict = Thresholds {
            hr_high: -1.0,
            hr_low: 1000.0,
            spo2_low: 1000.0,
            temp_high_f: -1000.0,
            ..Thresholds::default()
        };
        assert!(evaluate(&entry(), &strict).is_empty());
    }

    #[test]
    fn test_heart_rate_bounds_exclusive() {
        let thresholds = Thresholds::default();
        let check = |hr: f64| {
            let e = VitalsEntry { heart_rate: Some(hr), ..entry() };
            evaluate(&e, &thresholds).contains(AlertTag::HeartRate)
        };
        assert!(!check(100.0));
        assert!(check(101.0));
        assert!(!check(50.0));
        assert!(check(49.0));
    }

    #[test]
    fn test_resp_rate_bounds() {
        let thresholds = Thresholds::default();
        let check = |rr: f64| {
            let e = VitalsEntry { resp_rate: Some(rr), ..entry() };
            evaluate(&e, &thresholds).contains(AlertTag::RespRate)
        };
        assert!(!check(24.0));
        assert!(check(25.0));
        assert!(!check(10.0));
        assert!(check(9.0));
    }

    #[test]
    fn test_oxygen_low_only() {
        let thresholds = Thresholds::default();
        let check = |spo2: f64| {
            let e = VitalsEntry { oxygen_sat: Some(spo2), ..entry() };
            evaluate(&e, &thresholds).contains(AlertTag::OxygenSat)
        };
        assert!(!check(92.0));
        assert!(check(91.0));
        assert!(!check(100.0));
        assert!(!check(250.0));
    }

    #[test]
    fn test_temperature_high_only() {
        let thresholds = Thresholds::default();
        let check = |t: f64| {
            let e = VitalsEntry { temperature_f: Some(t), ..entry() };
            evaluate(&e, &thresholds).contains(AlertTag::Temperature)
        };
        assert!(!check(100.4));
        assert!(check(100.5));
        assert!(!check(90.0));
    }

    #[test]
    fn test_blood_pressure_either_side_combined() {
        let thresholds = Thresholds::default();

        let sys_only = VitalsEntry { bp_systolic: Some(170.0), ..entry() };
        let dia_only = VitalsEntry { bp_diastolic: Some(55.0), ..entry() };
        let normal = VitalsEntry {
            bp_systolic: Some(160.0),
            bp_diastolic: Some(60.0),
            ..entry()
        };

        assert_eq!(evaluate(&sys_only, &thresholds).iter().collect::<Vec<_>>(), vec![AlertTag::BloodPressure]);
        assert_eq!(evaluate(&dia_only, &thresholds).iter().collect::<Vec<_>>(), vec![AlertTag::BloodPressure]);
        assert!(evaluate(&normal, &thresholds).is_empty());
    }

    #[test]
    fn test_uses_caller_thresholds() {
        let e = VitalsEntry { heart_rate: Some(90.0), ..entry() };
        assert!(evaluate(&e, &Thresholds::default()).is_empty());

        let tight = Thresholds { hr_high: 85.0, ..Thresholds::default() };
        assert!(evaluate(&e, &tight).contains(AlertTag::HeartRate));
    }

    #[test]
    fn test_alert_set_display_and_len() {
        let set: AlertSet = [AlertTag::Temperature, AlertTag::HeartRate].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "HR, Temp");
        assert!(!set.contains(AlertTag::OxygenSat));
    }
}
