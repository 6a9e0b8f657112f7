//! Form-to-entry boundary
//!
//! Everything typed into a form arrives as text. Blank-means-absent is decided
//! here, once; the store and the derived views only ever see `Option<f64>`.

use crate::types::TimestampMs;

/// Parses one numeric form field. Blank, unparseable and non-finite input is absent.
pub fn parse_optional_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Vitals readings as typed by the user
#[derive(Debug, Clone, Default)]
pub struct VitalsForm {
    pub heart_rate: String,
    pub resp_rate: String,
    pub oxygen_sat: String,
    pub bp_systolic: String,
    pub bp_diastolic: String,
    pub temperature_f: String,
    pub notes: String,
}

/// Parsed readings, ready for `Transition::append_vitals`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VitalsInput {
    pub timestamp: Option<TimestampMs>,
    pub heart_rate: Option<f64>,
    pub resp_rate: Option<f64>,
    pub oxygen_sat: Option<f64>,
    pub bp_systolic: Option<f64>,
    pub bp_diastolic: Option<f64>,
    pub temperature_f: Option<f64>,
    pub notes: Option<String>,
}

impl VitalsInput {
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none()
            && self.resp_rate.is_none()
            && self.oxygen_sat.is_none()
            && self.bp_systolic.is_none()
            && self.bp_diastolic.is_none()
            && self.temperature_f.is_none()
            && self.notes.is_none()
    }
}

impl From<&VitalsForm> for VitalsInput {
    fn from(form: &VitalsForm) -> Self {
        Self {
            timestamp: None,
            heart_rate: parse_optional_number(&form.heart_rate),
            resp_rate: parse_optional_number(&form.resp_rate),
            oxygen_sat: parse_optional_number(&form.oxygen_sat),
            bp_systolic: parse_optional_number(&form.bp_systolic),
            bp_diastolic: parse_optional_number(&form.bp_diastolic),
            temperature_f: parse_optional_number(&form.temperature_f),
            notes: parse_optional_text(&form.notes),
        }
    }
}

/// Firefighter fields as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FirefighterInput {
    pub first_name: String,
    pub last_name: String,
    pub unit: Option<String>,
    pub status: Option<crate::types::FirefighterStatus>,
}

impl FirefighterInput {
    /// Trims every field; a blank unit is absent.
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            unit: self.unit.as_deref().and_then(parse_optional_text),
            status: self.status,
        }
    }

    pub fn has_name(&self) -> bool {
        !self.first_name.trim().is_empty() || !self.last_name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_number() {
        assert_eq!(parse_optional_number("72"), Some(72.0));
        assert_eq!(parse_optional_number(" 98.6 "), Some(98.6));
        assert_eq!(parse_optional_number(""), None);
        assert_eq!(parse_optional_number("   "), None);
        assert_eq!(parse_optional_number("abc"), None);
        assert_eq!(parse_optional_number("NaN"), None);
        assert_eq!(parse_optional_number("inf"), None);
    }

    #[test]
    fn test_zero_is_a_reading() {
        assert_eq!(parse_optional_number("0"), Some(0.0));
    }

    #[test]
    fn test_form_to_input() {
        let form = VitalsForm {
            heart_rate: "110".into(),
            oxygen_sat: "x".into(),
            notes: "  dizzy  ".into(),
            ..Default::default()
        };
        let input = VitalsInput::from(&form);
        assert_eq!(input.heart_rate, Some(110.0));
        assert_eq!(input.oxygen_sat, None);
        assert_eq!(input.notes.as_deref(), Some("dizzy"));
        assert!(!input.is_empty());

        assert!(VitalsInput::from(&VitalsForm::default()).is_empty());
    }

    #[test]
    fn test_firefighter_input_normalized() {
        let input = FirefighterInput {
            first_name: " Jane ".into(),
            last_name: "".into(),
            unit: Some("  ".into()),
            status: None,
        };
        let normalized = input.normalized();
        assert_eq!(normalized.first_name, "Jane");
        assert_eq!(normalized.unit, None);
        assert!(normalized.has_name());
        assert!(!FirefighterInput::default().has_name());
    }
}
