//! Scene state data model
//!
//! Shared by the store, the derived views and the export builders:
//! - AppState: every scene plus the active-scene pointer and settings
//! - Scene: one incident's roster, vitals log and selection
//! - VitalsEntry: one append-only, partially filled set of readings

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(SceneId);
typed_id!(FirefighterId);
typed_id!(EntryId);

/// Epoch milliseconds.
pub type TimestampMs = i64;

/// Whole application state, persisted as one blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub current_scene_id: Option<SceneId>,
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub settings: Settings,
}

impl AppState {
    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| &s.id == id)
    }

    pub fn scene_mut(&mut self, id: &SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| &s.id == id)
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current_scene_id.as_ref().and_then(|id| self.scene(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    pub created_at: TimestampMs,
    pub updated_at: TimestampMs,
    #[serde(default)]
    pub firefighters: Vec<Firefighter>,
    #[serde(default)]
    pub selected_firefighter_id: Option<FirefighterId>,
    #[serde(default)]
    pub vitals: Vec<VitalsEntry>,
}

impl Scene {
    pub fn new(id: SceneId, name: impl Into<String>, now_ms: TimestampMs) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: now_ms,
            updated_at: now_ms,
            firefighters: Vec::new(),
            selected_firefighter_id: None,
            vitals: Vec::new(),
        }
    }

    pub fn firefighter(&self, id: &FirefighterId) -> Option<&Firefighter> {
        self.firefighters.iter().find(|f| &f.id == id)
    }

    pub fn selected_firefighter(&self) -> Option<&Firefighter> {
        self.selected_firefighter_id
            .as_ref()
            .and_then(|id| self.firefighter(id))
    }

    /// Entries recorded for one firefighter, in log order.
    pub fn vitals_for<'a>(
        &'a self,
        id: &'a FirefighterId,
    ) -> impl Iterator<Item = &'a VitalsEntry> + 'a {
        self.vitals.iter().filter(move |v| &v.firefighter_id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirefighterStatus {
    OnDuty,
    Rehab,
    Transport,
}

impl FirefighterStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "onDuty" => Some(Self::OnDuty),
            "rehab" => Some(Self::Rehab),
            "transport" => Some(Self::Transport),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OnDuty => "On duty",
            Self::Rehab => "Rehab",
            Self::Transport => "Transport",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firefighter {
    pub id: FirefighterId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub unit: Option<String>,
    /// Unknown values are dropped on load instead of failing the whole blob.
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<FirefighterStatus>,
}

impl Firefighter {
    /// "Last, First", without a stray separator when one part is empty.
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }
}

pub fn display_name(first_name: &str, last_name: &str) -> String {
    let first = first_name.trim();
    let last = last_name.trim();
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{}, {}", last, first),
        (true, false) => last.to_string(),
        (false, true) => first.to_string(),
        (true, true) => String::new(),
    }
}

/// One timestamped set of readings. Never edited after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsEntry {
    pub id: EntryId,
    pub firefighter_id: FirefighterId,
    pub timestamp: TimestampMs,
    #[serde(default, deserialize_with = "lenient_number")]
    pub heart_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub resp_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub oxygen_sat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bp_systolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bp_diastolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temperature_f: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Default for EntryId {
    fn default() -> Self {
        Self(String::new())
    }
}

impl Default for FirefighterId {
    fn default() -> Self {
        Self(String::new())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub thresholds: Thresholds,
}

/// Alert bounds. Every bound is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    pub hr_high: f64,
    pub hr_low: f64,
    pub rr_high: f64,
    pub rr_low: f64,
    pub spo2_low: f64,
    pub bp_sys_high: f64,
    pub bp_sys_low: f64,
    pub bp_dia_high: f64,
    pub bp_dia_low: f64,
    pub temp_high_f: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            hr_high: 100.0,
            hr_low: 50.0,
            rr_high: 24.0,
            rr_low: 10.0,
            spo2_low: 92.0,
            bp_sys_high: 160.0,
            bp_sys_low: 90.0,
            bp_dia_high: 100.0,
            bp_dia_low: 60.0,
            temp_high_f: 100.4,
        }
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<FirefighterStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(FirefighterStatus::parse))
}

/// Accepts numbers, numeric strings and blank-string sentinels.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let value = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => crate::input::parse_optional_number(&s),
        _ => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}
