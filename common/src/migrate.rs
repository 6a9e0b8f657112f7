//! Schema migration chain
//!
//! Schema 1 is the pre-multi-scene blob: one flat roster and vitals log with
//! firefighters keyed by a single `name`. Schema 2 is `AppState`.
//! Each hop is a pure function; `load_legacy` runs the whole chain.

use crate::types::{
    AppState, Firefighter, FirefighterId, FirefighterStatus, Scene, SceneId, Settings, TimestampMs,
    VitalsEntry,
};
use serde::Deserialize;

pub const LEGACY_SCENE_ID: &str = "legacy-scene";
pub const LEGACY_SCENE_NAME: &str = "Current Scene";

/// Schema 1 firefighter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyFirefighterV1 {
    pub id: String,
    pub name: String,
    pub unit: Option<String>,
    pub status: Option<serde_json::Value>,
}

/// Schema 1 blob
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyStateV1 {
    pub firefighters: Vec<LegacyFirefighterV1>,
    pub selected_firefighter_id: Option<String>,
    pub vitals: Vec<VitalsEntry>,
}

/// Splits a legacy single-field name. First token is the first name; the
/// rest, rejoined with single spaces, is the last name. Lossy for compound
/// first names.
pub fn split_legacy_name(name: &str) -> (String, String) {
    let mut tokens = name.split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    let last = tokens.collect::<Vec<_>>().join(" ");
    (first, last)
}

fn migrate_firefighter(legacy: LegacyFirefighterV1) -> Firefighter {
    let (first_name, last_name) = split_legacy_name(&legacy.name);
    let status = legacy
        .status
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(FirefighterStatus::parse);
    Firefighter {
        id: FirefighterId::new(legacy.id),
        first_name,
        last_name,
        unit: legacy.unit.filter(|u| !u.trim().is_empty()),
        status,
    }
}

/// Schema 1 → 2: wraps the flat roster and log into one synthetic scene.
pub fn v1_to_v2(legacy: LegacyStateV1, now_ms: TimestampMs) -> AppState {
    let firefighters: Vec<Firefighter> = legacy
        .firefighters
        .into_iter()
        .map(migrate_firefighter)
        .collect();

    let selected_firefighter_id = legacy
        .selected_firefighter_id
        .map(FirefighterId::new)
        .filter(|id| firefighters.iter().any(|f| &f.id == id));

    let scene = Scene {
        id: SceneId::new(LEGACY_SCENE_ID),
        name: LEGACY_SCENE_NAME.to_string(),
        created_at: now_ms,
        updated_at: now_ms,
        firefighters,
        selected_firefighter_id,
        vitals: legacy.vitals,
    };

    AppState {
        current_scene_id: Some(scene.id.clone()),
        scenes: vec![scene],
        settings: Settings::default(),
    }
}

/// Parses a schema 1 blob and migrates it to the current schema.
pub fn load_legacy(raw: &str, now_ms: TimestampMs) -> crate::Result<AppState> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(crate::Error::Storage("legacy blob is not an object".into()));
    }
    let legacy: LegacyStateV1 = serde_json::from_value(value)?;
    Ok(v1_to_v2(legacy, now_ms))
}
