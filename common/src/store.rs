//! Scene state store
//!
//! One owned `AppState`, loaded once at `init`, changed only through
//! `dispatch`. Every transition is computed by the pure `apply`, written
//! through to storage, then committed in memory, so the persisted blob always
//! matches the last completed transition.

use crate::error::{Error, Result};
use crate::input::{FirefighterInput, VitalsInput};
use crate::migrate;
use crate::storage::{KeyValueStore, CURRENT_KEY, LEGACY_KEY};
use crate::time::now_ms;
use crate::types::{
    AppState, EntryId, Firefighter, FirefighterId, Scene, SceneId, Theme, Thresholds, TimestampMs,
    VitalsEntry,
};
use tracing::{debug, info, warn};

pub const DEFAULT_SCENE_NAME: &str = "Untitled Scene";

/// A single user intent against the state
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    CreateScene { id: SceneId, name: String },
    RenameScene { id: SceneId, name: String },
    SwitchScene(SceneId),
    /// Destructive; confirm before dispatching.
    DeleteScene(SceneId),
    /// Destructive; empties the active scene's roster, log and selection.
    ClearActiveScene,
    AddFirefighter { id: FirefighterId, input: FirefighterInput },
    UpdateFirefighter { id: FirefighterId, input: FirefighterInput },
    /// Destructive; cascades to that firefighter's vitals.
    RemoveFirefighter(FirefighterId),
    SelectFirefighter(Option<FirefighterId>),
    AppendVitals { id: EntryId, firefighter_id: FirefighterId, input: VitalsInput },
    SetTheme(Theme),
    SetThresholds(Thresholds),
    ResetThresholds,
}

impl Transition {
    pub fn create_scene(name: impl Into<String>) -> Self {
        Self::CreateScene { id: SceneId::generate(), name: name.into() }
    }

    pub fn add_firefighter(input: FirefighterInput) -> Self {
        Self::AddFirefighter { id: FirefighterId::generate(), input }
    }

    pub fn append_vitals(firefighter_id: FirefighterId, input: VitalsInput) -> Self {
        Self::AppendVitals { id: EntryId::generate(), firefighter_id, input }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::CreateScene { .. } => "create_scene",
            Self::RenameScene { .. } => "rename_scene",
            Self::SwitchScene(_) => "switch_scene",
            Self::DeleteScene(_) => "delete_scene",
            Self::ClearActiveScene => "clear_active_scene",
            Self::AddFirefighter { .. } => "add_firefighter",
            Self::UpdateFirefighter { .. } => "update_firefighter",
            Self::RemoveFirefighter(_) => "remove_firefighter",
            Self::SelectFirefighter(_) => "select_firefighter",
            Self::AppendVitals { .. } => "append_vitals",
            Self::SetTheme(_) => "set_theme",
            Self::SetThresholds(_) => "set_thresholds",
            Self::ResetThresholds => "reset_thresholds",
        }
    }
}

fn scene_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_SCENE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn validated_firefighter(input: &FirefighterInput) -> Result<FirefighterInput> {
    let input = input.normalized();
    if !input.has_name() {
        return Err(Error::validation("Enter a first or last name."));
    }
    Ok(input)
}

fn active_scene_mut(state: &mut AppState) -> Result<&mut Scene> {
    let id = state.current_scene_id.clone().ok_or(Error::NoActiveScene)?;
    state
        .scene_mut(&id)
        .ok_or_else(|| Error::UnknownScene(id.to_string()))
}

/// Computes the next state. Never touches storage.
pub fn apply(state: &AppState, transition: Transition, now: TimestampMs) -> Result<AppState> {
    let mut next = state.clone();

    match transition {
        Transition::CreateScene { id, name } => {
            next.scenes.push(Scene::new(id.clone(), scene_name(&name), now));
            next.current_scene_id = Some(id);
        }
        Transition::RenameScene { id, name } => {
            let scene = next
                .scene_mut(&id)
                .ok_or_else(|| Error::UnknownScene(id.to_string()))?;
            scene.name = scene_name(&name);
            scene.updated_at = now;
        }
        Transition::SwitchScene(id) => {
            if next.scene(&id).is_none() {
                return Err(Error::UnknownScene(id.to_string()));
            }
            next.current_scene_id = Some(id);
        }
        Transition::DeleteScene(id) => {
            let before = next.scenes.len();
            next.scenes.retain(|s| s.id != id);
            if next.scenes.len() == before {
                return Err(Error::UnknownScene(id.to_string()));
            }
            if next.current_scene_id.as_ref() == Some(&id) {
                next.current_scene_id = next.scenes.first().map(|s| s.id.clone());
            }
        }
        Transition::ClearActiveScene => {
            let scene = active_scene_mut(&mut next)?;
            scene.firefighters.clear();
            scene.vitals.clear();
            scene.selected_firefighter_id = None;
            scene.updated_at = now;
        }
        Transition::AddFirefighter { id, input } => {
            let input = validated_firefighter(&input)?;
            let scene = active_scene_mut(&mut next)?;
            if scene.firefighter(&id).is_some() {
                return Err(Error::validation(format!("Duplicate firefighter id: {}", id)));
            }
            scene.firefighters.push(Firefighter {
                id,
                first_name: input.first_name,
                last_name: input.last_name,
                unit: input.unit,
                status: input.status,
            });
            scene.updated_at = now;
        }
        Transition::UpdateFirefighter { id, input } => {
            let input = validated_firefighter(&input)?;
            let scene = active_scene_mut(&mut next)?;
            let firefighter = scene
                .firefighters
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| Error::UnknownFirefighter(id.to_string()))?;
            firefighter.first_name = input.first_name;
            firefighter.last_name = input.last_name;
            firefighter.unit = input.unit;
            firefighter.status = input.status;
            scene.updated_at = now;
        }
        Transition::RemoveFirefighter(id) => {
            let scene = active_scene_mut(&mut next)?;
            if scene.firefighter(&id).is_none() {
                return Err(Error::UnknownFirefighter(id.to_string()));
            }
            scene.firefighters.retain(|f| f.id != id);
            scene.vitals.retain(|v| v.firefighter_id != id);
            if scene.selected_firefighter_id.as_ref() == Some(&id) {
                scene.selected_firefighter_id = scene.firefighters.first().map(|f| f.id.clone());
            }
            scene.updated_at = now;
        }
        Transition::SelectFirefighter(id) => {
            let scene = active_scene_mut(&mut next)?;
            if let Some(id) = &id {
                if scene.firefighter(id).is_none() {
                    return Err(Error::UnknownFirefighter(id.to_string()));
                }
            }
            scene.selected_firefighter_id = id;
            scene.updated_at = now;
        }
        Transition::AppendVitals { id, firefighter_id, input } => {
            if input.is_empty() {
                return Err(Error::validation("Enter at least one reading or a note."));
            }
            let scene = active_scene_mut(&mut next)?;
            if scene.vitals.iter().any(|v| v.id == id) {
                return Err(Error::validation(format!("Duplicate entry id: {}", id)));
            }
            scene.vitals.push(VitalsEntry {
                id,
                firefighter_id,
                timestamp: input.timestamp.unwrap_or(now),
                heart_rate: input.heart_rate,
                resp_rate: input.resp_rate,
                oxygen_sat: input.oxygen_sat,
                bp_systolic: input.bp_systolic,
                bp_diastolic: input.bp_diastolic,
                temperature_f: input.temperature_f,
                notes: input.notes,
            });
            scene.updated_at = now;
        }
        Transition::SetTheme(theme) => next.settings.theme = theme,
        Transition::SetThresholds(thresholds) => next.settings.thresholds = thresholds,
        Transition::ResetThresholds => next.settings.thresholds = Thresholds::default(),
    }

    Ok(next)
}

/// Reads the persisted state, migrating a legacy blob at most once.
/// Never fails: anything unreadable degrades to the empty default.
pub fn load<S: KeyValueStore>(storage: &mut S) -> AppState {
    load_at(storage, now_ms())
}

pub fn load_at<S: KeyValueStore>(storage: &mut S, now: TimestampMs) -> AppState {
    match storage.get(CURRENT_KEY) {
        Ok(Some(raw)) => return parse_current(&raw).unwrap_or_default(),
        Ok(None) => {}
        Err(e) => {
            warn!("failed to read state: {}", e);
            return AppState::default();
        }
    }

    let legacy = match storage.get(LEGACY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AppState::default(),
        Err(e) => {
            warn!("failed to read legacy state: {}", e);
            return AppState::default();
        }
    };

    match migrate::load_legacy(&legacy, now) {
        Ok(state) => {
            info!(
                firefighters = state.scenes[0].firefighters.len(),
                vitals = state.scenes[0].vitals.len(),
                "migrated legacy state"
            );
            if let Err(e) = save(storage, &state) {
                warn!("failed to persist migrated state: {}", e);
            }
            state
        }
        Err(e) => {
            warn!("legacy state unreadable, starting empty: {}", e);
            AppState::default()
        }
    }
}

fn parse_current(raw: &str) -> Option<AppState> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("stored state is not JSON, starting empty: {}", e);
            return None;
        }
    };
    let has_shape = value
        .as_object()
        .is_some_and(|o| o.get("scenes").is_some_and(serde_json::Value::is_array));
    if !has_shape {
        warn!("stored state has unexpected shape, starting empty");
        return None;
    }
    match serde_json::from_value::<AppState>(value) {
        Ok(mut state) => {
            repair_references(&mut state);
            Some(state)
        }
        Err(e) => {
            warn!("stored state failed to parse, starting empty: {}", e);
            None
        }
    }
}

/// Clears selections naming no firefighter and redirects a current scene id
/// naming no scene to the first scene.
fn repair_references(state: &mut AppState) {
    for scene in &mut state.scenes {
        let dangling = scene
            .selected_firefighter_id
            .as_ref()
            .is_some_and(|id| scene.firefighter(id).is_none());
        if dangling {
            warn!(scene = %scene.id, "clearing selection of unknown firefighter");
            scene.selected_firefighter_id = None;
        }
    }

    let current_missing = state
        .current_scene_id
        .as_ref()
        .is_some_and(|id| state.scene(id).is_none());
    if current_missing {
        warn!("current scene not found, switching to the first scene");
        state.current_scene_id = state.scenes.first().map(|s| s.id.clone());
    }
}

/// Overwrites the whole persisted blob.
pub fn save<S: KeyValueStore>(storage: &mut S, state: &AppState) -> Result<()> {
    let raw = serde_json::to_string(state)?;
    storage.set(CURRENT_KEY, &raw)
}

/// Erases both the legacy and the current blob.
pub fn clear_all<S: KeyValueStore>(storage: &mut S) -> Result<()> {
    storage.remove(LEGACY_KEY)?;
    storage.remove(CURRENT_KEY)
}

/// Owner of the application state
pub struct StateStore<S: KeyValueStore> {
    storage: S,
    state: AppState,
}

impl<S: KeyValueStore> StateStore<S> {
    /// Loads on startup.
    pub fn init(mut storage: S) -> Self {
        let state = load(&mut storage);
        debug!(scenes = state.scenes.len(), "state store initialized");
        Self { storage, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, transition: Transition) -> Result<&AppState> {
        self.dispatch_at(transition, now_ms())
    }

    pub fn dispatch_at(&mut self, transition: Transition, now: TimestampMs) -> Result<&AppState> {
        let name = transition.name();
        let next = apply(&self.state, transition, now)?;
        save(&mut self.storage, &next)?;
        self.state = next;
        debug!(transition = name, "transition applied");
        Ok(&self.state)
    }

    /// Full reset of the active scene. Other scenes are kept: the current
    /// blob is overwritten with the cleared state, then the legacy blob is
    /// dropped so it can never be migrated back in.
    pub fn reset_active_scene(&mut self) -> Result<&AppState> {
        self.reset_active_scene_at(now_ms())
    }

    pub fn reset_active_scene_at(&mut self, now: TimestampMs) -> Result<&AppState> {
        let next = apply(&self.state, Transition::ClearActiveScene, now)?;
        save(&mut self.storage, &next)?;
        // the current blob already wins over the legacy one on load
        if let Err(e) = self.storage.remove(LEGACY_KEY) {
            warn!("failed to remove legacy state: {}", e);
        }
        self.state = next;
        debug!("active scene reset");
        Ok(&self.state)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Releases the storage backend.
    pub fn teardown(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn ff(first: &str, last: &str) -> FirefighterInput {
        FirefighterInput {
            first_name: first.into(),
            last_name: last.into(),
            ..Default::default()
        }
    }

    fn hr(value: f64, ts: TimestampMs) -> VitalsInput {
        VitalsInput {
            timestamp: Some(ts),
            heart_rate: Some(value),
            ..Default::default()
        }
    }

    fn store_with_scene() -> StateStore<MemoryStore> {
        let mut store = StateStore::init(MemoryStore::new());
        store.dispatch_at(Transition::create_scene("Warehouse"), 1).unwrap();
        store
    }

    #[test]
    fn test_load_empty_storage() {
        let store = StateStore::init(MemoryStore::new());
        assert_eq!(store.state(), &AppState::default());
    }

    #[test]
    fn test_load_corrupt_current_is_default() {
        for raw in ["{oops", "[]", r#"{"scenes": 3}"#, r#"{"scenes": [{"id": 1}]}"#] {
            let mut storage = MemoryStore::new().with_entry(CURRENT_KEY, raw);
            assert_eq!(load(&mut storage), AppState::default(), "input: {}", raw);
        }
    }

    #[test]
    fn test_load_fills_missing_settings() {
        let mut storage = MemoryStore::new().with_entry(CURRENT_KEY, r#"{"scenes": []}"#);
        let state = load(&mut storage);
        assert_eq!(state.settings.thresholds, Thresholds::default());
        assert_eq!(state.current_scene_id, None);
    }

    #[test]
    fn test_load_migrates_legacy_once() {
        let legacy = r#"{"firefighters": [{"id": "f1", "name": "Jane Smith"}], "vitals": []}"#;
        let mut storage = MemoryStore::new().with_entry(LEGACY_KEY, legacy);

        let first = load_at(&mut storage, 100);
        assert!(storage.contains(CURRENT_KEY));
        assert_eq!(first.scenes[0].firefighters[0].last_name, "Smith");

        // second load reads the current key; timestamps are not re-stamped
        let second = load_at(&mut storage, 999);
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_corrupt_legacy_is_default() {
        let mut storage = MemoryStore::new().with_entry(LEGACY_KEY, "garbage");
        assert_eq!(load(&mut storage), AppState::default());
        assert!(!storage.contains(CURRENT_KEY));
    }

    #[test]
    fn test_save_load_idempotent() {
        let mut store = store_with_scene();
        store.dispatch_at(Transition::add_firefighter(ff("Jane", "Smith")), 2).unwrap();
        let id = store.state().current_scene().unwrap().firefighters[0].id.clone();
        store.dispatch_at(Transition::append_vitals(id, hr(120.0, 5)), 3).unwrap();

        let mut storage = store.teardown();
        let loaded = load(&mut storage);
        save(&mut storage, &loaded).unwrap();
        assert_eq!(load(&mut storage), loaded);
    }

    #[test]
    fn test_create_scene_becomes_active() {
        let store = store_with_scene();
        let scene = store.state().current_scene().unwrap();
        assert_eq!(scene.name, "Warehouse");
        assert_eq!(scene.created_at, 1);

        let next = apply(store.state(), Transition::create_scene("   "), 2).unwrap();
        assert_eq!(next.current_scene().unwrap().name, DEFAULT_SCENE_NAME);
    }

    #[test]
    fn test_add_firefighter_requires_name() {
        let mut store = store_with_scene();
        let before = store.state().clone();
        let err = store
            .dispatch(Transition::add_firefighter(ff("  ", "")))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_firefighter_ops_need_active_scene() {
        let state = AppState::default();
        let err = apply(&state, Transition::add_firefighter(ff("A", "B")), 0).unwrap_err();
        assert!(matches!(err, Error::NoActiveScene));
    }

    #[test]
    fn test_update_bumps_updated_at() {
        let mut store = store_with_scene();
        store.dispatch_at(Transition::add_firefighter(ff("Jane", "Smith")), 2).unwrap();
        let id = store.state().current_scene().unwrap().firefighters[0].id.clone();

        let input = FirefighterInput { unit: Some("Ladder 2".into()), ..ff("Jane", "Doe") };
        store
            .dispatch_at(Transition::UpdateFirefighter { id, input }, 7)
            .unwrap();

        let scene = store.state().current_scene().unwrap();
        assert_eq!(scene.firefighters[0].display_name(), "Doe, Jane");
        assert_eq!(scene.firefighters[0].unit.as_deref(), Some("Ladder 2"));
        assert_eq!(scene.updated_at, 7);
    }

    #[test]
    fn test_remove_firefighter_cascades_exactly() {
        let mut store = store_with_scene();
        store.dispatch_at(Transition::add_firefighter(ff("A", "One")), 2).unwrap();
        store.dispatch_at(Transition::add_firefighter(ff("B", "Two")), 2).unwrap();
        let (x, y) = {
            let scene = store.state().current_scene().unwrap();
            (scene.firefighters[0].id.clone(), scene.firefighters[1].id.clone())
        };
        for ts in [10, 20] {
            store.dispatch_at(Transition::append_vitals(x.clone(), hr(80.0, ts)), 3).unwrap();
            store.dispatch_at(Transition::append_vitals(y.clone(), hr(90.0, ts)), 3).unwrap();
        }
        store.dispatch_at(Transition::SelectFirefighter(Some(x.clone())), 4).unwrap();

        store.dispatch_at(Transition::RemoveFirefighter(x.clone()), 5).unwrap();

        let scene = store.state().current_scene().unwrap();
        assert_eq!(scene.firefighters.len(), 1);
        assert_eq!(scene.vitals.len(), 2);
        assert!(scene.vitals.iter().all(|v| v.firefighter_id == y));
        assert_eq!(scene.selected_firefighter_id, Some(y));
    }

    #[test]
    fn test_remove_last_selected_clears_selection() {
        let mut store = store_with_scene();
        store.dispatch_at(Transition::add_firefighter(ff("A", "One")), 2).unwrap();
        let x = store.state().current_scene().unwrap().firefighters[0].id.clone();
        store.dispatch_at(Transition::SelectFirefighter(Some(x.clone())), 3).unwrap();
        store.dispatch_at(Transition::RemoveFirefighter(x), 4).unwrap();
        assert_eq!(store.state().current_scene().unwrap().selected_firefighter_id, None);
    }

    #[test]
    fn test_select_unknown_firefighter_rejected() {
        let mut store = store_with_scene();
        let err = store
            .dispatch(Transition::SelectFirefighter(Some(FirefighterId::new("ghost"))))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFirefighter(_)));
    }

    #[test]
    fn test_append_vitals_permissive_reference() {
        let mut store = store_with_scene();
        store
            .dispatch_at(Transition::append_vitals(FirefighterId::new("ghost"), hr(70.0, 9)), 3)
            .unwrap();
        let scene = store.state().current_scene().unwrap();
        assert_eq!(scene.vitals.len(), 1);
        assert_eq!(scene.vitals[0].timestamp, 9);
    }

    #[test]
    fn test_append_empty_vitals_rejected() {
        let mut store = store_with_scene();
        let err = store
            .dispatch(Transition::append_vitals(FirefighterId::new("f"), VitalsInput::default()))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_append_defaults_timestamp_to_now() {
        let mut store = store_with_scene();
        let input = VitalsInput { heart_rate: Some(70.0), ..Default::default() };
        store
            .dispatch_at(Transition::append_vitals(FirefighterId::new("f"), input), 4242)
            .unwrap();
        assert_eq!(store.state().current_scene().unwrap().vitals[0].timestamp, 4242);
    }

    #[test]
    fn test_delete_active_scene_redirects() {
        let mut store = store_with_scene();
        let first = store.state().current_scene_id.clone().unwrap();
        store.dispatch_at(Transition::create_scene("Second"), 2).unwrap();
        let second = store.state().current_scene_id.clone().unwrap();

        store.dispatch_at(Transition::DeleteScene(second), 3).unwrap();
        assert_eq!(store.state().current_scene_id, Some(first.clone()));

        store.dispatch_at(Transition::DeleteScene(first), 4).unwrap();
        assert_eq!(store.state().current_scene_id, None);
        assert!(store.state().scenes.is_empty());
    }

    #[test]
    fn test_delete_inactive_scene_keeps_pointer() {
        let mut store = store_with_scene();
        let first = store.state().current_scene_id.clone().unwrap();
        store.dispatch_at(Transition::create_scene("Second"), 2).unwrap();
        let second = store.state().current_scene_id.clone().unwrap();

        store.dispatch_at(Transition::DeleteScene(first), 3).unwrap();
        assert_eq!(store.state().current_scene_id, Some(second));
    }

    #[test]
    fn test_switch_unknown_scene_rejected() {
        let mut store = store_with_scene();
        assert!(store.dispatch(Transition::SwitchScene(SceneId::new("nope"))).is_err());
    }

    #[test]
    fn test_reset_active_scene() {
        let mut storage = MemoryStore::new().with_entry(LEGACY_KEY, r#"{"firefighters": []}"#);
        // legacy is migrated on init; the reset must erase the legacy key too
        storage.set("unrelated", "x").unwrap();
        let mut store = StateStore::init(storage);
        store.dispatch_at(Transition::add_firefighter(ff("A", "B")), 2).unwrap();

        store.reset_active_scene().unwrap();

        let scene = store.state().current_scene().unwrap();
        assert!(scene.firefighters.is_empty());
        assert!(scene.vitals.is_empty());
        assert!(!store.storage().contains(LEGACY_KEY));
        assert!(store.storage().contains(CURRENT_KEY));
        assert!(store.storage().contains("unrelated"));
    }

    #[test]
    fn test_settings_transitions() {
        let mut store = StateStore::init(MemoryStore::new());
        store.dispatch(Transition::SetTheme(Theme::Dark)).unwrap();
        let tight = Thresholds { hr_high: 90.0, ..Thresholds::default() };
        store.dispatch(Transition::SetThresholds(tight)).unwrap();
        assert_eq!(store.state().settings.theme, Theme::Dark);
        assert_eq!(store.state().settings.thresholds.hr_high, 90.0);

        store.dispatch(Transition::ResetThresholds).unwrap();
        assert_eq!(store.state().settings.thresholds, Thresholds::default());

        let reloaded = load(&mut store.teardown());
        assert_eq!(reloaded.settings.theme, Theme::Dark);
    }

    #[test]
    fn test_load_repairs_dangling_references() {
        let raw = r#"{
            "currentSceneId": "gone",
            "scenes": [
                {"id": "s1", "name": "A", "createdAt": 1, "updatedAt": 1,
                 "selectedFirefighterId": "ghost", "firefighters": []},
                {"id": "s2", "name": "B", "createdAt": 1, "updatedAt": 1,
                 "selectedFirefighterId": "f1",
                 "firefighters": [{"id": "f1", "firstName": "Jane", "lastName": "Smith"}]}
            ]
        }"#;
        let mut storage = MemoryStore::new().with_entry(CURRENT_KEY, raw);
        let state = load(&mut storage);

        assert_eq!(state.current_scene_id, Some(SceneId::new("s1")));
        assert_eq!(state.scenes[0].selected_firefighter_id, None);
        assert_eq!(state.scenes[1].selected_firefighter_id, Some(FirefighterId::new("f1")));

        let mut storage = MemoryStore::new()
            .with_entry(CURRENT_KEY, r#"{"currentSceneId": "gone", "scenes": []}"#);
        assert_eq!(load(&mut storage).current_scene_id, None);
    }

    fn two_scene_blob(current: Option<&str>) -> String {
        let state = AppState {
            current_scene_id: current.map(SceneId::new),
            scenes: vec![
                Scene::new(SceneId::new("s1"), "Warehouse", 1),
                Scene::new(SceneId::new("s2"), "Brush Fire", 1),
            ],
            ..Default::default()
        };
        serde_json::to_string(&state).unwrap()
    }

    /// Reads and removes like `MemoryStore` but refuses every write
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("read-only".into()))
        }
        fn remove(&mut self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
    }

    #[test]
    fn test_reset_keeps_other_scenes() {
        let storage = MemoryStore::new()
            .with_entry(CURRENT_KEY, &two_scene_blob(Some("s1")))
            .with_entry(LEGACY_KEY, r#"{"firefighters": []}"#);
        let mut store = StateStore::init(storage);
        store.dispatch_at(Transition::add_firefighter(ff("Jane", "Smith")), 2).unwrap();

        store.reset_active_scene_at(3).unwrap();
        assert!(store.state().scenes[0].firefighters.is_empty());

        let mut storage = store.teardown();
        assert!(!storage.contains(LEGACY_KEY));
        let reloaded = load(&mut storage);
        assert_eq!(reloaded.scenes.len(), 2);
        assert_eq!(reloaded.current_scene_id, Some(SceneId::new("s1")));
    }

    #[test]
    fn test_reset_without_active_scene_keeps_storage() {
        let storage = MemoryStore::new().with_entry(CURRENT_KEY, &two_scene_blob(None));
        let mut store = StateStore::init(storage);

        let err = store.reset_active_scene().unwrap_err();
        assert!(matches!(err, Error::NoActiveScene));
        assert_eq!(store.state().scenes.len(), 2);

        let reloaded = load(&mut store.teardown());
        assert_eq!(reloaded.scenes.len(), 2);
    }

    #[test]
    fn test_reset_failed_write_keeps_storage() {
        let inner = MemoryStore::new().with_entry(CURRENT_KEY, &two_scene_blob(Some("s1")));
        let mut store = StateStore::init(ReadOnlyStore(inner));

        let err = store.reset_active_scene().unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(store.state().scenes.len(), 2);

        let ReadOnlyStore(mut inner) = store.teardown();
        assert_eq!(load(&mut inner).scenes.len(), 2);
    }

    #[test]
    fn test_clear_all_removes_both_keys() {
        let mut storage = MemoryStore::new()
            .with_entry(CURRENT_KEY, "{}")
            .with_entry(LEGACY_KEY, "{}");
        clear_all(&mut storage).unwrap();
        assert!(!storage.contains(CURRENT_KEY));
        assert!(!storage.contains(LEGACY_KEY));
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("unavailable".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("read-only".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let mut store = StateStore::init(FailingStore);
        assert_eq!(store.state(), &AppState::default());

        let err = store.dispatch(Transition::create_scene("x")).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(store.state().scenes.is_empty());
    }
}
