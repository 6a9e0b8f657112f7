//! Resolves command-line references to scenes and firefighters
//!
//! A reference is tried as an exact id, then as a 1-based list number, then
//! as a case-insensitive name. A name matching more than one record is
//! rejected.

use crate::error::{Result, VitalsError};
use scene_vitals_common::{AppState, Firefighter, FirefighterId, Scene};

pub fn active_scene(state: &AppState) -> Result<&Scene> {
    state.current_scene().ok_or(VitalsError::NoActiveScene)
}

/// Scenes in list order, as numbered by `scene list`.
pub fn find_scene<'a>(state: &'a AppState, target: &str) -> Result<&'a Scene> {
    let target = target.trim();
    find(
        &state.scenes,
        target,
        |s| s.id.as_str(),
        |s| vec![s.name.clone()],
    )
    .ok_or_else(|| VitalsError::SceneNotFound(target.to_string()))?
}

/// Firefighters in roster order, as numbered by `ff list`.
pub fn find_firefighter<'a>(scene: &'a Scene, target: &str) -> Result<&'a Firefighter> {
    let target = target.trim();
    find(
        &scene.firefighters,
        target,
        |f| f.id.as_str(),
        |f| {
            vec![
                f.display_name(),
                format!("{} {}", f.first_name, f.last_name).trim().to_string(),
            ]
        },
    )
    .ok_or_else(|| VitalsError::FirefighterNotFound(target.to_string()))?
}

/// Explicit reference, or the scene's current selection.
pub fn target_firefighter<'a>(scene: &'a Scene, target: Option<&str>) -> Result<&'a Firefighter> {
    match target {
        Some(t) => find_firefighter(scene, t),
        None => scene.selected_firefighter().ok_or_else(|| {
            VitalsError::FirefighterNotFound(
                "no firefighter selected; pass --ff or run `ff select`".to_string(),
            )
        }),
    }
}

/// Id of the selection, or the reference given.
pub fn target_firefighter_id(scene: &Scene, target: Option<&str>) -> Result<FirefighterId> {
    target_firefighter(scene, target).map(|f| f.id.clone())
}

fn find<'a, T, I, N>(items: &'a [T], target: &str, id: I, names: N) -> Option<Result<&'a T>>
where
    I: Fn(&T) -> &str,
    N: Fn(&T) -> Vec<String>,
{
    if target.is_empty() {
        return None;
    }
    if let Some(item) = items.iter().find(|item| id(item) == target) {
        return Some(Ok(item));
    }
    if let Ok(n) = target.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| items.get(i)).map(Ok);
    }

    let matches: Vec<&T> = items
        .iter()
        .filter(|item| names(item).iter().any(|n| n.eq_ignore_ascii_case(target)))
        .collect();
    match matches.as_slice() {
        [] => None,
        [only] => Some(Ok(*only)),
        _ => Some(Err(VitalsError::AmbiguousReference(format!(
            "\"{}\" matches {} records; use the id or list number",
            target,
            matches.len()
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_vitals_common::{Firefighter, SceneId};

    fn scene() -> Scene {
        let mut scene = Scene::new(SceneId::new("s1"), "Warehouse Fire", 0);
        for (id, first, last) in [("a", "Jane", "Smith"), ("b", "Omar", "Diaz"), ("c", "Cher", "")] {
            scene.firefighters.push(Firefighter {
                id: FirefighterId::new(id),
                first_name: first.into(),
                last_name: last.into(),
                unit: None,
                status: None,
            });
        }
        scene
    }

    #[test]
    fn test_find_by_id_number_and_name() {
        let scene = scene();
        assert_eq!(find_firefighter(&scene, "b").unwrap().first_name, "Omar");
        assert_eq!(find_firefighter(&scene, "1").unwrap().first_name, "Jane");
        assert_eq!(find_firefighter(&scene, "smith, jane").unwrap().first_name, "Jane");
        assert_eq!(find_firefighter(&scene, "Jane Smith").unwrap().first_name, "Jane");
        assert_eq!(find_firefighter(&scene, "cher").unwrap().id.as_str(), "c");
    }

    #[test]
    fn test_missing_reference() {
        let scene = scene();
        assert!(matches!(
            find_firefighter(&scene, "9"),
            Err(VitalsError::FirefighterNotFound(_))
        ));
        assert!(find_firefighter(&scene, "0").is_err());
        assert!(find_firefighter(&scene, "nobody").is_err());
    }

    #[test]
    fn test_ambiguous_name_rejected() {
        let mut scene = scene();
        let mut twin = scene.firefighters[0].clone();
        twin.id = FirefighterId::new("z");
        scene.firefighters.push(twin);
        assert!(find_firefighter(&scene, "Jane Smith").is_err());
        assert!(find_firefighter(&scene, "z").is_ok());
    }

    #[test]
    fn test_selection_fallback() {
        let mut scene = scene();
        assert!(target_firefighter(&scene, None).is_err());
        scene.selected_firefighter_id = Some(FirefighterId::new("b"));
        assert_eq!(target_firefighter_id(&scene, None).unwrap().as_str(), "b");
    }

    #[test]
    fn test_find_scene() {
        let mut state = AppState::default();
        assert!(matches!(active_scene(&state), Err(VitalsError::NoActiveScene)));
        state.scenes.push(scene());
        assert_eq!(find_scene(&state, "warehouse fire").unwrap().id.as_str(), "s1");
        assert_eq!(find_scene(&state, "1").unwrap().id.as_str(), "s1");
        assert!(find_scene(&state, "2").is_err());
    }
}
