//! Integration tests for favorite profiles and their persistence by location.

mod common;

use common::TestContext;
use termprof::state::{MemoryStateStore, StateStore};

#[test]
fn test_favorite_survives_registry_restart() {
    let ctx = TestContext::new();
    let path = ctx.write_named_profile("Work.profile", "Work");
    let state = MemoryStateStore::new();

    let mut manager = ctx.manager_with(&state);
    let key = manager.load_profile(&path).unwrap();
    manager.set_favorite(&key, true);
    drop(manager);

    let mut restored = ctx.manager_with(&state);
    let favorites = restored.find_favorites();

    assert_eq!(favorites.len(), 1);
    let favorite = favorites.iter().next().unwrap();
    let location = restored.profile(favorite).unwrap().path().unwrap();
    assert_eq!(location, path.to_string_lossy());
}

#[test]
fn test_favorite_loaded_lazily_is_not_duplicated_by_load_all() {
    let ctx = TestContext::new();
    let path = ctx.write_named_profile("Work.profile", "Work");
    ctx.write_named_profile("Play.profile", "Play");
    let mut state = MemoryStateStore::new();
    state
        .set_favorites(&[path.to_string_lossy().into_owned()])
        .unwrap();

    let mut manager = ctx.manager_with(&state);
    assert_eq!(manager.find_favorites().len(), 1);
    manager.load_all_profiles();

    assert_eq!(manager.profile_count(), 3);
    assert_eq!(manager.find_favorites().len(), 1);
}

#[test]
fn test_toggle_before_read_keeps_persisted_favorites() {
    let ctx = TestContext::new();
    let work = ctx.write_named_profile("Work.profile", "Work");
    let play = ctx.write_named_profile("Play.profile", "Play");
    let state = MemoryStateStore::new();

    let mut manager = ctx.manager_with(&state);
    let work_key = manager.load_profile(&work).unwrap();
    manager.set_favorite(&work_key, true);
    drop(manager);

    let mut restored = ctx.manager_with(&state);
    let play_key = restored.load_profile(&play).unwrap();
    restored.set_favorite(&play_key, true);

    let mut persisted = state.favorites().unwrap();
    persisted.sort();
    let mut expected = vec![
        play.to_string_lossy().into_owned(),
        work.to_string_lossy().into_owned(),
    ];
    expected.sort();
    assert_eq!(persisted, expected);
}

#[test]
fn test_favorites_in_yaml_state_file() {
    let ctx = TestContext::new();
    let path = ctx.write_named_profile("Work.profile", "Work");

    let mut manager = ctx.yaml_manager();
    let key = manager.load_profile(&path).unwrap();
    manager.set_favorite(&key, true);
    drop(manager);

    assert_eq!(
        ctx.state_file().favorites(),
        Some(vec![path.to_string_lossy().into_owned()])
    );

    let mut restored = ctx.yaml_manager();
    restored.set_favorite(&key, false);
    assert!(restored.find_favorites().is_empty());
    assert_eq!(ctx.state_file().favorites(), Some(Vec::new()));
}

#[test]
fn test_deleted_favorite_is_forgotten() {
    let ctx = TestContext::new();
    let path = ctx.write_named_profile("Work.profile", "Work");
    let state = MemoryStateStore::new();

    let mut manager = ctx.manager_with(&state);
    let key = manager.load_profile(&path).unwrap();
    manager.set_favorite(&key, true);
    manager.delete_profile(&key);

    assert!(manager.find_favorites().is_empty());
    assert_eq!(state.favorites(), Some(Vec::new()));
    assert!(!path.exists());
}
