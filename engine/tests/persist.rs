use std::path::PathBuf;

use tracker::{persist, State};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tracker-persist-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

fn session() -> State {
    let mut state = State::new();
    for line in ["add hero 20", "afflict hero 2r poison", "in 3r rain", "step", "dmg hero 4"] {
        state.input(line).unwrap();
    }
    state
}

#[test]
fn missing_file_starts_fresh() {
    let state = persist::load_state(&scratch("absent.json")).unwrap();
    assert_eq!(state, State::new());
}

#[test]
fn json_round_trip_keeps_history() {
    let path = scratch("session.json");
    let state = session();
    persist::save_state(&path, &state, true).unwrap();
    let mut loaded = persist::load_state(&path).unwrap();
    assert_eq!(loaded, state);
    assert_eq!(loaded.history_len(), 5);
    loaded.input("undo").unwrap();
    assert_eq!(loaded.current.entities["hero"].damage, 0);
}

#[test]
fn yaml_round_trip() {
    let path = scratch("session.yaml");
    let state = session();
    persist::save_state(&path, &state, false).unwrap();
    assert_eq!(persist::load_state(&path).unwrap(), state);
}

#[test]
fn corrupt_file_is_an_error() {
    let path = scratch("corrupt.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = persist::load_state(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse state JSON"));
}
