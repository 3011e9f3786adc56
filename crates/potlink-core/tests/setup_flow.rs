//! Integration tests for the potlink-core setup rules.
//!
//! These tests drive a profile, the persisted config model, and the setup
//! form together through the public API, the way the dialog and startup
//! check use them.

use std::path::PathBuf;

use potlink_core::{
    domain::config::{HELPER_PATH_KEY, PLAYER_PATH_KEY},
    domain::form::warning_text,
    is_valid_path, LaunchProfile, LauncherConfig, SetupForm, SetupOutcome, Variant,
};
use uuid::Uuid;

/// Creates an empty file under a fresh temp directory and returns both.
fn touch(name: &str) -> (PathBuf, String) {
    let dir = std::env::temp_dir().join(format!("potlink_flow_{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    std::fs::write(&path, b"").expect("create file");
    let text = path.to_string_lossy().into_owned();
    (dir, text)
}

#[test]
fn test_first_run_form_fill_produces_exactly_the_two_path_keys() {
    // Arrange: no config on disk yet
    let (pdir, player) = touch("PotPlayerMini64.exe");
    let (hdir, helper) = touch("AlistHelper.exe");
    let profile = LaunchProfile::for_variant(Variant::AlistHelper);
    let mut config = LauncherConfig::default();
    let mut form = SetupForm::new(&profile, &config);

    // Act: user fills both rows (helper via the picker) and confirms
    form.edit(0, player.clone());
    form.set_picked(1, &helper);
    let outcome = match form.submit() {
        Ok(paths) => SetupOutcome::Saved(paths),
        Err(errors) => panic!("unexpected warning: {}", warning_text(&errors)),
    };
    if let SetupOutcome::Saved(paths) = &outcome {
        paths.apply_to(&mut config);
    }

    // Assert
    let json: serde_json::Value = serde_json::to_value(&config).expect("serialize");
    let object = json.as_object().expect("object");
    assert_eq!(object.len(), 2);
    assert!(is_valid_path(object[PLAYER_PATH_KEY].as_str()));
    assert!(is_valid_path(object[HELPER_PATH_KEY].as_str()));

    std::fs::remove_dir_all(&pdir).ok();
    std::fs::remove_dir_all(&hdir).ok();
}

#[test]
fn test_service_variant_form_ignores_stale_helper_key() {
    // Arrange: a config left behind by the AlistHelper variant
    let config = LauncherConfig {
        player_path: Some("/nonexistent/PotPlayerMini64.exe".to_string()),
        helper_path: Some("/nonexistent/AlistHelper.exe".to_string()),
        ..Default::default()
    };
    let profile = LaunchProfile::for_variant(Variant::OpenListService);

    // Act
    let form = SetupForm::new(&profile, &config);

    // Assert
    assert_eq!(form.entries().len(), 1);
    assert_eq!(form.entries()[0].field.key, PLAYER_PATH_KEY);
}

#[test]
fn test_failed_submit_leaves_config_untouched() {
    let profile = LaunchProfile::for_variant(Variant::AlistHelper);
    let config = LauncherConfig {
        player_path: Some("/old/player.exe".to_string()),
        ..Default::default()
    };
    let before = config.clone();
    let mut form = SetupForm::new(&profile, &config);
    form.edit(1, "/nonexistent/AlistHelper.exe");

    let result = form.submit();

    assert!(result.is_err());
    assert_eq!(config, before);
}
