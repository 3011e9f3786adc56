//! The persisted launcher configuration record.
//!
//! `LauncherConfig` is stored as a flat JSON object in `launcher_config.json`.
//! Example written after the setup dialog is confirmed:
//!
//! ```json
//! {
//!   "potplayer_path": "C:\\Program Files\\DAUM\\PotPlayer\\PotPlayerMini64.exe",
//!   "alist_helper_path": "D:\\Tools\\AlistHelper\\AlistHelper.exe"
//! }
//! ```
//!
//! # Optional keys
//!
//! Every key is optional.  A missing path means "use the profile default or
//! prompt".  Path values are never validated here; they are checked at use
//! time by [`crate::domain::paths::is_valid_path`].
//!
//! Fields annotated with `skip_serializing_if` are omitted when unset, so a
//! freshly saved file contains only the keys the user actually provided.
//! Keys this version does not know about are kept in `extra` and written back
//! unchanged on save.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON key holding the player executable path.
pub const PLAYER_PATH_KEY: &str = "potplayer_path";

/// JSON key holding the helper executable path.
pub const HELPER_PATH_KEY: &str = "alist_helper_path";

/// Top-level launcher configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LauncherConfig {
    /// Path to `PotPlayerMini64.exe` (or any player executable).
    #[serde(
        rename = "potplayer_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub player_path: Option<String>,

    /// Path to `AlistHelper.exe`.  Unused by the service variant.
    #[serde(
        rename = "alist_helper_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub helper_path: Option<String>,

    /// Image names force-killed during cleanup.  Replaces the profile list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_processes: Option<Vec<String>>,

    /// TCP port polled to decide the helper is ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_ready_port: Option<u16>,

    /// Upper bound on readiness polling, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_ready_timeout_ms: Option<u64>,

    /// Keys written by other tools or newer versions.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LauncherConfig {
    /// Returns the stored path for `key`, if any.
    ///
    /// Unknown keys are looked up in `extra` and only returned when they hold
    /// a JSON string.
    pub fn path(&self, key: &str) -> Option<&str> {
        match key {
            PLAYER_PATH_KEY => self.player_path.as_deref(),
            HELPER_PATH_KEY => self.helper_path.as_deref(),
            other => self.extra.get(other).and_then(Value::as_str),
        }
    }

    /// Stores `value` under `key`, overwriting any previous value.
    pub fn set_path(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            PLAYER_PATH_KEY => self.player_path = Some(value),
            HELPER_PATH_KEY => self.helper_path = Some(value),
            other => {
                self.extra.insert(other.to_string(), Value::String(value));
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes_to_empty_object() {
        // Arrange
        let cfg = LauncherConfig::default();

        // Act
        let json = serde_json::to_string(&cfg).expect("serialize");

        // Assert
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_config_with_both_paths_writes_exactly_two_keys() {
        // Arrange
        let mut cfg = LauncherConfig::default();
        cfg.set_path(PLAYER_PATH_KEY, r"C:\P\PotPlayerMini64.exe");
        cfg.set_path(HELPER_PATH_KEY, r"C:\H\AlistHelper.exe");

        // Act
        let value: Value = serde_json::to_value(&cfg).expect("serialize");

        // Assert
        let object = value.as_object().expect("object");
        assert_eq!(object.len(), 2);
        assert_eq!(object[PLAYER_PATH_KEY], r"C:\P\PotPlayerMini64.exe");
        assert_eq!(object[HELPER_PATH_KEY], r"C:\H\AlistHelper.exe");
    }

    #[test]
    fn test_unknown_keys_survive_a_load_save_cycle() {
        // Arrange
        let raw = r#"{"potplayer_path":"a.exe","window_theme":"dark","retries":3}"#;

        // Act
        let cfg: LauncherConfig = serde_json::from_str(raw).expect("deserialize");
        let back: Value = serde_json::to_value(&cfg).expect("serialize");

        // Assert
        assert_eq!(cfg.player_path.as_deref(), Some("a.exe"));
        assert_eq!(back["window_theme"], "dark");
        assert_eq!(back["retries"], 3);
    }

    #[test]
    fn test_optional_tuning_keys_are_read_when_present() {
        let raw = r#"{
            "cleanup_processes": ["a.exe", "b.exe"],
            "helper_ready_port": 5245,
            "helper_ready_timeout_ms": 1500
        }"#;

        let cfg: LauncherConfig = serde_json::from_str(raw).expect("deserialize");

        assert_eq!(
            cfg.cleanup_processes,
            Some(vec!["a.exe".to_string(), "b.exe".to_string()])
        );
        assert_eq!(cfg.helper_ready_port, Some(5245));
        assert_eq!(cfg.helper_ready_timeout_ms, Some(1500));
    }

    #[test]
    fn test_wrong_value_type_is_a_parse_error() {
        let raw = r#"{"potplayer_path": 42}"#;
        let result: Result<LauncherConfig, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn test_path_lookup_by_key() {
        let mut cfg = LauncherConfig::default();
        cfg.set_path(HELPER_PATH_KEY, "helper.exe");
        cfg.set_path("custom_tool_path", "tool.exe");

        assert_eq!(cfg.path(HELPER_PATH_KEY), Some("helper.exe"));
        assert_eq!(cfg.path("custom_tool_path"), Some("tool.exe"));
        assert_eq!(cfg.path(PLAYER_PATH_KEY), None);
    }

    #[test]
    fn test_non_ascii_paths_are_written_verbatim() {
        let mut cfg = LauncherConfig::default();
        cfg.set_path(PLAYER_PATH_KEY, r"D:\播放器\PotPlayerMini64.exe");

        let json = serde_json::to_string(&cfg).expect("serialize");

        assert!(json.contains("播放器"), "non-ASCII must not be escaped: {json}");
    }
}
