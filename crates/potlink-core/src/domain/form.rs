//! Rules behind the setup dialog, kept free of any UI toolkit.
//!
//! The dialog in the `potlink` crate is a thin egui shell over [`SetupForm`]:
//! it renders [`SetupForm::entries`], forwards edits and picker results, and
//! calls [`SetupForm::submit`] when the confirm button is pressed.
//!
//! # Field colouring
//!
//! ```text
//! pre-filled, non-empty, missing on disk  -> flagged (red)
//! user edits the field                    -> flag cleared immediately
//! submit                                  -> re-validated, flags untouched
//! ```

use super::config::LauncherConfig;
use super::paths::{is_valid_path, normalize_path, sanitize_input};
use super::profile::{LaunchProfile, PathField};

/// One editable row of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry {
    pub field: PathField,
    pub value: String,
    /// Whether the row is currently drawn in the error colour.
    pub flagged: bool,
}

/// A field that failed validation on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: PathField,
    pub message: String,
}

/// Cleaned, validated values produced by a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedPaths {
    values: Vec<(&'static str, String)>,
}

impl SubmittedPaths {
    /// `(config key, path)` pairs in dialog order.
    pub fn values(&self) -> &[(&'static str, String)] {
        &self.values
    }

    /// Writes every submitted path into `config`.
    pub fn apply_to(&self, config: &mut LauncherConfig) {
        for (key, value) in &self.values {
            config.set_path(key, value.clone());
        }
    }
}

/// How the modal dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The user confirmed and every field validated.
    Saved(SubmittedPaths),
    /// Cancel button or window close.  Nothing may be launched.
    Cancelled,
}

/// Editable state of the setup dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    entries: Vec<FormEntry>,
}

impl SetupForm {
    /// Pre-fills one row per required field from `config`.
    ///
    /// Invalid values are kept and flagged rather than cleared.
    pub fn new(profile: &LaunchProfile, config: &LauncherConfig) -> Self {
        let entries = profile
            .required_fields()
            .into_iter()
            .map(|field| {
                let value = profile.resolve_path(&field, config).unwrap_or_default();
                let flagged = !value.is_empty() && !is_valid_path(Some(&value));
                FormEntry {
                    field,
                    value,
                    flagged,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[FormEntry] {
        &self.entries
    }

    /// Replaces the text of row `index` and clears its flag.
    ///
    /// Out-of-range indices are ignored.
    pub fn edit(&mut self, index: usize, value: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.value = value.into();
            entry.flagged = false;
        }
    }

    /// Marks row `index` as edited without changing its text.
    ///
    /// Used by UI toolkits that mutate the text buffer in place.
    pub fn mark_edited(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.flagged = false;
        }
    }

    /// Mutable access to the text of row `index`, for in-place editing.
    pub fn value_mut(&mut self, index: usize) -> Option<&mut String> {
        self.entries.get_mut(index).map(|e| &mut e.value)
    }

    /// Fills row `index` with a file-picker result after normalising it.
    pub fn set_picked(&mut self, index: usize, picked: &str) {
        self.edit(index, normalize_path(picked));
    }

    /// Sanitises and validates every row.
    ///
    /// Either all rows pass and their cleaned values are returned, or every
    /// failing row is reported.  There is no partial result.
    pub fn submit(&self) -> Result<SubmittedPaths, Vec<FieldError>> {
        let mut values = Vec::with_capacity(self.entries.len());
        let mut errors = Vec::new();

        for entry in &self.entries {
            let cleaned = sanitize_input(&entry.value);
            if is_valid_path(Some(&cleaned)) {
                values.push((entry.field.key, cleaned));
            } else {
                errors.push(FieldError {
                    field: entry.field,
                    message: entry.field.invalid_message(),
                });
            }
        }

        if errors.is_empty() {
            Ok(SubmittedPaths { values })
        } else {
            Err(errors)
        }
    }
}

/// Text of the blocking warning shown after a failed submit: one line per
/// failing field.
pub fn warning_text(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{HELPER_PATH_KEY, PLAYER_PATH_KEY};
    use crate::domain::profile::Variant;
    use std::path::PathBuf;

    fn temp_exe(name: &str) -> (PathBuf, String) {
        let dir = std::env::temp_dir().join(format!("potlink_form_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join(name);
        std::fs::write(&file, b"").unwrap();
        let text = file.to_string_lossy().into_owned();
        (dir, text)
    }

    #[test]
    fn test_empty_config_prefills_empty_unflagged_rows() {
        let profile = LaunchProfile::for_variant(Variant::AlistHelper);
        let form = SetupForm::new(&profile, &LauncherConfig::default());

        assert_eq!(form.entries().len(), 2);
        assert!(form.entries().iter().all(|e| e.value.is_empty() && !e.flagged));
    }

    #[test]
    fn test_invalid_stored_path_is_kept_and_flagged() {
        // Arrange
        let profile = LaunchProfile::for_variant(Variant::OpenListService);
        let config = LauncherConfig {
            player_path: Some("/nonexistent/PotPlayerMini64.exe".to_string()),
            ..Default::default()
        };

        // Act
        let form = SetupForm::new(&profile, &config);

        // Assert
        let entry = &form.entries()[0];
        assert_eq!(entry.value, "/nonexistent/PotPlayerMini64.exe");
        assert!(entry.flagged);
    }

    #[test]
    fn test_editing_clears_flag_without_revalidating() {
        let profile = LaunchProfile::for_variant(Variant::OpenListService);
        let config = LauncherConfig {
            player_path: Some("/nonexistent/a.exe".to_string()),
            ..Default::default()
        };
        let mut form = SetupForm::new(&profile, &config);

        form.edit(0, "/still/nonexistent/b.exe");

        assert!(!form.entries()[0].flagged);
    }

    #[test]
    fn test_submit_reports_exactly_the_invalid_fields() {
        // Arrange
        let (dir, player) = temp_exe("PotPlayerMini64.exe");
        let profile = LaunchProfile::for_variant(Variant::AlistHelper);
        let mut form = SetupForm::new(&profile, &LauncherConfig::default());
        form.edit(0, player);
        form.edit(1, "/nonexistent/AlistHelper.exe");

        // Act
        let errors = form.submit().expect_err("helper path must fail");

        // Assert
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field.key, HELPER_PATH_KEY);
        assert_eq!(
            warning_text(&errors),
            "AlistHelper path is invalid or does not exist."
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_submit_lists_every_failing_field_one_per_line() {
        let profile = LaunchProfile::for_variant(Variant::AlistHelper);
        let form = SetupForm::new(&profile, &LauncherConfig::default());

        let errors = form.submit().expect_err("empty fields must fail");

        assert_eq!(
            warning_text(&errors),
            "PotPlayer path is invalid or does not exist.\n\
             AlistHelper path is invalid or does not exist."
        );
    }

    #[test]
    fn test_submit_sanitizes_quoted_input() {
        // Arrange
        let (dir, player) = temp_exe("PotPlayerMini64.exe");
        let profile = LaunchProfile::for_variant(Variant::OpenListService);
        let mut form = SetupForm::new(&profile, &LauncherConfig::default());
        form.edit(0, format!("  \"{player}\" "));

        // Act
        let submitted = form.submit().expect("quoted path must validate");

        // Assert
        assert_eq!(submitted.values(), &[(PLAYER_PATH_KEY, player)]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_apply_to_writes_submitted_values_into_config() {
        let (dir, player) = temp_exe("PotPlayerMini64.exe");
        let (dir2, helper) = temp_exe("AlistHelper.exe");
        let profile = LaunchProfile::for_variant(Variant::AlistHelper);
        let mut form = SetupForm::new(&profile, &LauncherConfig::default());
        form.edit(0, player.clone());
        form.edit(1, helper.clone());

        let mut config = LauncherConfig::default();
        form.submit().expect("valid").apply_to(&mut config);

        assert_eq!(config.player_path, Some(player));
        assert_eq!(config.helper_path, Some(helper));

        std::fs::remove_dir_all(&dir).ok();
        std::fs::remove_dir_all(&dir2).ok();
    }

    #[test]
    fn test_out_of_range_edit_is_ignored() {
        let profile = LaunchProfile::for_variant(Variant::OpenListService);
        let mut form = SetupForm::new(&profile, &LauncherConfig::default());
        let before = form.clone();

        form.edit(5, "x");

        assert_eq!(form, before);
    }
}
