//! Test doubles for the UI ports.
//!
//! [`RecordingNotifier`] stores every error report instead of opening a
//! message box.  [`ScriptedSetupPrompt`] plays the user: it types the given
//! values into a real [`SetupForm`] and presses confirm (or cancel), so the
//! same validation rules as the egui dialog apply.

use std::sync::Mutex;

use potlink_core::{LaunchProfile, LauncherConfig, SetupForm, SetupOutcome};

use crate::application::ports::{Notifier, SetupPrompt};

/// A [`Notifier`] that records `(title, message)` pairs.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, title: &str, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

/// What the scripted user does in the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    /// Types these values into the rows, in order, then confirms.
    Enter(Vec<String>),
    /// Closes the window.
    Cancel,
}

/// A [`SetupPrompt`] that answers without a window.
#[derive(Debug)]
pub struct ScriptedSetupPrompt {
    answer: ScriptedAnswer,
    shown: Mutex<usize>,
    /// Warnings the real dialog would have shown, one per failed confirm.
    warnings: Mutex<Vec<String>>,
    prefilled: Mutex<Vec<Vec<String>>>,
}

impl ScriptedSetupPrompt {
    pub fn new(answer: ScriptedAnswer) -> Self {
        Self {
            answer,
            shown: Mutex::new(0),
            warnings: Mutex::new(Vec::new()),
            prefilled: Mutex::new(Vec::new()),
        }
    }

    /// How many times the dialog was opened.
    pub fn times_shown(&self) -> usize {
        *self.shown.lock().unwrap()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    /// The row values the dialog was opened with, per opening.
    pub fn prefilled(&self) -> Vec<Vec<String>> {
        self.prefilled.lock().unwrap().clone()
    }
}

impl SetupPrompt for ScriptedSetupPrompt {
    fn prompt(&self, profile: &LaunchProfile, config: &LauncherConfig) -> SetupOutcome {
        *self.shown.lock().unwrap() += 1;
        let mut form = SetupForm::new(profile, config);
        self.prefilled
            .lock()
            .unwrap()
            .push(form.entries().iter().map(|e| e.value.clone()).collect());

        let ScriptedAnswer::Enter(values) = &self.answer else {
            return SetupOutcome::Cancelled;
        };
        for (index, value) in values.iter().enumerate() {
            form.edit(index, value.clone());
        }
        match form.submit() {
            Ok(paths) => SetupOutcome::Saved(paths),
            Err(errors) => {
                // The real dialog stays open; a scripted user gives up.
                self.warnings
                    .lock()
                    .unwrap()
                    .push(potlink_core::warning_text(&errors));
                SetupOutcome::Cancelled
            }
        }
    }
}
