//! The path setup dialog (eframe/egui).
//!
//! ```text
//! ┌ Path setup - PotPlayer & AlistHelper ─────────────────────────┐
//! │ PotPlayer path:    [C:\...\PotPlayerMini64.exe    ] [Browse...] │
//! │ AlistHelper path:  [D:\missing\AlistHelper.exe    ] [Browse...] │  <- red
//! │ Re-select the executable (.exe) of any program marked in red.   │
//! │ Paths are saved and used directly on the next start.            │
//! │            [ Save and launch ]     [ Cancel ]                   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! All rules (pre-fill, red flags, submit validation) live in
//! [`SetupForm`]; this module only draws it.
//!
//! # How the result gets out (for beginners)
//!
//! `eframe::run_native` owns the event loop and only returns once the window
//! is closed, so the app cannot simply `return` a value.  Instead the app
//! holds the sending half of an `mpsc` channel and sends exactly one
//! [`SetupOutcome`] from the confirm or cancel handler.  After the loop
//! exits, [`EguiSetupPrompt::prompt`] reads the receiving half; an empty
//! channel means the window was closed with the title-bar button, which is
//! the same as cancel.

use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use eframe::egui;
use potlink_core::{warning_text, LaunchProfile, LauncherConfig, SetupForm, SetupOutcome};
use tracing::{debug, error, info, warn};

use super::notify::show_warning;
use crate::application::ports::SetupPrompt;

/// Colour of flagged rows and of the re-select hint (`#E81123`).
const FLAGGED: egui::Color32 = egui::Color32::from_rgb(0xE8, 0x11, 0x23);
/// Colour of the "saved for next time" hint (`#555555`).
const HINT: egui::Color32 = egui::Color32::from_rgb(0x55, 0x55, 0x55);

const DIALOG_WIDTH: f32 = 600.0;
const FIELD_WIDTH: f32 = 360.0;
const BUTTON_SIZE: [f32; 2] = [130.0, 28.0];
const WARNING_TITLE: &str = "Path error";

/// System fonts tried, in order, for CJK glyphs in paths.
const CJK_FONT_CANDIDATES: [&str; 3] = [
    r"C:\Windows\Fonts\malgun.ttf",
    r"C:\Windows\Fonts\msyh.ttc",
    r"C:\Windows\Fonts\meiryo.ttc",
];

/// Window size for a form with `rows` path rows.
pub fn dialog_size(rows: usize) -> [f32; 2] {
    let height = if rows > 1 { 200.0 } else { 160.0 };
    [DIALOG_WIDTH, height]
}

/// [`SetupPrompt`] that opens a native egui window.
#[derive(Debug, Default, Clone, Copy)]
pub struct EguiSetupPrompt;

impl EguiSetupPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl SetupPrompt for EguiSetupPrompt {
    fn prompt(&self, profile: &LaunchProfile, config: &LauncherConfig) -> SetupOutcome {
        let form = SetupForm::new(profile, config);
        let (tx, rx) = mpsc::channel();
        let app = SetupDialogApp::new(form, tx);

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(profile.title)
                .with_inner_size(dialog_size(profile.required_fields().len()))
                .with_resizable(false)
                .with_minimize_button(false)
                .with_maximize_button(false)
                .with_window_level(egui::WindowLevel::AlwaysOnTop),
            centered: true,
            ..Default::default()
        };

        info!("opening setup dialog");
        let result = eframe::run_native(
            profile.title,
            options,
            Box::new(|cc| {
                install_cjk_fallback(&cc.egui_ctx);
                Ok(Box::new(app))
            }),
        );
        if let Err(e) = result {
            error!("setup dialog failed to open: {e}");
            return SetupOutcome::Cancelled;
        }

        rx.try_recv().unwrap_or(SetupOutcome::Cancelled)
    }
}

struct SetupDialogApp {
    form: SetupForm,
    outcome: Sender<SetupOutcome>,
    finished: bool,
}

impl SetupDialogApp {
    fn new(form: SetupForm, outcome: Sender<SetupOutcome>) -> Self {
        Self {
            form,
            outcome,
            finished: false,
        }
    }

    fn finish(&mut self, ctx: &egui::Context, outcome: SetupOutcome) {
        if self.finished {
            return;
        }
        self.finished = true;
        if self.outcome.send(outcome).is_err() {
            warn!("setup dialog result receiver is gone");
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn confirm(&mut self, ctx: &egui::Context) {
        match self.form.submit() {
            Ok(paths) => {
                debug!("setup confirmed with {} path(s)", paths.values().len());
                self.finish(ctx, SetupOutcome::Saved(paths));
            }
            Err(errors) => {
                debug!("setup rejected: {} invalid field(s)", errors.len());
                show_warning(WARNING_TITLE, &warning_text(&errors));
            }
        }
    }

    fn path_rows(&mut self, ui: &mut egui::Ui) {
        for index in 0..self.form.entries().len() {
            let (field, flagged) = {
                let entry = &self.form.entries()[index];
                (entry.field, entry.flagged)
            };
            let color = if flagged {
                FLAGGED
            } else {
                ui.visuals().text_color()
            };

            ui.label(format!("{} path:", field.label));

            let mut edited = false;
            if let Some(value) = self.form.value_mut(index) {
                let response = ui.add(
                    egui::TextEdit::singleline(value)
                        .text_color(color)
                        .desired_width(FIELD_WIDTH),
                );
                edited = response.changed();
            }
            if edited {
                self.form.mark_edited(index);
            }

            if ui.button("Browse...").clicked() {
                if let Some(picked) = pick_executable(field.picker_title) {
                    self.form.set_picked(index, &picked.to_string_lossy());
                }
            }
            ui.end_row();
        }
    }
}

impl eframe::App for SetupDialogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Grid::new("path_rows")
                .num_columns(3)
                .spacing([8.0, 10.0])
                .show(ui, |ui| self.path_rows(ui));

            ui.add_space(4.0);
            ui.colored_label(
                FLAGGED,
                "Re-select the executable (.exe) of any program marked in red.",
            );
            ui.colored_label(HINT, "Paths are saved and used directly on the next start.");
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                if ui
                    .add_sized(BUTTON_SIZE, egui::Button::new("Save and launch"))
                    .clicked()
                {
                    self.confirm(ctx);
                }
                if ui
                    .add_sized(BUTTON_SIZE, egui::Button::new("Cancel"))
                    .clicked()
                {
                    info!("setup cancelled");
                    self.finish(ctx, SetupOutcome::Cancelled);
                }
            });
        });
    }
}

/// Native "open file" picker restricted to `.exe` files.
fn pick_executable(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Executable", &["exe"])
        .pick_file()
}

/// Adds the first available system CJK font as a fallback so non-Latin
/// folder names render.
fn install_cjk_fallback(ctx: &egui::Context) {
    let Some((path, bytes)) = CJK_FONT_CANDIDATES
        .iter()
        .find_map(|path| std::fs::read(path).ok().map(|bytes| (*path, bytes)))
    else {
        debug!("no CJK fallback font found");
        return;
    };

    let name = "cjk-fallback".to_string();
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(name.clone(), Arc::new(egui::FontData::from_owned(bytes)));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(name.clone());
    }
    ctx.set_fonts(fonts);
    debug!("using {path} as CJK fallback font");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_row_dialog_is_600_by_200() {
        assert_eq!(dialog_size(2), [600.0, 200.0]);
    }

    #[test]
    fn test_one_row_dialog_is_600_by_160() {
        assert_eq!(dialog_size(1), [600.0, 160.0]);
    }

    #[test]
    fn test_flag_colour_is_e81123() {
        assert_eq!(FLAGGED, egui::Color32::from_rgb(232, 17, 35));
    }

    #[test]
    fn test_finish_sends_exactly_one_outcome() {
        // Arrange
        let (tx, rx) = mpsc::channel();
        let form = SetupForm::new(
            &LaunchProfile::for_variant(potlink_core::Variant::OpenListService),
            &LauncherConfig::default(),
        );
        let mut app = SetupDialogApp::new(form, tx);
        let ctx = egui::Context::default();

        // Act
        app.finish(&ctx, SetupOutcome::Cancelled);
        app.finish(&ctx, SetupOutcome::Cancelled);
        drop(app);

        // Assert
        assert_eq!(rx.iter().count(), 1);
    }
}
