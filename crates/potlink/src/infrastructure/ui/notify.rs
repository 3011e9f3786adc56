//! Native message boxes.

use rfd::{MessageButtons, MessageDialog, MessageLevel};
use tracing::debug;

use crate::application::ports::Notifier;

/// [`Notifier`] that shows a blocking native error box.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogNotifier;

impl DialogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DialogNotifier {
    fn error(&self, title: &str, message: &str) {
        debug!("showing error dialog: {title}");
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

/// Blocking warning box, used by the setup dialog after a failed submit.
pub fn show_warning(title: &str, message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
