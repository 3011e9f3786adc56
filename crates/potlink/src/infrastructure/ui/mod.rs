//! User-facing windows: the setup dialog and blocking message boxes.
//!
//! - **`setup_dialog`** – eframe/egui implementation of the `SetupPrompt`
//!   port, with native file pickers from `rfd`.
//! - **`notify`** – `rfd` message boxes behind the `Notifier` port.
//! - **`mock`** – scripted prompt and recording notifier for tests.

pub mod mock;
pub mod notify;
pub mod setup_dialog;
