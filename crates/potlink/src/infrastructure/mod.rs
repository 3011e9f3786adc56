//! Infrastructure layer for the launcher.
//!
//! Contains the OS-facing adapters: the JSON config file, process spawning
//! and image-name kills, Windows service control, the TCP readiness probe,
//! UAC elevation, and the egui setup dialog.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `potlink_core`, but MUST NOT be imported by the `application` or domain
//! layers (except by their tests, which use the `mock` sub-modules).
//!
//! # Sub-modules
//!
//! - **`storage`** – `launcher_config.json` next to the executable.
//!
//! - **`process`** – `tokio::process` launcher and the `taskkill` terminator.
//!   Recording doubles live in `process::mock`.
//!
//! - **`service`** – `net start` / `net stop` / `sc query` wrappers.
//!
//! - **`readiness`** – Checks whether the helper's local port accepts
//!   connections.
//!
//! - **`elevation`** – Administrator check and "runas" relaunch.  Only the
//!   Windows build talks to the OS; elsewhere the process counts as elevated.
//!
//! - **`ui`** – The setup dialog (eframe/egui), native file pickers and
//!   message boxes (rfd).

pub mod elevation;
pub mod process;
pub mod readiness;
pub mod service;
pub mod storage;
pub mod ui;
