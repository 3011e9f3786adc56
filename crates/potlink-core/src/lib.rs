//! # potlink-core
//!
//! Shared library for PotLink containing the persisted configuration model,
//! path validation rules, launch profiles, the setup-form rules, and the
//! launch lifecycle state machine.
//!
//! This crate has zero dependencies on OS process APIs, UI frameworks, or the
//! file system beyond existence checks.
//!
//! # Architecture overview (for beginners)
//!
//! PotLink is a launcher: it starts PotPlayer together with a helper that
//! serves remote files (AlistHelper or the OpenList desktop service), waits
//! for PotPlayer to close, then tears the helper down again.
//!
//! This crate (`potlink-core`) is the shared foundation.  It defines:
//!
//! - **`domain::config`** – The `LauncherConfig` record stored as JSON next
//!   to the executable.
//!
//! - **`domain::paths`** – Existence checks and input clean-up for the paths
//!   the user types or picks.
//!
//! - **`domain::profile`** – The three launch variants and everything that
//!   differs between them: which paths are required, how the helper starts,
//!   what gets torn down, and whether elevation is needed.
//!
//! - **`domain::form`** – Pure rules behind the setup dialog (pre-fill,
//!   red-flagging, submit validation) so they can be tested without a window.
//!
//! - **`domain::lifecycle`** – The `Idle → … → Done` state machine the
//!   orchestrator walks through.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `potlink_core::LauncherConfig` instead of the full module path.
pub use domain::config::LauncherConfig;
pub use domain::form::{warning_text, FieldError, SetupForm, SetupOutcome, SubmittedPaths};
pub use domain::lifecycle::{LaunchState, Lifecycle, LifecycleError};
pub use domain::paths::{is_valid_path, normalize_path, sanitize_input};
pub use domain::profile::{
    CleanupTarget, HelperLaunch, LaunchProfile, PathField, Readiness, ReadinessProbe, Variant,
};
