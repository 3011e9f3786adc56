//! ConfigureUseCase: make sure every required path is usable before launch.
//!
//! ```text
//! load config ──► all required paths exist? ──yes──► Ready
//!                         │ no
//!                         ▼
//!                   setup dialog ──Cancelled──► Cancelled (exit, nothing launched)
//!                         │ Saved
//!                         ▼
//!               merge + save (failure logged) ──► Ready
//! ```
//!
//! Persistence failures never stop a launch: the in-memory config carries
//! the confirmed paths for this run either way.

use potlink_core::{is_valid_path, HelperLaunch, LaunchProfile, LauncherConfig, SetupOutcome};
use tracing::{info, warn};

use super::ports::{ConfigRepository, SetupPrompt};

/// Paths the launch session needs, resolved from the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPaths {
    pub player: Option<String>,
    /// `None` for service-based helpers.
    pub helper: Option<String>,
}

impl LaunchPaths {
    /// Resolves the profile's paths from `config`, defaults included.
    pub fn resolve(profile: &LaunchProfile, config: &LauncherConfig) -> Self {
        let helper = match &profile.helper {
            HelperLaunch::Process { field, .. } => profile.resolve_path(field, config),
            HelperLaunch::Service { .. } => None,
        };
        Self {
            player: profile.resolve_path(&profile.player, config),
            helper,
        }
    }
}

/// Result of [`ensure_configured`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigureOutcome {
    Ready {
        config: LauncherConfig,
        paths: LaunchPaths,
    },
    /// The user dismissed the dialog.  The caller must exit without launching.
    Cancelled,
}

/// Returns `true` when any required path is absent or missing on disk.
pub fn needs_setup(profile: &LaunchProfile, config: &LauncherConfig) -> bool {
    profile
        .required_fields()
        .iter()
        .any(|field| !is_valid_path(profile.resolve_path(field, config).as_deref()))
}

/// Loads the config and runs the setup dialog only when required.
pub fn ensure_configured(
    profile: &LaunchProfile,
    repository: &dyn ConfigRepository,
    prompt: &dyn SetupPrompt,
) -> ConfigureOutcome {
    let mut config = repository.load();

    if needs_setup(profile, &config) {
        info!("one or more paths are missing or invalid; opening setup dialog");
        match prompt.prompt(profile, &config) {
            SetupOutcome::Cancelled => {
                info!("setup cancelled by user");
                return ConfigureOutcome::Cancelled;
            }
            SetupOutcome::Saved(submitted) => {
                submitted.apply_to(&mut config);
                if let Err(e) = repository.save(&config) {
                    warn!("could not save config, continuing with in-memory paths: {e}");
                }
            }
        }
    }

    let paths = LaunchPaths::resolve(profile, &config);
    ConfigureOutcome::Ready { config, paths }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
