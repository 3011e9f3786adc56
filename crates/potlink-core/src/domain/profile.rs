//! Launch profiles: everything that differs between the launcher variants.
//!
//! A [`LaunchProfile`] answers four questions for the rest of the program:
//!
//! 1. Which paths must the user provide?  ([`LaunchProfile::required_fields`])
//! 2. How is the helper started?  ([`HelperLaunch`])
//! 3. How do we know the helper is up?  ([`Readiness`])
//! 4. What must be torn down afterwards?  ([`CleanupTarget`])
//!
//! # Variants
//!
//! ```text
//! AlistHelper          player + AlistHelper.exe autostart, kill 3 images
//! AlistHelperDefaults  same, falling back to well-known install paths
//! OpenListService      player + `openlist_desktop_service`, needs admin
//! ```

use std::fmt;
use std::time::Duration;

use super::config::{LauncherConfig, HELPER_PATH_KEY, PLAYER_PATH_KEY};

/// Name of the Windows service installed by OpenList Desktop.
pub const OPENLIST_SERVICE_NAME: &str = "openlist_desktop_service";

/// Argument that makes AlistHelper start its mounts without showing UI.
pub const AUTOSTART_ARG: &str = "autostart";

/// Port the alist server listens on out of the box.
pub const DEFAULT_ALIST_PORT: u16 = 5244;

/// Images force-killed after the player exits in the AlistHelper variants.
pub const ALIST_CLEANUP_IMAGES: [&str; 3] = ["AlistHelper.exe", "alist.exe", "rclone.exe"];

const DEFAULT_PLAYER_INSTALL: &str = r"C:\Program Files\DAUM\PotPlayer\PotPlayerMini64.exe";
const DEFAULT_HELPER_INSTALL: &str = r"C:\Program Files\AlistHelper\AlistHelper.exe";

const SETTLE_DELAY: Duration = Duration::from_millis(100);
const READY_TIMEOUT: Duration = Duration::from_secs(3);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The launcher variant selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Helper is a child process; both paths come from the config.
    AlistHelper,
    /// As `AlistHelper`, but absent paths fall back to default install paths.
    AlistHelperDefaults,
    /// Helper is a Windows service; only the player path is configured.
    OpenListService,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::AlistHelper => "alist-helper",
            Variant::AlistHelperDefaults => "alist-helper-defaults",
            Variant::OpenListService => "openlist-service",
        };
        f.write_str(name)
    }
}

/// One user-editable path in the setup dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathField {
    /// JSON key in [`LauncherConfig`].
    pub key: &'static str,
    /// Label shown left of the entry box, and used in warnings.
    pub label: &'static str,
    /// Title of the native file picker.
    pub picker_title: &'static str,
    /// Used when the key is absent from the config.
    pub default: Option<&'static str>,
}

impl PathField {
    /// Message shown when this field fails validation on submit.
    pub fn invalid_message(&self) -> String {
        format!("{} path is invalid or does not exist.", self.label)
    }
}

/// How the helper is brought up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperLaunch {
    /// Spawn the executable stored under `field` with a single `argument`.
    Process {
        field: PathField,
        argument: &'static str,
    },
    /// Issue a service start command for `name`.
    Service { name: String },
}

/// A single teardown step.  Each step is attempted independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupTarget {
    /// Force-kill every process with this image name, including children.
    KillImage(String),
    /// Stop the named service.
    StopService(String),
}

impl fmt::Display for CleanupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupTarget::KillImage(name) => write!(f, "kill {name}"),
            CleanupTarget::StopService(name) => write!(f, "stop service {name}"),
        }
    }
}

/// What to poll while waiting for the helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessProbe {
    /// Ready once something accepts TCP connections on `127.0.0.1:port`.
    TcpPort(u16),
    /// Ready once the service reports the running state.
    ServiceRunning(String),
    /// Only the settle delay applies.
    None,
}

/// Readiness policy applied between helper start and player start.
///
/// The settle delay always elapses first.  Polling then stops as soon as the
/// probe passes or `timeout` runs out, whichever comes first; a timeout is
/// logged and the launch carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub settle: Duration,
    pub probe: ReadinessProbe,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

/// Fully resolved description of one launcher variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchProfile {
    pub variant: Variant,
    /// Window title of the setup dialog.
    pub title: &'static str,
    pub player: PathField,
    pub helper: HelperLaunch,
    pub readiness: Readiness,
    pub cleanup: Vec<CleanupTarget>,
    pub requires_elevation: bool,
}

impl LaunchProfile {
    /// Builds the built-in profile for `variant`.
    pub fn for_variant(variant: Variant) -> Self {
        let with_defaults = variant == Variant::AlistHelperDefaults;
        let player = PathField {
            key: PLAYER_PATH_KEY,
            label: "PotPlayer",
            picker_title: "Select PotPlayer.exe",
            default: with_defaults.then_some(DEFAULT_PLAYER_INSTALL),
        };

        match variant {
            Variant::AlistHelper | Variant::AlistHelperDefaults => Self {
                variant,
                title: "Path setup - PotPlayer & AlistHelper",
                player,
                helper: HelperLaunch::Process {
                    field: PathField {
                        key: HELPER_PATH_KEY,
                        label: "AlistHelper",
                        picker_title: "Select AlistHelper.exe",
                        default: with_defaults.then_some(DEFAULT_HELPER_INSTALL),
                    },
                    argument: AUTOSTART_ARG,
                },
                readiness: Readiness {
                    settle: SETTLE_DELAY,
                    probe: ReadinessProbe::TcpPort(DEFAULT_ALIST_PORT),
                    timeout: READY_TIMEOUT,
                    poll_interval: READY_POLL_INTERVAL,
                },
                cleanup: ALIST_CLEANUP_IMAGES
                    .iter()
                    .map(|name| CleanupTarget::KillImage((*name).to_string()))
                    .collect(),
                requires_elevation: false,
            },
            Variant::OpenListService => Self {
                variant,
                title: "PotPlayer Link OpenList",
                player,
                helper: HelperLaunch::Service {
                    name: OPENLIST_SERVICE_NAME.to_string(),
                },
                readiness: Readiness {
                    settle: SETTLE_DELAY,
                    probe: ReadinessProbe::ServiceRunning(OPENLIST_SERVICE_NAME.to_string()),
                    timeout: READY_TIMEOUT,
                    poll_interval: READY_POLL_INTERVAL,
                },
                cleanup: vec![CleanupTarget::StopService(OPENLIST_SERVICE_NAME.to_string())],
                requires_elevation: true,
            },
        }
    }

    /// Applies the optional tuning keys from the persisted config.
    ///
    /// `cleanup_processes` replaces the image kill list but never removes a
    /// service stop step.
    pub fn with_config_overrides(mut self, config: &LauncherConfig) -> Self {
        if let Some(images) = &config.cleanup_processes {
            self.cleanup.retain(|t| matches!(t, CleanupTarget::StopService(_)));
            self.cleanup.extend(
                images
                    .iter()
                    .filter(|name| !name.trim().is_empty())
                    .map(|name| CleanupTarget::KillImage(name.trim().to_string())),
            );
        }
        if let (Some(port), ReadinessProbe::TcpPort(_)) =
            (config.helper_ready_port, &self.readiness.probe)
        {
            self.readiness.probe = ReadinessProbe::TcpPort(port);
        }
        if let Some(ms) = config.helper_ready_timeout_ms {
            self.readiness.timeout = Duration::from_millis(ms);
        }
        self
    }

    /// Overrides the readiness timeout (command-line flag).
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.readiness.timeout = timeout;
        self
    }

    /// Paths the user must supply, in dialog order.
    pub fn required_fields(&self) -> Vec<PathField> {
        let mut fields = vec![self.player];
        if let HelperLaunch::Process { field, .. } = &self.helper {
            fields.push(*field);
        }
        fields
    }

    /// The stored value for `field`, or its default when the key is absent.
    pub fn resolve_path(&self, field: &PathField, config: &LauncherConfig) -> Option<String> {
        config
            .path(field.key)
            .map(str::to_string)
            .or_else(|| field.default.map(str::to_string))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
