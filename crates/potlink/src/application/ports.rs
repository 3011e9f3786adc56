//! Traits the application layer depends on, and their error types.
//!
//! Production implementations live under `crate::infrastructure`; tests
//! inject the recording doubles from the `mock` sub-modules there.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use potlink_core::{LaunchProfile, LauncherConfig, SetupOutcome};
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The directory of the running executable could not be determined.
    #[error("could not determine the executable directory: {0}")]
    NoExecutableDir(#[source] std::io::Error),

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON content could not be parsed or produced.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type for starting or waiting on a process.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed while waiting for pid {pid:?}: {source}")]
    Wait {
        pid: Option<u32>,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to kill pid {pid:?}: {source}")]
    Kill {
        pid: Option<u32>,
        #[source]
        source: std::io::Error,
    },
    #[error("no {0} path is configured")]
    MissingPath(&'static str),
}

/// Error type for service control commands.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The control command itself could not be run.
    #[error("could not run `{command}`: {source}")]
    Unavailable {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// The command ran but reported failure (e.g. already started).
    #[error("`{command}` exited with code {code:?}")]
    Rejected { command: String, code: Option<i32> },
}

/// Error type for a single teardown step.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// Nothing with that image name was running.
    #[error("no running process named {0}")]
    NotRunning(String),
    #[error("could not run `{command}`: {source}")]
    Unavailable {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with code {code:?}")]
    Failed { command: String, code: Option<i32> },
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Error type for the administrator relaunch.
#[derive(Debug, Error)]
pub enum ElevationError {
    /// The path of the running executable could not be determined.
    #[error("could not locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),
    /// The OS refused the "runas" request (UAC declined, policy, ...).
    #[error("elevation request failed with code {0}")]
    Refused(isize),
    /// This platform has no elevation mechanism.
    #[error("elevation is not supported on this platform")]
    Unsupported,
}

// ── Configuration ports ───────────────────────────────────────────────────────

/// Persistence for [`LauncherConfig`].
#[cfg_attr(test, mockall::automock)]
pub trait ConfigRepository {
    /// Loads the config.  Never fails: unreadable or malformed content yields
    /// an empty config.
    fn load(&self) -> LauncherConfig;

    /// Overwrites the stored config with `config`.
    fn save(&self, config: &LauncherConfig) -> Result<(), ConfigError>;
}

/// The modal setup dialog.
#[cfg_attr(test, mockall::automock)]
pub trait SetupPrompt {
    /// Shows the dialog pre-filled from `config` and blocks until it closes.
    fn prompt(&self, profile: &LaunchProfile, config: &LauncherConfig) -> SetupOutcome;
}

/// Blocking user-facing error reports.
pub trait Notifier: Send + Sync {
    fn error(&self, title: &str, message: &str);
}

/// Administrator privilege checks.
#[cfg_attr(test, mockall::automock)]
pub trait Elevator {
    fn is_elevated(&self) -> bool;

    /// Starts a new elevated instance of this executable with `args`.
    /// Returns once the request was accepted; does not wait for it.
    fn relaunch(&self, args: &[String]) -> Result<(), ElevationError>;
}

// ── Process ports ─────────────────────────────────────────────────────────────

/// Everything needed to start one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl SpawnRequest {
    /// A request that runs `program` from its own folder.
    pub fn in_own_folder(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let working_dir = program
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Self {
            program,
            args: Vec::new(),
            working_dir,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// A spawned process owned by the caller.
#[async_trait]
pub trait RunningProcess: Send {
    /// OS process id, if the platform still reports one.
    fn id(&self) -> Option<u32>;

    /// Waits for the process to exit and returns its exit code, if any.
    async fn wait(&mut self) -> Result<Option<i32>, LaunchError>;

    /// Kills the process if it is still alive.  A process that already
    /// exited is not an error.
    async fn kill(&mut self) -> Result<(), LaunchError>;
}

/// Starts processes.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn spawn(&self, request: &SpawnRequest) -> Result<Box<dyn RunningProcess>, LaunchError>;
}

/// Force-kills processes by image name, children included.
#[async_trait]
pub trait ProcessTerminator: Send + Sync {
    async fn kill_image(&self, image: &str) -> Result<(), CleanupError>;
}

/// Service control manager commands.
#[async_trait]
pub trait ServiceController: Send + Sync {
    async fn start(&self, name: &str) -> Result<(), ServiceError>;
    async fn stop(&self, name: &str) -> Result<(), ServiceError>;
    async fn is_running(&self, name: &str) -> Result<bool, ServiceError>;
}

/// Local TCP readiness check.
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// Whether something accepts connections on `127.0.0.1:port`.
    async fn is_listening(&self, port: u16) -> bool;
}
