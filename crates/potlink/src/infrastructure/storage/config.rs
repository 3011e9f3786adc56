//! JSON configuration persistence.
//!
//! The config lives in `launcher_config.json` in the same folder as the
//! launcher executable, so a portable install carries its settings along:
//!
//! ```json
//! {
//!   "potplayer_path": "C:\\Program Files\\DAUM\\PotPlayer\\PotPlayerMini64.exe",
//!   "alist_helper_path": "C:\\Program Files\\AlistHelper\\AlistHelper.exe"
//! }
//! ```
//!
//! # Encoding
//!
//! `serde_json::to_string_pretty` writes two-space indentation and leaves
//! non-ASCII characters as UTF-8 rather than `\u` escapes, so paths with
//! Korean or Chinese folder names stay readable when the file is opened in
//! an editor.
//!
//! # Failure policy
//!
//! [`JsonConfigStore::load`] never fails.  An absent file is the normal
//! first-run case; an unreadable or malformed file is logged and treated as
//! empty, which sends the user to the setup dialog.

use std::path::{Path, PathBuf};

use potlink_core::LauncherConfig;
use tracing::{debug, info, warn};

use crate::application::ports::{ConfigError, ConfigRepository};

/// File name of the persisted config.
pub const CONFIG_FILE_NAME: &str = "launcher_config.json";

/// [`ConfigRepository`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store for `launcher_config.json` next to the running executable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoExecutableDir`] when the executable path
    /// cannot be determined.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        let exe = std::env::current_exe().map_err(ConfigError::NoExecutableDir)?;
        let dir = exe.parent().map(Path::to_path_buf).ok_or_else(|| {
            ConfigError::NoExecutableDir(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "executable has no parent directory",
            ))
        })?;
        Ok(Self::new(dir.join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system errors other than "not
    /// found", and [`ConfigError::Json`] if the content is not a JSON object
    /// of the expected shape.
    pub fn try_load(&self) -> Result<Option<LauncherConfig>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl ConfigRepository for JsonConfigStore {
    fn load(&self) -> LauncherConfig {
        match self.try_load() {
            Ok(Some(config)) => {
                debug!("loaded config from {}", self.path.display());
                config
            }
            Ok(None) => {
                info!("no config at {}; starting empty", self.path.display());
                LauncherConfig::default()
            }
            Err(e) => {
                warn!("ignoring unreadable config: {e}");
                LauncherConfig::default()
            }
        }
    }

    fn save(&self, config: &LauncherConfig) -> Result<(), ConfigError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!("saved config to {}", self.path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
