//! Recording process doubles for unit and integration tests.
//!
//! # Why recording doubles?
//!
//! The real adapters start PotPlayer, run `taskkill` and kill whatever
//! happens to be called `rclone.exe` on the test machine.  These doubles
//! replace every OS call with in-memory bookkeeping so tests can assert
//! exactly what would have been spawned or killed, and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let launcher = Arc::new(RecordingLauncher::new());
//! launcher.script(vec![SpawnBehavior::Exits(0), SpawnBehavior::Fails]);
//! // ... run a LaunchSession ...
//! assert_eq!(launcher.requests().len(), 2);
//! ```
//!
//! Each `spawn` consumes the next [`SpawnBehavior`] from the script; once
//! the script is exhausted every process exits immediately with code 0.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::{
    CleanupError, LaunchError, ProcessLauncher, ProcessTerminator, RunningProcess, SpawnRequest,
};

/// What a scripted spawn does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnBehavior {
    /// Spawn succeeds; `wait` returns this exit code.
    Exits(i32),
    /// Spawn itself fails with "file not found".
    Fails,
    /// Spawn succeeds; `wait` never returns.
    Hangs,
    /// Spawn succeeds; `wait` returns an I/O error.
    WaitFails,
}

/// A [`ProcessLauncher`] that records requests instead of starting anything.
#[derive(Debug)]
pub struct RecordingLauncher {
    requests: Mutex<Vec<SpawnRequest>>,
    script: Mutex<VecDeque<SpawnBehavior>>,
    next_pid: AtomicU32,
    kills: Arc<AtomicUsize>,
}

impl Default for RecordingLauncher {
    fn default() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            next_pid: AtomicU32::new(1000),
            kills: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the behaviours of the next spawns, in order.
    pub fn script(&self, behaviors: Vec<SpawnBehavior>) {
        *self.script.lock().unwrap() = behaviors.into();
    }

    /// Every spawn request received, successful or not.
    pub fn requests(&self) -> Vec<SpawnRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Total `kill` calls across all processes this launcher produced.
    pub fn kill_count(&self) -> usize {
        self.kills.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessLauncher for RecordingLauncher {
    async fn spawn(&self, request: &SpawnRequest) -> Result<Box<dyn RunningProcess>, LaunchError> {
        self.requests.lock().unwrap().push(request.clone());
        let behavior = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SpawnBehavior::Exits(0));

        if behavior == SpawnBehavior::Fails {
            return Err(LaunchError::Spawn {
                program: request.program.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Ok(Box::new(RecordingProcess {
            pid: self.next_pid.fetch_add(1, Ordering::SeqCst),
            behavior,
            kills: Arc::clone(&self.kills),
        }))
    }
}

/// A fake process produced by [`RecordingLauncher`].
#[derive(Debug)]
pub struct RecordingProcess {
    pid: u32,
    behavior: SpawnBehavior,
    kills: Arc<AtomicUsize>,
}

#[async_trait]
impl RunningProcess for RecordingProcess {
    fn id(&self) -> Option<u32> {
        Some(self.pid)
    }

    async fn wait(&mut self) -> Result<Option<i32>, LaunchError> {
        match self.behavior {
            SpawnBehavior::Exits(code) => Ok(Some(code)),
            SpawnBehavior::Hangs => std::future::pending().await,
            SpawnBehavior::WaitFails | SpawnBehavior::Fails => Err(LaunchError::Wait {
                pid: Some(self.pid),
                source: std::io::Error::new(std::io::ErrorKind::Other, "mock wait failure"),
            }),
        }
    }

    async fn kill(&mut self) -> Result<(), LaunchError> {
        self.kills.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A [`ProcessTerminator`] that records image names instead of killing.
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    killed: Mutex<Vec<String>>,
    failing: Mutex<Vec<String>>,
    absent: Mutex<Vec<String>>,
}

impl RecordingTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes kills of `image` fail as if `taskkill` returned an error.
    pub fn fail_on(&self, image: &str) {
        self.failing.lock().unwrap().push(image.to_string());
    }

    /// Makes kills of `image` report that nothing was running.
    pub fn not_running(&self, image: &str) {
        self.absent.lock().unwrap().push(image.to_string());
    }

    /// Image names passed to `kill_image`, in call order.
    pub fn killed(&self) -> Vec<String> {
        self.killed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessTerminator for RecordingTerminator {
    async fn kill_image(&self, image: &str) -> Result<(), CleanupError> {
        self.killed.lock().unwrap().push(image.to_string());
        if self.failing.lock().unwrap().iter().any(|i| i == image) {
            return Err(CleanupError::Failed {
                command: format!("taskkill /F /IM {image} /T"),
                code: Some(1),
            });
        }
        if self.absent.lock().unwrap().iter().any(|i| i == image) {
            return Err(CleanupError::NotRunning(image.to_string()));
        }
        Ok(())
    }
}
