//! Recording service controller for tests.
//!
//! Records every control command as `"<verb> <name>"` and simulates the
//! service state: by default `start` succeeds but the service never reports
//! running; [`RecordingServiceController::set_running_after_start`] makes it
//! come up immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{ServiceController, ServiceError};

#[derive(Debug, Default)]
pub struct RecordingServiceController {
    commands: Mutex<Vec<String>>,
    running: AtomicBool,
    running_after_start: AtomicBool,
    reject_start: AtomicBool,
    unavailable: AtomicBool,
}

impl RecordingServiceController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_running_after_start(&self, value: bool) {
        self.running_after_start.store(value, Ordering::SeqCst);
    }

    /// `start` reports a non-zero exit code, as `net start` does when the
    /// service is already running.
    pub fn reject_start(&self) {
        self.reject_start.store(true, Ordering::SeqCst);
    }

    /// Every command fails as if `net` could not be executed.
    pub fn make_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn is_running_now(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn record(&self, verb: &str, name: &str) -> Result<(), ServiceError> {
        let command = format!("{verb} {name}");
        self.commands.lock().unwrap().push(command.clone());
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable {
                command,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceController for RecordingServiceController {
    async fn start(&self, name: &str) -> Result<(), ServiceError> {
        self.record("start", name)?;
        if self.reject_start.load(Ordering::SeqCst) {
            return Err(ServiceError::Rejected {
                command: format!("net start {name}"),
                code: Some(2),
            });
        }
        if self.running_after_start.load(Ordering::SeqCst) {
            self.running.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<(), ServiceError> {
        self.record("stop", name)?;
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn is_running(&self, _name: &str) -> Result<bool, ServiceError> {
        Ok(self.running.load(Ordering::SeqCst))
    }
}
