//! `net` / `sc` backed [`ServiceController`].
//!
//! | Operation    | Windows                 | other hosts                   |
//! |--------------|-------------------------|-------------------------------|
//! | start        | `net start <name>`      | `systemctl start <name>`      |
//! | stop         | `net stop <name>`       | `systemctl stop <name>`       |
//! | is_running   | `sc query <name>`       | `systemctl is-active <name>`  |
//!
//! `net start` exits with code 2 when the service is already running.  That
//! is reported as [`ServiceError::Rejected`], which callers treat as a
//! warning rather than a failure.

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{ServiceController, ServiceError};
use crate::infrastructure::process::command::{display_command, run_captured, run_quiet};

/// [`ServiceController`] that shells out to the platform service tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemServiceController;

impl SystemServiceController {
    pub fn new() -> Self {
        Self
    }

    async fn control(&self, verb: &str, name: &str) -> Result<(), ServiceError> {
        let (program, args) = control_command(verb, name);
        let command = display_command(program, &args);
        debug!("running `{command}`");

        let status = run_quiet(program, &args)
            .await
            .map_err(|source| ServiceError::Unavailable {
                command: command.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ServiceError::Rejected {
                command,
                code: status.code(),
            })
        }
    }
}

#[cfg(target_os = "windows")]
fn control_command<'a>(verb: &'a str, name: &'a str) -> (&'static str, Vec<&'a str>) {
    ("net", vec![verb, name])
}

#[cfg(not(target_os = "windows"))]
fn control_command<'a>(verb: &'a str, name: &'a str) -> (&'static str, Vec<&'a str>) {
    ("systemctl", vec![verb, name])
}

/// `true` when `sc query` output reports the service as running.
pub fn sc_query_reports_running(output: &str) -> bool {
    output
        .lines()
        .filter(|line| line.trim_start().starts_with("STATE"))
        .any(|line| line.contains("RUNNING"))
}

#[async_trait]
impl ServiceController for SystemServiceController {
    async fn start(&self, name: &str) -> Result<(), ServiceError> {
        self.control("start", name).await
    }

    async fn stop(&self, name: &str) -> Result<(), ServiceError> {
        self.control("stop", name).await
    }

    #[cfg(target_os = "windows")]
    async fn is_running(&self, name: &str) -> Result<bool, ServiceError> {
        let args = ["query", name];
        let (status, stdout) =
            run_captured("sc", args)
                .await
                .map_err(|source| ServiceError::Unavailable {
                    command: display_command("sc", &args),
                    source,
                })?;
        if !status.success() {
            return Err(ServiceError::Rejected {
                command: display_command("sc", &args),
                code: status.code(),
            });
        }
        Ok(sc_query_reports_running(&stdout))
    }

    #[cfg(not(target_os = "windows"))]
    async fn is_running(&self, name: &str) -> Result<bool, ServiceError> {
        let args = ["is-active", name];
        let (status, stdout) =
            run_captured("systemctl", args)
                .await
                .map_err(|source| ServiceError::Unavailable {
                    command: display_command("systemctl", &args),
                    source,
                })?;
        Ok(status.success() && stdout.trim() == "active")
    }
}
