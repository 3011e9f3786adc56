//! Real process adapters.
//!
//! [`SystemProcessLauncher`] spawns through `tokio::process` so the player
//! wait can be raced against Ctrl-C.  [`TaskkillTerminator`] force-kills by
//! image name, child processes included:
//!
//! | Host    | Command                          | "not running" exit code |
//! |---------|----------------------------------|-------------------------|
//! | Windows | `taskkill /F /IM <image> /T`     | 128                     |
//! | other   | `pkill -x <image>`               | 1                       |

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::debug;

use super::command::{display_command, run_quiet};
use crate::application::ports::{
    CleanupError, LaunchError, ProcessLauncher, ProcessTerminator, RunningProcess, SpawnRequest,
};

// ── Launcher ──────────────────────────────────────────────────────────────────

/// [`ProcessLauncher`] backed by `tokio::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessLauncher;

impl SystemProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessLauncher for SystemProcessLauncher {
    async fn spawn(&self, request: &SpawnRequest) -> Result<Box<dyn RunningProcess>, LaunchError> {
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args);
        if let Some(dir) = &request.working_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: request.program.clone(),
            source,
        })?;
        debug!("spawned {} as pid {:?}", request.program.display(), child.id());
        Ok(Box::new(SystemProcess { child }))
    }
}

/// A child process spawned by [`SystemProcessLauncher`].
#[derive(Debug)]
pub struct SystemProcess {
    child: Child,
}

#[async_trait]
impl RunningProcess for SystemProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait(&mut self) -> Result<Option<i32>, LaunchError> {
        let pid = self.child.id();
        let status = self
            .child
            .wait()
            .await
            .map_err(|source| LaunchError::Wait { pid, source })?;
        Ok(status.code())
    }

    async fn kill(&mut self) -> Result<(), LaunchError> {
        let pid = self.child.id();
        match self.child.try_wait() {
            Ok(Some(_)) => return Ok(()),
            Ok(None) => {}
            Err(source) => return Err(LaunchError::Kill { pid, source }),
        }
        self.child
            .kill()
            .await
            .map_err(|source| LaunchError::Kill { pid, source })
    }
}

// ── Terminator ────────────────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
const NOT_RUNNING_CODE: i32 = 128;

#[cfg(not(target_os = "windows"))]
const NOT_RUNNING_CODE: i32 = 1;

/// [`ProcessTerminator`] that shells out to `taskkill` (or `pkill`).
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskkillTerminator;

impl TaskkillTerminator {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "windows")]
    fn command(image: &str) -> (&'static str, Vec<&str>) {
        ("taskkill", vec!["/F", "/IM", image, "/T"])
    }

    #[cfg(not(target_os = "windows"))]
    fn command(image: &str) -> (&'static str, Vec<&str>) {
        ("pkill", vec!["-x", image])
    }
}

#[async_trait]
impl ProcessTerminator for TaskkillTerminator {
    async fn kill_image(&self, image: &str) -> Result<(), CleanupError> {
        let (program, args) = Self::command(image);
        let command = display_command(program, &args);
        debug!("running `{command}`");

        let status = run_quiet(program, &args)
            .await
            .map_err(|source| CleanupError::Unavailable {
                command: command.clone(),
                source,
            })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(NOT_RUNNING_CODE) => Err(CleanupError::NotRunning(image.to_string())),
            code => Err(CleanupError::Failed { command, code }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "windows")]
    #[test]
    fn test_kill_command_is_forced_tree_kill() {
        let (program, args) = TaskkillTerminator::command("rclone.exe");
        assert_eq!(program, "taskkill");
        assert_eq!(args, vec!["/F", "/IM", "rclone.exe", "/T"]);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_kill_command_matches_exact_name() {
        let (program, args) = TaskkillTerminator::command("rclone.exe");
        assert_eq!(program, "pkill");
        assert_eq!(args, vec!["-x", "rclone.exe"]);
    }

    #[tokio::test]
    async fn test_spawn_missing_program_is_spawn_error() {
        // Arrange
        let launcher = SystemProcessLauncher::new();
        let request = SpawnRequest::in_own_folder("/nonexistent/dir/PotPlayerMini64.exe");

        // Act
        let result = launcher.spawn(&request).await;

        // Assert
        assert!(matches!(result, Err(LaunchError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_wait_returns_exit_code() {
        let launcher = SystemProcessLauncher::new();
        let request = SpawnRequest::in_own_folder("/bin/sh").arg("-c").arg("exit 7");

        let mut process = launcher.spawn(&request).await.unwrap();
        let code = process.wait().await.unwrap();

        assert_eq!(code, Some(7));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_kill_stops_a_running_process_and_is_repeatable() {
        let launcher = SystemProcessLauncher::new();
        let request = SpawnRequest::in_own_folder("/bin/sh").arg("-c").arg("sleep 30");
        let mut process = launcher.spawn(&request).await.unwrap();

        process.kill().await.unwrap();
        process.kill().await.unwrap();
        let code = process.wait().await.unwrap();

        assert_eq!(code, None, "killed by signal");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_kill_after_exit_is_not_an_error() {
        let launcher = SystemProcessLauncher::new();
        let request = SpawnRequest::in_own_folder("/bin/sh").arg("-c").arg("exit 0");
        let mut process = launcher.spawn(&request).await.unwrap();
        process.wait().await.unwrap();

        assert!(process.kill().await.is_ok());
    }
}
