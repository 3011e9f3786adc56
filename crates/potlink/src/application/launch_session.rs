//! LaunchSession: one helper + player run with guaranteed cleanup.
//!
//! This use case is the heart of the launcher.  It walks the
//! [`Lifecycle`] state machine:
//!
//! ```text
//! HelperStarting   spawn helper (autostart) | start service
//!                  settle delay, then poll readiness until ready or timeout
//! PlayerStarting   spawn player from its own folder
//! Running          wait for the player to exit
//! CleaningUp       every cleanup target, then the spawned helper handle if
//!                  its image was not tree-killed
//! Done
//! ```
//!
//! An interrupt ends any of the first three phases early and goes straight
//! to `CleaningUp`.  The interrupt future is polled alongside the whole start
//! sequence, so a Ctrl-C handler is installed before the helper starts.
//!
//! # Failure handling
//!
//! Any error while starting or waiting is reported once through the
//! [`Notifier`] and then cleanup runs anyway.  [`LaunchSession::cleanup`] is
//! guarded so that it executes at most once per session, and
//! [`LaunchSession::run`] always calls it, so it executes exactly once.
//!
//! # Architecture
//!
//! The session depends only on the traits in [`super::ports`].  All
//! infrastructure implementations are injected through [`LaunchDeps`],
//! making the whole sequence unit-testable with recording doubles.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use potlink_core::{
    CleanupTarget, HelperLaunch, LaunchProfile, LaunchState, Lifecycle, LifecycleError,
    ReadinessProbe,
};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::configure::LaunchPaths;
use super::ports::{
    CleanupError, LaunchError, Notifier, PortProbe, ProcessLauncher, ProcessTerminator,
    RunningProcess, ServiceController, ServiceError, SpawnRequest,
};

/// Title of the blocking error dialog.
pub const RUNTIME_ERROR_TITLE: &str = "Runtime error";

/// Error type for the start and wait phases of a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Launch(#[from] LaunchError),
    #[error("could not start service: {0}")]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Infrastructure the session talks to.
#[derive(Clone)]
pub struct LaunchDeps {
    pub launcher: Arc<dyn ProcessLauncher>,
    pub terminator: Arc<dyn ProcessTerminator>,
    pub services: Arc<dyn ServiceController>,
    pub ports: Arc<dyn PortProbe>,
    pub notifier: Arc<dyn Notifier>,
}

/// How the readiness wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperReadiness {
    /// The probe passed after this long (settle delay included).
    Ready(Duration),
    /// The probe never passed; the launch went ahead anyway.
    TimedOut,
    /// The profile has no probe; only the settle delay applied.
    SettleOnly,
}

/// How the player phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerExit {
    /// The player exited with this code (`None` when killed by a signal).
    Exited(Option<i32>),
    /// The launcher was interrupted while the player was running.
    Interrupted,
    /// The player never started.
    NotStarted,
}

/// Outcome of the teardown phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Steps attempted, in order.
    pub attempted: Vec<CleanupTarget>,
    /// Steps that failed, with the logged reason.
    pub failures: Vec<(CleanupTarget, String)>,
}

/// Summary of a finished session, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub readiness: Option<HelperReadiness>,
    pub player_pid: Option<u32>,
    pub player_exit: PlayerExit,
    /// Text shown in the error dialog, if one was shown.
    pub error: Option<String>,
    pub cleanup: CleanupReport,
    pub final_state: LaunchState,
}

/// A single launcher run.
pub struct LaunchSession {
    profile: LaunchProfile,
    deps: LaunchDeps,
    lifecycle: Lifecycle,
    helper_process: Option<Box<dyn RunningProcess>>,
    helper_image: Option<String>,
    readiness: Option<HelperReadiness>,
    player_pid: Option<u32>,
    cleaned_up: bool,
}

impl LaunchSession {
    pub fn new(profile: LaunchProfile, deps: LaunchDeps) -> Self {
        Self {
            profile,
            deps,
            lifecycle: Lifecycle::new(),
            helper_process: None,
            helper_image: None,
            readiness: None,
            player_pid: None,
            cleaned_up: false,
        }
    }

    pub fn state(&self) -> LaunchState {
        self.lifecycle.state()
    }

    /// Runs the whole session.  Cleanup executes on every path out.
    ///
    /// `interrupt` resolving at any point before the player exits ends the
    /// session early and proceeds to cleanup.  A player that is already
    /// running is left running.
    pub async fn run<F>(mut self, paths: &LaunchPaths, interrupt: F) -> SessionReport
    where
        F: Future<Output = ()> + Send,
    {
        let outcome = tokio::select! {
            biased;
            result = self.start_and_wait(paths) => result,
            _ = interrupt => Ok(PlayerExit::Interrupted),
        };

        let (player_exit, error) = match outcome {
            Ok(exit) => {
                let moved = match self.lifecycle.state() {
                    LaunchState::Running if exit != PlayerExit::Interrupted => {
                        self.lifecycle.advance(LaunchState::CleaningUp)
                    }
                    state => {
                        warn!("interrupted in {state:?}");
                        self.lifecycle.fail()
                    }
                };
                if let Err(e) = moved {
                    warn!("{e}");
                }
                (exit, None)
            }
            Err(e) => {
                error!("launch failed: {e}");
                let message = format!("An error occurred while running:\n{e}");
                self.deps.notifier.error(RUNTIME_ERROR_TITLE, &message);
                if let Err(e) = self.lifecycle.fail() {
                    warn!("{e}");
                }
                let exit = if self.player_pid.is_some() {
                    PlayerExit::Exited(None)
                } else {
                    PlayerExit::NotStarted
                };
                (exit, Some(message))
            }
        };

        let cleanup = self.cleanup().await;
        info!("all done");

        SessionReport {
            readiness: self.readiness,
            player_pid: self.player_pid,
            player_exit,
            error,
            cleanup,
            final_state: self.lifecycle.state(),
        }
    }

    async fn start_and_wait(&mut self, paths: &LaunchPaths) -> Result<PlayerExit, SessionError> {
        self.lifecycle.advance(LaunchState::HelperStarting)?;
        self.start_helper(paths).await?;
        self.readiness = Some(self.wait_for_helper().await);

        self.lifecycle.advance(LaunchState::PlayerStarting)?;
        let player = self.start_player(paths).await?;

        self.lifecycle.advance(LaunchState::Running)?;
        self.wait_for_exit(player).await
    }

    /// Spawns the helper process or starts the helper service.
    async fn start_helper(&mut self, paths: &LaunchPaths) -> Result<(), SessionError> {
        match &self.profile.helper {
            HelperLaunch::Process { argument, .. } => {
                let helper = paths
                    .helper
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .ok_or(LaunchError::MissingPath("helper"))?;
                info!("starting helper: {helper}");
                let request = SpawnRequest::in_own_folder(helper).arg(*argument);
                self.helper_image = request
                    .program
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
                let process = self.deps.launcher.spawn(&request).await?;
                debug!("helper pid {:?}", process.id());
                self.helper_process = Some(process);
            }
            HelperLaunch::Service { name } => {
                info!("starting service: {name}");
                match self.deps.services.start(name).await {
                    Ok(()) => {}
                    // Typically "already started"; the readiness probe decides.
                    Err(ServiceError::Rejected { command, code }) => {
                        warn!("`{command}` exited with code {code:?}; continuing");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(())
    }

    /// Settle delay, then bounded readiness polling.  Never fails.
    async fn wait_for_helper(&self) -> HelperReadiness {
        let readiness = &self.profile.readiness;
        let started = Instant::now();
        tokio::time::sleep(readiness.settle).await;

        let deadline = started + readiness.settle + readiness.timeout;
        let result = match &readiness.probe {
            ReadinessProbe::None => HelperReadiness::SettleOnly,
            ReadinessProbe::TcpPort(port) => {
                let ports = Arc::clone(&self.deps.ports);
                let port = *port;
                poll_until(deadline, readiness.poll_interval, || {
                    let ports = Arc::clone(&ports);
                    async move { ports.is_listening(port).await }
                })
                .await
            }
            ReadinessProbe::ServiceRunning(name) => {
                let services = Arc::clone(&self.deps.services);
                poll_until(deadline, readiness.poll_interval, || {
                    let services = Arc::clone(&services);
                    let name = name.clone();
                    async move {
                        match services.is_running(&name).await {
                            Ok(running) => running,
                            Err(e) => {
                                debug!("service status query failed: {e}");
                                false
                            }
                        }
                    }
                })
                .await
            }
        };

        match result {
            HelperReadiness::Ready(_) => {
                let elapsed = started.elapsed();
                info!("helper ready after {elapsed:?}");
                HelperReadiness::Ready(elapsed)
            }
            HelperReadiness::TimedOut => {
                warn!(
                    "helper not ready after {:?}; launching player anyway",
                    readiness.timeout
                );
                HelperReadiness::TimedOut
            }
            HelperReadiness::SettleOnly => {
                debug!("no readiness probe configured");
                HelperReadiness::SettleOnly
            }
        }
    }

    async fn start_player(
        &mut self,
        paths: &LaunchPaths,
    ) -> Result<Box<dyn RunningProcess>, SessionError> {
        let player = paths
            .player
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(LaunchError::MissingPath("player"))?;
        info!("starting player: {player}");
        let process = self
            .deps
            .launcher
            .spawn(&SpawnRequest::in_own_folder(PathBuf::from(player)))
            .await?;
        self.player_pid = process.id();
        info!(
            "player (pid {}) running; waiting for it to exit",
            self.player_pid
                .map_or_else(|| "?".to_string(), |pid| pid.to_string())
        );
        Ok(process)
    }

    /// Blocks until the player exits, with any exit code.
    async fn wait_for_exit(
        &mut self,
        mut player: Box<dyn RunningProcess>,
    ) -> Result<PlayerExit, SessionError> {
        let code = player.wait().await?;
        info!("player exited (code {code:?})");
        Ok(PlayerExit::Exited(code))
    }

    /// Tears down the helper.  Runs its steps at most once per session; a
    /// second call returns an empty report.
    pub async fn cleanup(&mut self) -> CleanupReport {
        let mut report = CleanupReport::default();
        if self.cleaned_up {
            return report;
        }
        self.cleaned_up = true;
        info!("cleaning up helper processes");

        // Set once `taskkill /T` has taken down the helper and its children.
        let mut tree_killed = false;
        for target in &self.profile.cleanup {
            report.attempted.push(target.clone());
            let result = match target {
                CleanupTarget::KillImage(image) => self.deps.terminator.kill_image(image).await,
                CleanupTarget::StopService(name) => self
                    .deps
                    .services
                    .stop(name)
                    .await
                    .map_err(CleanupError::from),
            };
            match result {
                Ok(()) => {
                    info!("{target}: done");
                    if let (CleanupTarget::KillImage(image), Some(helper)) =
                        (target, &self.helper_image)
                    {
                        tree_killed |= image.eq_ignore_ascii_case(helper);
                    }
                }
                Err(CleanupError::NotRunning(_)) => debug!("{target}: nothing running"),
                Err(e) => {
                    warn!("{target}: {e}");
                    report.failures.push((target.clone(), e.to_string()));
                }
            }
        }

        // Killing the handle first would orphan the helper's children, since
        // it terminates only the one process.
        if let Some(mut helper) = self.helper_process.take() {
            if tree_killed {
                debug!("helper already gone with its process tree");
            } else if let Err(e) = helper.kill().await {
                warn!("could not kill spawned helper: {e}");
            }
        }

        if self.lifecycle.state() == LaunchState::CleaningUp {
            if let Err(e) = self.lifecycle.advance(LaunchState::Done) {
                warn!("{e}");
            }
        }
        report
    }
}

/// Polls `check` every `interval` until it passes or `deadline` is reached.
async fn poll_until<C, Fut>(
    deadline: Instant,
    interval: Duration,
    mut check: C,
) -> HelperReadiness
where
    C: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let started = Instant::now();
    loop {
        if check().await {
            return HelperReadiness::Ready(started.elapsed());
        }
        let now = Instant::now();
        if now >= deadline {
            return HelperReadiness::TimedOut;
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
