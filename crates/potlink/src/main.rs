//! PotLink entry point.
//!
//! Wires the infrastructure adapters into the application use cases and runs
//! one launch.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ check_elevation()        -- service variant only; may relaunch and exit
//!  └─ ensure_configured()      -- JSON config + egui setup dialog if needed
//!  └─ current-thread runtime
//!       └─ LaunchSession::run  -- helper, player, wait, cleanup
//! ```
//!
//! The dialog runs before the Tokio runtime exists: eframe wants the main
//! thread to itself, and nothing async happens until the player launch.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use potlink::application::configure::{ensure_configured, ConfigureOutcome};
use potlink::application::elevate::{check_elevation, ElevationOutcome};
use potlink::application::launch_session::{LaunchDeps, LaunchSession};
use potlink::infrastructure::elevation::SystemElevator;
use potlink::infrastructure::process::system::{SystemProcessLauncher, TaskkillTerminator};
use potlink::infrastructure::readiness::TcpPortProbe;
use potlink::infrastructure::service::system::SystemServiceController;
use potlink::infrastructure::storage::config::JsonConfigStore;
use potlink::infrastructure::ui::notify::DialogNotifier;
use potlink::infrastructure::ui::setup_dialog::EguiSetupPrompt;
use potlink_core::{LaunchProfile, Variant};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Which helper to run alongside PotPlayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    /// AlistHelper.exe as a child process; both paths from the config.
    AlistHelper,
    /// As `alist-helper`, falling back to the default install paths.
    AlistHelperDefaults,
    /// The OpenList desktop Windows service (needs administrator rights).
    OpenlistService,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::AlistHelper => Variant::AlistHelper,
            VariantArg::AlistHelperDefaults => Variant::AlistHelperDefaults,
            VariantArg::OpenlistService => Variant::OpenListService,
        }
    }
}

/// Launches PotPlayer together with its file-service helper and tears the
/// helper down again when PotPlayer exits.
#[derive(Debug, Parser)]
#[command(name = "potlink", version)]
struct Cli {
    /// Helper variant to launch.
    #[arg(long, value_enum, default_value_t = VariantArg::AlistHelper, env = "POTLINK_VARIANT")]
    variant: VariantArg,

    /// Config file to use instead of `launcher_config.json` next to the
    /// executable.
    #[arg(long, env = "POTLINK_CONFIG")]
    config: Option<PathBuf>,

    /// Never relaunch as administrator, even for the service variant.
    #[arg(long, env = "POTLINK_NO_ELEVATE")]
    no_elevate: bool,

    /// Maximum time to wait for the helper to become ready, in milliseconds.
    ///
    /// Overrides both the built-in default and `helper_ready_timeout_ms` in
    /// the config file.
    #[arg(long, env = "POTLINK_READY_TIMEOUT_MS")]
    ready_timeout_ms: Option<u64>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let variant = Variant::from(cli.variant);
    let profile = LaunchProfile::for_variant(variant);
    info!("potlink starting ({variant})");

    // ── Elevation guard ───────────────────────────────────────────────────────
    let args: Vec<String> = std::env::args().skip(1).collect();
    match check_elevation(&profile, cli.no_elevate, &SystemElevator::new(), &args) {
        Ok(ElevationOutcome::Proceed) => {}
        Ok(ElevationOutcome::Relaunched) => {
            info!("continuing in the elevated instance");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            error!("could not request administrator rights: {e}");
            return Ok(ExitCode::FAILURE);
        }
    }

    // ── Configuration ─────────────────────────────────────────────────────────
    let store = match cli.config {
        Some(path) => JsonConfigStore::new(path),
        None => JsonConfigStore::at_default_location().context("locating the config file")?,
    };
    info!("using config {}", store.path().display());

    let (config, paths) = match ensure_configured(&profile, &store, &EguiSetupPrompt::new()) {
        ConfigureOutcome::Ready { config, paths } => (config, paths),
        ConfigureOutcome::Cancelled => {
            info!("setup cancelled; nothing launched");
            return Ok(ExitCode::SUCCESS);
        }
    };

    let mut profile = profile.with_config_overrides(&config);
    if let Some(ms) = cli.ready_timeout_ms {
        profile = profile.with_ready_timeout(Duration::from_millis(ms));
    }

    // ── Launch ────────────────────────────────────────────────────────────────
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building the async runtime")?;

    let deps = LaunchDeps {
        launcher: Arc::new(SystemProcessLauncher::new()),
        terminator: Arc::new(TaskkillTerminator::new()),
        services: Arc::new(SystemServiceController::new()),
        ports: Arc::new(TcpPortProbe::new()),
        notifier: Arc::new(DialogNotifier::new()),
    };
    let report = runtime.block_on(LaunchSession::new(profile, deps).run(&paths, interrupted()));

    info!(
        "session finished: player {:?}, {} cleanup step(s), {} failed",
        report.player_exit,
        report.cleanup.attempted.len(),
        report.cleanup.failures.len()
    );
    Ok(ExitCode::SUCCESS)
}

/// Resolves on Ctrl-C.  Never resolves if the handler cannot be installed.
async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C"),
        Err(e) => {
            warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
