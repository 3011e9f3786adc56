//! Console command construction.
//!
//! `taskkill`, `net` and `sc` are console programs.  Started from a GUI
//! process on Windows each one would flash a console window, so every helper
//! command goes through [`quiet_command`], which sets `CREATE_NO_WINDOW` and
//! discards the command's own output.

use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// A command with no console window and no inherited stdio.
pub fn quiet_command(program: impl AsRef<OsStr>) -> Command {
    let mut cmd = Command::new(program);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    #[cfg(target_os = "windows")]
    cmd.creation_flags(CREATE_NO_WINDOW);
    cmd
}

/// Runs a quiet command to completion and returns its exit status.
pub async fn run_quiet<I, S>(program: &str, args: I) -> std::io::Result<ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    quiet_command(program).args(args).status().await
}

/// Runs a quiet command and captures its stdout as (lossy) UTF-8.
pub async fn run_captured<I, S>(program: &str, args: I) -> std::io::Result<(ExitStatus, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = quiet_command(program)
        .args(args)
        .stdout(Stdio::piped())
        .output()
        .await?;
    Ok((
        output.status,
        String::from_utf8_lossy(&output.stdout).into_owned(),
    ))
}

/// Human-readable command line for logs and error messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
