//! UAC elevation adapter.
//!
//! [`SystemElevator`] implements the application's [`Elevator`] port.  On
//! Windows it asks the shell (`IsUserAnAdmin`) and relaunches through
//! `ShellExecuteW` with the `"runas"` verb.  Other hosts have no UAC, so the
//! process always counts as elevated and the guard never fires.
//!
//! # Parameter quoting (for beginners)
//!
//! `ShellExecuteW` takes the arguments as a single string, which the new
//! process splits again using the `CommandLineToArgvW` rules.  A path such as
//! `C:\Program Files\x.json` must therefore be wrapped in quotes, and any
//! quote or trailing backslash inside it escaped.  [`build_parameters`] does
//! that.

#[cfg(target_os = "windows")]
mod windows;

use crate::application::ports::{ElevationError, Elevator};

/// [`Elevator`] backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemElevator;

impl SystemElevator {
    pub fn new() -> Self {
        Self
    }
}

impl Elevator for SystemElevator {
    #[cfg(target_os = "windows")]
    fn is_elevated(&self) -> bool {
        windows::is_user_admin()
    }

    #[cfg(not(target_os = "windows"))]
    fn is_elevated(&self) -> bool {
        true
    }

    #[cfg(target_os = "windows")]
    fn relaunch(&self, args: &[String]) -> Result<(), ElevationError> {
        let exe = std::env::current_exe().map_err(ElevationError::CurrentExe)?;
        windows::run_as(&exe, &build_parameters(args))
    }

    #[cfg(not(target_os = "windows"))]
    fn relaunch(&self, _args: &[String]) -> Result<(), ElevationError> {
        Err(ElevationError::Unsupported)
    }
}

/// Joins `args` into one command-line string, quoting where needed.
pub fn build_parameters(args: &[String]) -> String {
    args.iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_arg(arg: &str) -> String {
    let needs_quotes = arg.is_empty() || arg.contains([' ', '\t', '"']);
    if !needs_quotes {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                // Backslashes before a quote are escapes; double them, then
                // escape the quote itself.
                quoted.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat('\\').take(backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    // Trailing backslashes would escape the closing quote.
    quoted.extend(std::iter::repeat('\\').take(backslashes * 2));
    quoted.push('"');
    quoted
}
