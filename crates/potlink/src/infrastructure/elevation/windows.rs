//! Windows shell calls for the elevation guard.

use std::path::Path;

use tracing::debug;
use windows::core::{w, HSTRING, PCWSTR};
use windows::Win32::UI::Shell::{IsUserAnAdmin, ShellExecuteW};
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

use crate::application::ports::ElevationError;

/// `ShellExecuteW` returns a value greater than this on success.
const SHELL_EXECUTE_SUCCESS_MIN: isize = 32;

pub fn is_user_admin() -> bool {
    // SAFETY: IsUserAnAdmin takes no arguments and only reads the current
    // process token.
    unsafe { IsUserAnAdmin() }.as_bool()
}

/// Starts `exe` with `parameters` through the "runas" verb.
pub fn run_as(exe: &Path, parameters: &str) -> Result<(), ElevationError> {
    let file = HSTRING::from(exe.as_os_str());
    let params = HSTRING::from(parameters);
    debug!("ShellExecuteW runas {} {parameters}", exe.display());

    // SAFETY: every pointer argument is either null or borrows an HSTRING
    // that outlives the call.
    let result = unsafe {
        ShellExecuteW(
            None,
            w!("runas"),
            &file,
            &params,
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };

    let code = result.0 as isize;
    if code > SHELL_EXECUTE_SUCCESS_MIN {
        Ok(())
    } else {
        Err(ElevationError::Refused(code))
    }
}
