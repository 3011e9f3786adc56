//! ElevationGuard: make sure the service variant runs as administrator.
//!
//! `net start` / `net stop` need administrator rights.  Rather than failing
//! halfway through a launch, the guard runs before anything else:
//!
//! ```text
//! profile needs admin? ──no──► Proceed
//!        │ yes
//!        ▼
//! already elevated? ──yes──► Proceed
//!        │ no
//!        ▼
//! relaunch with "runas" ──► Relaunched (caller exits 0 immediately)
//! ```
//!
//! The elevated instance starts with the same arguments, so the guard fires
//! at most once per invocation chain.  The unelevated instance never waits for
//! the elevated one.

use potlink_core::{LaunchProfile, Variant};
use tracing::info;

use super::ports::{ElevationError, Elevator};

/// What the caller must do after [`check_elevation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationOutcome {
    /// Continue in this process.
    Proceed,
    /// An elevated copy was started; exit without further work.
    Relaunched,
}

/// Runs the elevation guard for `profile`.
///
/// `args` are the original command-line arguments without the program name.
/// `disabled` corresponds to `--no-elevate`.
///
/// # Errors
///
/// Returns the [`ElevationError`] from the relaunch request.
pub fn check_elevation(
    profile: &LaunchProfile,
    disabled: bool,
    elevator: &dyn Elevator,
    args: &[String],
) -> Result<ElevationOutcome, ElevationError> {
    if !profile.requires_elevation || disabled {
        return Ok(ElevationOutcome::Proceed);
    }
    if elevator.is_elevated() {
        return Ok(ElevationOutcome::Proceed);
    }

    info!("administrator rights required; relaunching elevated");
    elevator.relaunch(&relaunch_args(args, profile.variant))?;
    Ok(ElevationOutcome::Relaunched)
}

/// The original arguments, plus `--variant` when it came from the
/// environment rather than the command line.
pub fn relaunch_args(original: &[String], variant: Variant) -> Vec<String> {
    let mut args = original.to_vec();
    let explicit = original
        .iter()
        .any(|a| a == "--variant" || a.starts_with("--variant="));
    if !explicit {
        args.push("--variant".to_string());
        args.push(variant.to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockElevator;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_variant_without_elevation_never_checks() {
        // Arrange
        let mut elevator = MockElevator::new();
        elevator.expect_is_elevated().never();
        elevator.expect_relaunch().never();
        let profile = LaunchProfile::for_variant(Variant::AlistHelper);

        // Act
        let outcome = check_elevation(&profile, false, &elevator, &[]).unwrap();

        // Assert
        assert_eq!(outcome, ElevationOutcome::Proceed);
    }

    #[test]
    fn test_elevated_process_proceeds() {
        let mut elevator = MockElevator::new();
        elevator.expect_is_elevated().return_const(true);
        elevator.expect_relaunch().never();
        let profile = LaunchProfile::for_variant(Variant::OpenListService);

        let outcome = check_elevation(&profile, false, &elevator, &[]).unwrap();

        assert_eq!(outcome, ElevationOutcome::Proceed);
    }

    #[test]
    fn test_unelevated_process_relaunches_with_variant() {
        // Arrange
        let mut elevator = MockElevator::new();
        elevator.expect_is_elevated().return_const(false);
        elevator
            .expect_relaunch()
            .withf(|a| a.to_vec() == args(&["--config", "x.json", "--variant", "openlist-service"]))
            .times(1)
            .returning(|_| Ok(()));
        let profile = LaunchProfile::for_variant(Variant::OpenListService);

        // Act
        let outcome =
            check_elevation(&profile, false, &elevator, &args(&["--config", "x.json"])).unwrap();

        // Assert
        assert_eq!(outcome, ElevationOutcome::Relaunched);
    }

    #[test]
    fn test_refused_relaunch_is_an_error() {
        let mut elevator = MockElevator::new();
        elevator.expect_is_elevated().return_const(false);
        elevator
            .expect_relaunch()
            .returning(|_| Err(ElevationError::Refused(5)));
        let profile = LaunchProfile::for_variant(Variant::OpenListService);

        let result = check_elevation(&profile, false, &elevator, &[]);

        assert!(matches!(result, Err(ElevationError::Refused(5))));
    }

    #[test]
    fn test_no_elevate_flag_disables_guard() {
        let mut elevator = MockElevator::new();
        elevator.expect_is_elevated().never();
        let profile = LaunchProfile::for_variant(Variant::OpenListService);

        let outcome = check_elevation(&profile, true, &elevator, &[]).unwrap();

        assert_eq!(outcome, ElevationOutcome::Proceed);
    }

    #[test]
    fn test_relaunch_args_keep_explicit_variant() {
        let original = args(&["--variant=openlist-service"]);
        assert_eq!(relaunch_args(&original, Variant::OpenListService), original);
    }
}
