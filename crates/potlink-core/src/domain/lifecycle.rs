//! Launch lifecycle state machine.
//!
//! ```text
//! Idle ──► HelperStarting ──► PlayerStarting ──► Running ──► CleaningUp ──► Done
//!               │                   │               │            ▲
//!               └───────────────────┴───────────────┴── fail ────┘
//! ```
//!
//! - `HelperStarting`: helper process spawned or service start issued, then
//!   readiness wait.
//! - `PlayerStarting`: player process being spawned.
//! - `Running`: blocked on the player exiting.
//! - `CleaningUp`: teardown steps executing.  Entered exactly once.
//! - `Done`: terminal.
//!
//! [`Lifecycle::fail`] is the error path: from any starting state or
//! `Running` it jumps straight to `CleaningUp`, so teardown cannot be skipped.

use thiserror::Error;
use tracing::debug;

/// Phase of a single launcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Idle,
    HelperStarting,
    PlayerStarting,
    Running,
    CleaningUp,
    Done,
}

/// Rejected state change.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("illegal lifecycle transition {from:?} -> {to:?}")]
    IllegalTransition { from: LaunchState, to: LaunchState },
}

impl LaunchState {
    /// The single forward successor of this state, if any.
    pub fn next(self) -> Option<LaunchState> {
        match self {
            LaunchState::Idle => Some(LaunchState::HelperStarting),
            LaunchState::HelperStarting => Some(LaunchState::PlayerStarting),
            LaunchState::PlayerStarting => Some(LaunchState::Running),
            LaunchState::Running => Some(LaunchState::CleaningUp),
            LaunchState::CleaningUp => Some(LaunchState::Done),
            LaunchState::Done => None,
        }
    }

    /// Whether the error path may be taken from this state.
    pub fn can_fail(self) -> bool {
        matches!(
            self,
            LaunchState::HelperStarting | LaunchState::PlayerStarting | LaunchState::Running
        )
    }
}

/// Tracks the current [`LaunchState`] and enforces the transition graph.
#[derive(Debug)]
pub struct Lifecycle {
    state: LaunchState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: LaunchState::Idle,
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    /// Moves to `to` if it is the forward successor of the current state.
    pub fn advance(&mut self, to: LaunchState) -> Result<(), LifecycleError> {
        if self.state.next() == Some(to) {
            debug!("lifecycle {:?} -> {:?}", self.state, to);
            self.state = to;
            Ok(())
        } else {
            Err(LifecycleError::IllegalTransition {
                from: self.state,
                to,
            })
        }
    }

    /// Takes the error path into `CleaningUp`.
    pub fn fail(&mut self) -> Result<(), LifecycleError> {
        if self.state.can_fail() {
            debug!("lifecycle {:?} -> CleaningUp (failure)", self.state);
            self.state = LaunchState::CleaningUp;
            Ok(())
        } else {
            Err(LifecycleError::IllegalTransition {
                from: self.state,
                to: LaunchState::CleaningUp,
            })
        }
    }
}
