/*!
 * Process Types
 * Lifecycle states of a simulated process
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process state
///
/// `NEW -> READY <-> RUNNING -> TERMINATED`, with the user-driven side branch
/// `READY/RUNNING -> SUSPENDED -> READY` and forced termination from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Constructed but not yet admitted to a ready set
    New,
    /// Waiting for the CPU
    Ready,
    /// Holding the CPU this tick
    Running,
    /// Waiting on an event; never scheduled
    Blocked,
    /// Parked by the user; neither runs nor waits
    Suspended,
    /// Finished, naturally or by force
    Terminated,
}

impl ProcessState {
    /// Label used in snapshots and events
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Blocked => "BLOCKED",
            Self::Suspended => "SUSPENDED",
            Self::Terminated => "TERMINATED",
        }
    }

    /// States a scheduling policy may hand out
    #[inline(always)]
    pub const fn is_schedulable(&self) -> bool {
        matches!(self, Self::Ready | Self::Running)
    }

    #[inline(always)]
    pub const fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Engine-driven transitions accepted by [`Process::change_state`].
    ///
    /// Entering TERMINATED is reserved to natural completion and forced
    /// termination, so it never appears here.
    ///
    /// [`Process::change_state`]: super::Process::change_state
    pub const fn can_transition_to(&self, next: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (*self, next),
            (New, Ready)
                | (Ready, Ready)
                | (Ready, Running)
                | (Ready, Blocked)
                | (Ready, Suspended)
                | (Running, Ready)
                | (Running, Blocked)
                | (Running, Suspended)
                | (Blocked, Ready)
                | (Suspended, Ready)
        )
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
