/*!
 * Actions and Arrivals
 * Commands queued by outside callers and explicit arrival descriptions
 */

use crate::core::limits::PROCESS_SEED_MULTIPLIER;
use crate::core::types::Pid;
use serde::{Deserialize, Serialize};

/// User-triggered command, applied at the start of the engine's next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "pid", rename_all = "snake_case")]
pub enum Action {
    Terminate(Pid),
    Suspend(Pid),
    Resume(Pid),
}

impl Action {
    #[inline]
    pub const fn pid(&self) -> Pid {
        match self {
            Self::Terminate(pid) | Self::Suspend(pid) | Self::Resume(pid) => *pid,
        }
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Terminate(_) => "terminate",
            Self::Suspend(_) => "suspend",
            Self::Resume(_) => "resume",
        }
    }
}

/// One process to admit on a coordinated tick
///
/// `burst` and `priority` are taken as given and validated when the process
/// is built, so a bad spec is reported by the engine that receives it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrivalSpec {
    pub pid: Pid,
    pub name: String,
    pub burst: i64,
    pub priority: i64,
    /// Seed of the process's own CPU/memory jitter
    pub seed: u64,
}

impl ArrivalSpec {
    pub fn new(pid: Pid, name: impl Into<String>, burst: i64, priority: i64, seed: u64) -> Self {
        Self {
            pid,
            name: name.into(),
            burst,
            priority,
            seed,
        }
    }

    /// Spec named `P<pid>` whose seed is derived from a run-wide base seed
    pub fn derived(pid: Pid, burst: i64, priority: i64, base_seed: u64) -> Self {
        Self::new(
            pid,
            format!("P{pid}"),
            burst,
            priority,
            process_seed(base_seed, pid),
        )
    }
}

/// Per-process seed: `(base * 31) ^ pid`
#[inline]
pub fn process_seed(base_seed: u64, pid: Pid) -> u64 {
    base_seed.wrapping_mul(PROCESS_SEED_MULTIPLIER) ^ u64::from(pid)
}
