/*!
 * Scheduler Module
 * Pluggable ready-set policies behind one capability-tagged type
 */

mod fcfs;
mod priority;
mod round_robin;
mod sjf;
pub mod traits;
pub mod types;

pub use fcfs::Fcfs;
pub use priority::PriorityPolicy;
pub use round_robin::RoundRobin;
pub use sjf::ShortestRemaining;
pub use traits::SchedulingPolicy;
pub use types::Algorithm;

use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::{Pid, Quantum};
use crate::process::{Process, ProcessTable};
use tracing::info;

/// Scheduler for one run: one variant per algorithm tag
///
/// Round-robin is the only variant with an operation beyond the common
/// contract (`rotate`), reachable through [`Scheduler::as_round_robin_mut`].
#[derive(Debug)]
pub enum Scheduler {
    Fcfs(Fcfs),
    Priority(PriorityPolicy),
    Sjf(ShortestRemaining),
    RoundRobin(RoundRobin),
}

impl Scheduler {
    /// Build the policy for `algorithm`, failing fast on bad parameters.
    ///
    /// `quantum` is required for round-robin and ignored otherwise.
    pub fn new(algorithm: Algorithm, quantum: Option<Quantum>) -> SchedulerResult<Self> {
        let scheduler = match algorithm {
            Algorithm::Fcfs => Self::Fcfs(Fcfs::new()),
            Algorithm::Priority => Self::Priority(PriorityPolicy::new()),
            Algorithm::PriorityPreemptive => Self::Priority(PriorityPolicy::preemptive()),
            Algorithm::Sjf => Self::Sjf(ShortestRemaining::new()),
            Algorithm::RoundRobin => match quantum {
                None => return Err(SchedulerError::MissingQuantum),
                Some(0) => return Err(SchedulerError::InvalidQuantum(0)),
                Some(q) => Self::RoundRobin(RoundRobin::new(q)),
            },
        };

        info!(algorithm = %algorithm, quantum = ?scheduler.quantum(), "Scheduler initialized");
        Ok(scheduler)
    }

    /// Parse an algorithm name and build its policy
    pub fn from_name(name: &str, quantum: Option<Quantum>) -> SchedulerResult<Self> {
        Self::new(name.parse()?, quantum)
    }

    /// Algorithm tag of this instance
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Fcfs(_) => Algorithm::Fcfs,
            Self::Priority(p) if p.is_preemptive() => Algorithm::PriorityPreemptive,
            Self::Priority(_) => Algorithm::Priority,
            Self::Sjf(_) => Algorithm::Sjf,
            Self::RoundRobin(_) => Algorithm::RoundRobin,
        }
    }

    /// Quantum in ticks (round-robin only)
    pub fn quantum(&self) -> Option<Quantum> {
        match self {
            Self::RoundRobin(rr) => Some(rr.quantum()),
            _ => None,
        }
    }

    pub fn as_round_robin_mut(&mut self) -> Option<&mut RoundRobin> {
        match self {
            Self::RoundRobin(rr) => Some(rr),
            _ => None,
        }
    }

    fn policy(&self) -> &dyn SchedulingPolicy {
        match self {
            Self::Fcfs(p) => p,
            Self::Priority(p) => p,
            Self::Sjf(p) => p,
            Self::RoundRobin(p) => p,
        }
    }

    fn policy_mut(&mut self) -> &mut dyn SchedulingPolicy {
        match self {
            Self::Fcfs(p) => p,
            Self::Priority(p) => p,
            Self::Sjf(p) => p,
            Self::RoundRobin(p) => p,
        }
    }
}

impl SchedulingPolicy for Scheduler {
    fn add(&mut self, process: &Process) {
        self.policy_mut().add(process)
    }

    fn select(&mut self, table: &ProcessTable) -> Option<Pid> {
        self.policy_mut().select(table)
    }

    fn remove(&mut self, pid: Pid) {
        self.policy_mut().remove(pid)
    }

    fn reset(&mut self) {
        self.policy_mut().reset()
    }

    fn on_tick(&mut self, running: &Process) {
        self.policy_mut().on_tick(running)
    }

    fn should_preempt(&self, running: &Process) -> bool {
        self.policy().should_preempt(running)
    }

    fn len(&self) -> usize {
        self.policy().len()
    }

    fn contains(&self, pid: Pid) -> bool {
        self.policy().contains(pid)
    }
}
