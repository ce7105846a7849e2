/*!
 * Priority Policy
 * Ready set ordered by (priority ascending, pid ascending)
 */

use super::traits::SchedulingPolicy;
use crate::core::types::{Pid, Priority};
use crate::process::{Process, ProcessState, ProcessTable};

/// Static-priority scheduling
///
/// Non-preemptive by default: once a process holds the CPU a better arrival
/// waits for it. The preemptive flavour asks the engine to give the CPU up
/// as soon as a strictly better key is waiting.
#[derive(Debug, Default)]
pub struct PriorityPolicy {
    // Sorted by key; priority never changes after construction
    entries: Vec<(Priority, Pid)>,
    preemptive: bool,
}

impl PriorityPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preemptive() -> Self {
        Self {
            entries: Vec::new(),
            preemptive: true,
        }
    }

    #[inline]
    pub fn is_preemptive(&self) -> bool {
        self.preemptive
    }
}

impl SchedulingPolicy for PriorityPolicy {
    fn add(&mut self, process: &Process) {
        if process.is_terminated() {
            return;
        }
        self.remove(process.pid());
        let key = (process.priority(), process.pid());
        let slot = self.entries.partition_point(|entry| *entry < key);
        self.entries.insert(slot, key);
    }

    fn select(&mut self, table: &ProcessTable) -> Option<Pid> {
        self.entries
            .retain(|&(_, pid)| table.state_of(pid).is_some_and(|s| s.is_schedulable()));

        if !self.preemptive {
            let running = self
                .entries
                .iter()
                .find(|&&(_, pid)| table.state_of(pid) == Some(ProcessState::Running));
            if let Some(&(_, pid)) = running {
                return Some(pid);
            }
        }

        self.entries.first().map(|&(_, pid)| pid)
    }

    fn remove(&mut self, pid: Pid) {
        self.entries.retain(|&(_, p)| p != pid);
    }

    fn reset(&mut self) {
        self.entries.clear();
    }

    fn should_preempt(&self, running: &Process) -> bool {
        if !self.preemptive || running.is_terminated() {
            return false;
        }
        let key = (running.priority(), running.pid());
        self.entries
            .iter()
            .any(|&entry| entry.1 != running.pid() && entry < key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, pid: Pid) -> bool {
        self.entries.iter().any(|&(_, p)| p == pid)
    }
}
