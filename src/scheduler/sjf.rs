/*!
 * Shortest-Remaining Policy
 * Ready set ordered by (remaining burst ascending, pid ascending)
 */

use super::traits::SchedulingPolicy;
use crate::core::types::{Burst, Pid};
use crate::process::{Process, ProcessState, ProcessTable};

/// Shortest job first, non-preemptive
///
/// Selection only matters while the CPU is free: a RUNNING entry keeps the
/// CPU even when a shorter job arrives.
#[derive(Debug, Default)]
pub struct ShortestRemaining {
    entries: Vec<(Burst, Pid)>,
}

impl ShortestRemaining {
    pub fn new() -> Self {
        Self::default()
    }

    fn sort(&mut self) {
        self.entries.sort_unstable();
    }
}

impl SchedulingPolicy for ShortestRemaining {
    fn add(&mut self, process: &Process) {
        if process.is_terminated() {
            return;
        }
        self.remove(process.pid());
        self.entries.push((process.remaining_burst(), process.pid()));
        self.sort();
    }

    fn select(&mut self, table: &ProcessTable) -> Option<Pid> {
        let mut running = None;
        self.entries.retain_mut(|entry| match table.get(entry.1) {
            Some(p) if p.state().is_schedulable() => {
                entry.0 = p.remaining_burst();
                if p.state() == ProcessState::Running {
                    running = Some(entry.1);
                }
                true
            }
            _ => false,
        });
        self.sort();

        running.or_else(|| self.entries.first().map(|&(_, pid)| pid))
    }

    fn remove(&mut self, pid: Pid) {
        self.entries.retain(|&(_, p)| p != pid);
    }

    fn reset(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, pid: Pid) -> bool {
        self.entries.iter().any(|&(_, p)| p == pid)
    }
}
