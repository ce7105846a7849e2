/*!
 * FCFS Policy
 * Pure FIFO by insertion order, never preempts
 */

use super::traits::SchedulingPolicy;
use crate::core::types::Pid;
use crate::process::{Process, ProcessTable};
use std::collections::VecDeque;

/// First come, first served
#[derive(Debug, Default)]
pub struct Fcfs {
    queue: VecDeque<Pid>,
}

impl Fcfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchedulingPolicy for Fcfs {
    fn add(&mut self, process: &Process) {
        if process.is_terminated() || self.contains(process.pid()) {
            return;
        }
        self.queue.push_back(process.pid());
    }

    fn select(&mut self, table: &ProcessTable) -> Option<Pid> {
        while let Some(&head) = self.queue.front() {
            if table.state_of(head).is_some_and(|s| s.is_schedulable()) {
                return Some(head);
            }
            // Blocked, terminated or gone: purge rather than return
            self.queue.pop_front();
        }
        None
    }

    fn remove(&mut self, pid: Pid) {
        self.queue.retain(|&p| p != pid);
    }

    fn reset(&mut self) {
        self.queue.clear();
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, pid: Pid) -> bool {
        self.queue.contains(&pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessState;
    use crate::scheduler::test_support::table_with;

    #[test]
    fn test_insertion_order() {
        let table = table_with(&[(1, 9, 1), (2, 1, 1), (3, 5, 1)]);
        let mut fcfs = Fcfs::new();
        for p in table.iter() {
            fcfs.add(p);
        }
        assert_eq!(fcfs.select(&table), Some(1));
        fcfs.remove(1);
        assert_eq!(fcfs.select(&table), Some(2));
    }

    #[test]
    fn test_purges_blocked_and_terminated_heads() {
        let mut table = table_with(&[(1, 4, 1), (2, 4, 1), (3, 4, 1)]);
        let mut fcfs = Fcfs::new();
        for p in table.iter() {
            fcfs.add(p);
        }

        table.get_mut(1).unwrap().change_state(ProcessState::Blocked).unwrap();
        table.get_mut(2).unwrap().force_terminate(1);

        assert_eq!(fcfs.select(&table), Some(3));
        assert_eq!(fcfs.len(), 1);
    }

    #[test]
    fn test_ignores_terminated_and_duplicates() {
        let mut table = table_with(&[(1, 4, 1), (2, 4, 1)]);
        table.get_mut(2).unwrap().force_terminate(0);
        let mut fcfs = Fcfs::new();
        fcfs.add(table.get(1).unwrap());
        fcfs.add(table.get(1).unwrap());
        fcfs.add(table.get(2).unwrap());
        assert_eq!(fcfs.len(), 1);
        assert!(!fcfs.should_preempt(table.get(1).unwrap()));
    }

    #[test]
    fn test_empty_and_reset() {
        let table = table_with(&[(1, 4, 1)]);
        let mut fcfs = Fcfs::new();
        assert_eq!(fcfs.select(&table), None);
        fcfs.add(table.get(1).unwrap());
        fcfs.reset();
        assert!(fcfs.is_empty());
    }
}
