/*!
 * Round-Robin Policy
 * FIFO queue with a per-process quantum counter
 */

use super::traits::SchedulingPolicy;
use crate::core::types::{Pid, Quantum};
use crate::process::{Process, ProcessTable};
use ahash::AHashMap;
use std::collections::VecDeque;

/// Round-robin with a fixed quantum in ticks
#[derive(Debug)]
pub struct RoundRobin {
    quantum: Quantum,
    queue: VecDeque<Pid>,
    remaining: AHashMap<Pid, Quantum>,
}

impl RoundRobin {
    /// `quantum` must be at least one tick; the factory validates it
    pub fn new(quantum: Quantum) -> Self {
        Self {
            quantum: quantum.max(1),
            queue: VecDeque::new(),
            remaining: AHashMap::new(),
        }
    }

    #[inline]
    pub fn quantum(&self) -> Quantum {
        self.quantum
    }

    /// Ticks left in the current turn of `pid`
    pub fn quantum_remaining(&self, pid: Pid) -> Option<Quantum> {
        self.remaining.get(&pid).copied()
    }

    /// Move `pid` to the tail of the queue with a fresh quantum
    pub fn rotate(&mut self, pid: Pid) {
        if self.queue.front() == Some(&pid) {
            self.queue.pop_front();
        } else {
            self.queue.retain(|&p| p != pid);
        }
        self.queue.push_back(pid);
        self.remaining.insert(pid, self.quantum);
    }

    /// Current queue order, head first
    pub fn order(&self) -> Vec<Pid> {
        self.queue.iter().copied().collect()
    }
}

impl SchedulingPolicy for RoundRobin {
    fn add(&mut self, process: &Process) {
        if process.is_terminated() {
            return;
        }
        let pid = process.pid();
        if !self.queue.contains(&pid) {
            self.queue.push_back(pid);
        }
        // Every (re)insertion starts a fresh turn
        self.remaining.insert(pid, self.quantum);
    }

    fn select(&mut self, table: &ProcessTable) -> Option<Pid> {
        while let Some(&head) = self.queue.front() {
            if table.state_of(head).is_some_and(|s| s.is_schedulable()) {
                return Some(head);
            }
            self.queue.pop_front();
            self.remaining.remove(&head);
        }
        None
    }

    fn remove(&mut self, pid: Pid) {
        self.queue.retain(|&p| p != pid);
        self.remaining.remove(&pid);
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.remaining.clear();
    }

    fn on_tick(&mut self, running: &Process) {
        if let Some(left) = self.remaining.get_mut(&running.pid()) {
            *left = left.saturating_sub(1);
        }
    }

    fn should_preempt(&self, running: &Process) -> bool {
        !running.is_terminated() && self.quantum_remaining(running.pid()) == Some(0)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, pid: Pid) -> bool {
        self.queue.contains(&pid)
    }
}
