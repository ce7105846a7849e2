/*!
 * Process Table
 * The engine's master list of live processes, in admission order
 */

use super::entity::Process;
use super::types::ProcessState;
use crate::core::errors::{ProcessError, ProcessResult};
use crate::core::types::Pid;
use ahash::AHashMap;

/// Live processes indexed by PID
///
/// Iteration order is admission order, which keeps snapshots and wait
/// accounting deterministic across paired runs.
#[derive(Debug, Default)]
pub struct ProcessTable {
    processes: Vec<Process>,
    index: AHashMap<Pid, usize>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a process; fails if the PID is already live
    pub fn insert(&mut self, process: Process) -> ProcessResult<()> {
        let pid = process.pid();
        if self.index.contains_key(&pid) {
            return Err(ProcessError::DuplicatePid(pid));
        }
        self.index.insert(pid, self.processes.len());
        self.processes.push(process);
        Ok(())
    }

    #[inline]
    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.index.get(&pid).map(|&slot| &self.processes[slot])
    }

    #[inline]
    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        match self.index.get(&pid) {
            Some(&slot) => Some(&mut self.processes[slot]),
            None => None,
        }
    }

    /// Lookup that reports a missing PID as an error
    pub fn require_mut(&mut self, pid: Pid) -> ProcessResult<&mut Process> {
        self.get_mut(pid).ok_or(ProcessError::NotFound(pid))
    }

    /// State of a live process, if present
    #[inline]
    pub fn state_of(&self, pid: Pid) -> Option<ProcessState> {
        self.get(pid).map(Process::state)
    }

    /// Drop a process from the table, preserving the order of the rest
    pub fn remove(&mut self, pid: Pid) -> Option<Process> {
        let slot = self.index.remove(&pid)?;
        let process = self.processes.remove(slot);
        for entry in self.index.values_mut() {
            if *entry > slot {
                *entry -= 1;
            }
        }
        Some(process)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Process> {
        self.processes.iter_mut()
    }

    /// Processes that have not terminated
    pub fn live_count(&self) -> usize {
        self.processes.iter().filter(|p| !p.is_terminated()).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        self.index.contains_key(&pid)
    }
}
