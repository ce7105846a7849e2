/*!
 * Snapshots
 * Immutable per-tick view of the live process list
 */

use crate::core::types::{Burst, Pid, Priority, Tick};
use crate::process::{Process, ProcessState, ProcessTable};
use serde::Serialize;

/// One live process as seen at the end of a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRow {
    pub pid: Pid,
    pub name: String,
    pub state: ProcessState,
    pub cpu: u32,
    pub memory: u32,
    pub priority: Priority,
    pub remaining_burst: Burst,
}

impl From<&Process> for ProcessRow {
    fn from(p: &Process) -> Self {
        Self {
            pid: p.pid(),
            name: p.name().to_string(),
            state: p.state(),
            cpu: p.cpu_usage(),
            memory: p.memory(),
            priority: p.priority(),
            remaining_burst: p.remaining_burst(),
        }
    }
}

/// State of a run after a tick; detached from the engine's live data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub tick: Tick,
    pub active_count: usize,
    pub rows: Vec<ProcessRow>,
}

impl Snapshot {
    /// Copy every non-terminated process, in admission order
    pub fn capture(tick: Tick, table: &ProcessTable) -> Self {
        let rows: Vec<ProcessRow> = table
            .iter()
            .filter(|p| !p.is_terminated())
            .map(ProcessRow::from)
            .collect();

        Self {
            tick,
            active_count: rows.len(),
            rows,
        }
    }

    pub fn row(&self, pid: Pid) -> Option<&ProcessRow> {
        self.rows.iter().find(|r| r.pid == pid)
    }

    /// PID holding the CPU, if any
    pub fn running(&self) -> Option<Pid> {
        self.rows
            .iter()
            .find(|r| r.state == ProcessState::Running)
            .map(|r| r.pid)
    }
}
