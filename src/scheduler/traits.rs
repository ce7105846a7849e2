/*!
 * Scheduling Policy Trait
 * Interface shared by every ready-set strategy
 */

use crate::core::types::Pid;
use crate::process::{Process, ProcessTable};

/// Ready-set strategy
///
/// A policy never owns processes. It indexes them by PID and reads their
/// current state from the engine's [`ProcessTable`] when it has to choose.
pub trait SchedulingPolicy: Send {
    /// Insert into the ready set. Terminated processes are ignored and a PID
    /// already present is not duplicated.
    fn add(&mut self, process: &Process);

    /// Process that should run this tick.
    ///
    /// Entries that are no longer READY or RUNNING (or have left the table)
    /// are purged as a side effect. Repeated calls without `add`/`remove` in
    /// between return the same PID.
    fn select(&mut self, table: &ProcessTable) -> Option<Pid>;

    /// Drop a process (natural completion or forced removal)
    fn remove(&mut self, pid: Pid);

    /// Clear all internal state
    fn reset(&mut self);

    /// Called once per tick with the process that actually ran
    fn on_tick(&mut self, _running: &Process) {}

    /// Whether the running process must give up the CPU now
    fn should_preempt(&self, _running: &Process) -> bool {
        false
    }

    /// Number of indexed entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, pid: Pid) -> bool;
}
