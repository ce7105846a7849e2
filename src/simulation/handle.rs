/*!
 * Engine Handle
 * Lock-free channel between an engine and the callers around it
 */

use super::action::Action;
use super::snapshot::Snapshot;
use crate::core::types::Pid;
use crate::metrics::MetricsRecord;
use arc_swap::ArcSwapOption;
use crossbeam_queue::SegQueue;
use parking_lot::Mutex;
use std::sync::Arc;

/// State shared between an engine and its handles
///
/// Callers only push actions and read published values; the engine is the
/// sole writer of everything else. Terminated records are append-only, so a
/// termination costs one push and readers pay for their own copy.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) actions: SegQueue<Action>,
    pub(crate) snapshot: ArcSwapOption<Snapshot>,
    pub(crate) metrics: Mutex<Vec<MetricsRecord>>,
}

/// Cloneable handle for queuing actions and reading published state
#[derive(Debug, Clone)]
pub struct EngineHandle {
    shared: Arc<Shared>,
}

impl EngineHandle {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Queue a forced termination for the next tick
    pub fn request_terminate(&self, pid: Pid) {
        self.request(Action::Terminate(pid));
    }

    pub fn request_suspend(&self, pid: Pid) {
        self.request(Action::Suspend(pid));
    }

    pub fn request_resume(&self, pid: Pid) {
        self.request(Action::Resume(pid));
    }

    pub fn request(&self, action: Action) {
        self.shared.actions.push(action);
    }

    /// Actions queued but not yet drained
    pub fn pending_actions(&self) -> usize {
        self.shared.actions.len()
    }

    /// Snapshot published by the last completed tick
    pub fn latest_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.shared.snapshot.load_full()
    }

    /// Copy of the metrics of every process terminated so far
    pub fn terminated_metrics_snapshot(&self) -> Vec<MetricsRecord> {
        self.shared.metrics.lock().clone()
    }
}
