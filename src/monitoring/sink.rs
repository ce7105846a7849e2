/*!
 * Event Sinks
 * Injected destinations for simulation events
 */

use super::events::{EventFields, EventKind, Level, RecordedEvent};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

/// Destination for simulation events
///
/// Handed to each engine at construction so paired engines never share a
/// global logger. Implementations absorb their own failures: `record` must
/// never fail back into the tick.
pub trait EventSink: Send + Sync {
    fn record(&self, kind: EventKind, level: Level, fields: EventFields);
}

/// Forwards events to `tracing` with structured fields
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

macro_rules! emit {
    ($macro:ident, $kind:expr, $f:expr) => {
        $macro!(
            target: "sched_sim::events",
            event = $kind.as_str(),
            tick = $f.tick,
            pid = ?$f.pid,
            state = ?$f.state,
            cpu = ?$f.cpu,
            mem = ?$f.mem,
            algorithm = %$f.algorithm,
            quantum = ?$f.quantum,
            detail = %$f.detail
        )
    };
}

impl EventSink for TracingSink {
    fn record(&self, kind: EventKind, level: Level, fields: EventFields) {
        match level {
            Level::Debug => emit!(debug, kind, fields),
            Level::Info => emit!(info, kind, fields),
            Level::Warn => emit!(warn, kind, fields),
            Level::Error => emit!(error, kind, fields),
        }
    }
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Events of one kind
    pub fn of_kind(&self, kind: EventKind) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.lock().iter().filter(|e| e.kind == kind).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for MemorySink {
    fn record(&self, kind: EventKind, level: Level, fields: EventFields) {
        self.events.lock().push(RecordedEvent {
            kind,
            level,
            fields,
        });
    }
}
