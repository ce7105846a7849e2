/*!
 * Event System
 * Strongly-typed simulation events handed to an event sink
 */

use crate::core::types::{Pid, Quantum, Tick};
use crate::scheduler::Algorithm;
use serde::Serialize;

/// Event severity for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

/// One notable transition in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SimulationStarted,
    SimulationStopped,
    ProcessCreated,
    StateChanged,
    TickExecuted,
    ProcessTerminated,
    Idle,
    MetricsCaptured,
    Error,
}

impl EventKind {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SimulationStarted => "simulation_started",
            Self::SimulationStopped => "simulation_stopped",
            Self::ProcessCreated => "process_created",
            Self::StateChanged => "state_changed",
            Self::TickExecuted => "tick_executed",
            Self::ProcessTerminated => "process_terminated",
            Self::Idle => "idle",
            Self::MetricsCaptured => "metrics_captured",
            Self::Error => "error",
        }
    }
}

/// Fields carried by every event; absent values stay `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventFields {
    pub tick: Tick,
    pub pid: Option<Pid>,
    pub state: Option<&'static str>,
    pub cpu: Option<u32>,
    pub mem: Option<u32>,
    pub algorithm: Algorithm,
    pub quantum: Option<Quantum>,
    pub detail: String,
}

impl EventFields {
    /// Run-level fields with no process attached
    #[inline]
    pub fn new(tick: Tick, algorithm: Algorithm, quantum: Option<Quantum>) -> Self {
        Self {
            tick,
            pid: None,
            state: None,
            cpu: None,
            mem: None,
            algorithm,
            quantum,
            detail: String::new(),
        }
    }

    #[inline]
    pub fn with_pid(mut self, pid: Pid) -> Self {
        self.pid = Some(pid);
        self
    }

    #[inline]
    pub fn with_state(mut self, state: &'static str) -> Self {
        self.state = Some(state);
        self
    }

    #[inline]
    pub fn with_usage(mut self, cpu: u32, mem: u32) -> Self {
        self.cpu = Some(cpu);
        self.mem = Some(mem);
        self
    }

    #[inline]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

/// Event as stored by in-memory sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedEvent {
    pub kind: EventKind,
    pub level: Level,
    pub fields: EventFields,
}
