/*!
 * CPU Scheduling Simulator Library
 * Tick-driven process scheduling with pluggable policies and run metrics
 */

pub mod core;
pub mod metrics;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod simulation;

// Re-exports
pub use crate::core::errors::*;
pub use crate::core::types::*;
pub use metrics::{
    Comparison, CsvMetricsSink, JsonMetricsSink, MetricsRecord, MetricsSink, MetricsSummary,
};
pub use monitoring::{init_tracing, EventKind, EventSink, Level, MemorySink, TracingSink};
pub use process::{Process, ProcessState, ProcessTable};
pub use scheduler::{Algorithm, Scheduler, SchedulingPolicy};
pub use simulation::{
    Action, ArrivalSpec, Comparator, ComparisonReport, Engine, EngineHandle, GenerationMode,
    ProcessRow, RunState, Simulation, SimulationConfig, Snapshot,
};
