/*!
 * Monitoring
 * Simulation events, injectable sinks, and tracing setup
 */

pub mod events;
mod sink;
mod tracer;

pub use events::{EventFields, EventKind, Level, RecordedEvent};
pub use sink::{EventSink, MemorySink, TracingSink};
pub use tracer::{init_tracing, span_engine, TRACE_JSON_ENV};
