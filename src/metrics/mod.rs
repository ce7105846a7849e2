/*!
 * Metrics
 * Per-process timing records, run summaries and file export
 */

mod record;
mod sink;
mod summary;

pub use record::MetricsRecord;
pub use sink::{CsvMetricsSink, JsonMetricsSink, MetricsSink, CSV_HEADER};
pub use summary::{Comparison, MetricsSummary};
