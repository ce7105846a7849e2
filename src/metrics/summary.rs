/*!
 * Metrics Summary
 * Mean timings over a run and side-by-side comparison of two runs
 */

use super::record::MetricsRecord;
use crate::scheduler::Algorithm;
use serde::Serialize;

/// Averages over a collection of records
///
/// Each mean covers only the records where the value is defined; an empty
/// population yields 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub algorithm: Option<Algorithm>,
    pub processes: usize,
    pub mean_wait: f64,
    pub mean_response: f64,
    pub mean_turnaround: f64,
    pub mean_executed: f64,
    pub mean_burst: f64,
}

impl MetricsSummary {
    pub fn from_records(records: &[MetricsRecord]) -> Self {
        let algorithm = records.first().map(|r| r.algorithm);

        Self {
            algorithm,
            processes: records.len(),
            mean_wait: mean(records.iter().filter_map(|r| r.wait)),
            mean_response: mean(records.iter().filter_map(|r| r.response)),
            mean_turnaround: mean(records.iter().filter_map(|r| r.turnaround)),
            mean_executed: mean(records.iter().map(|r| r.executed_ticks as i64)),
            mean_burst: mean(records.iter().map(|r| i64::from(r.total_burst))),
        }
    }

    /// (label, value) rows in export order
    pub fn rows(&self) -> [(&'static str, f64); 5] {
        [
            ("mean_wait", self.mean_wait),
            ("mean_response", self.mean_response),
            ("mean_turnaround", self.mean_turnaround),
            ("mean_executed", self.mean_executed),
            ("mean_burst", self.mean_burst),
        ]
    }
}

fn mean(values: impl Iterator<Item = i64>) -> f64 {
    let (sum, count) = values.fold((0i64, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Two runs under the same workload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub a: MetricsSummary,
    pub b: MetricsSummary,
}

impl Comparison {
    pub fn new(a: &[MetricsRecord], b: &[MetricsRecord]) -> Self {
        Self {
            a: MetricsSummary::from_records(a),
            b: MetricsSummary::from_records(b),
        }
    }

    /// Run with the lower mean wait; `None` on a tie
    pub fn lower_mean_wait(&self) -> Option<Algorithm> {
        if self.a.mean_wait < self.b.mean_wait {
            self.a.algorithm
        } else if self.b.mean_wait < self.a.mean_wait {
            self.b.algorithm
        } else {
            None
        }
    }
}
