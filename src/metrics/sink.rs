/*!
 * Metrics Sinks
 * Export finished-run metrics to CSV or JSON files
 */

use super::record::MetricsRecord;
use super::summary::{Comparison, MetricsSummary};
use crate::core::errors::MetricsError;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Column order of the per-process CSV
pub const CSV_HEADER: &str =
    "pid,name,algorithm,arrival,first_run,finish,burst,executed,waited,response,wait,turnaround,forced";

/// Destination for a finished run's metrics
pub trait MetricsSink {
    fn export(&self, records: &[MetricsRecord]) -> Result<(), MetricsError>;
}

/// Per-process CSV plus an optional summary CSV
#[derive(Debug, Clone)]
pub struct CsvMetricsSink {
    path: PathBuf,
    summary_path: Option<PathBuf>,
}

impl CsvMetricsSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            summary_path: None,
        }
    }

    /// Also write `metric,value` means to `path`
    pub fn with_summary(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = Some(path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a two-column summary of a paired run
    pub fn write_comparison(path: &Path, comparison: &Comparison) -> Result<(), MetricsError> {
        let mut out = create(path)?;
        writeln!(
            out,
            "metric,{},{}",
            label(&comparison.a),
            label(&comparison.b)
        )?;
        for ((name, a), (_, b)) in comparison.a.rows().iter().zip(comparison.b.rows().iter()) {
            writeln!(out, "{name},{a:.2},{b:.2}")?;
        }
        writeln!(
            out,
            "processes,{},{}",
            comparison.a.processes, comparison.b.processes
        )?;
        out.flush()?;
        Ok(())
    }

    fn write_records(&self, records: &[MetricsRecord]) -> Result<(), MetricsError> {
        let mut out = create(&self.path)?;
        writeln!(out, "{CSV_HEADER}")?;
        for r in records {
            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{},{},{},{}",
                r.pid,
                escape(&r.name),
                r.algorithm,
                r.arrival_tick,
                cell(r.first_run_tick),
                cell(r.finish_tick),
                r.total_burst,
                r.executed_ticks,
                r.waited_ticks,
                cell(r.response),
                cell(r.wait),
                cell(r.turnaround),
                r.forced
            )?;
        }
        out.flush()?;
        Ok(())
    }

    fn write_summary(path: &Path, summary: &MetricsSummary) -> Result<(), MetricsError> {
        let mut out = create(path)?;
        writeln!(out, "metric,value")?;
        writeln!(out, "algorithm,{}", label(summary))?;
        writeln!(out, "processes,{}", summary.processes)?;
        for (name, value) in summary.rows() {
            writeln!(out, "{name},{value:.2}")?;
        }
        out.flush()?;
        Ok(())
    }
}

impl MetricsSink for CsvMetricsSink {
    fn export(&self, records: &[MetricsRecord]) -> Result<(), MetricsError> {
        self.write_records(records)?;
        if let Some(summary_path) = &self.summary_path {
            Self::write_summary(summary_path, &MetricsSummary::from_records(records))?;
        }
        info!(path = %self.path.display(), records = records.len(), "Exported metrics CSV");
        Ok(())
    }
}

/// Records and their summary as one pretty-printed JSON document
#[derive(Debug, Clone)]
pub struct JsonMetricsSink {
    path: PathBuf,
}

impl JsonMetricsSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    summary: MetricsSummary,
    records: &'a [MetricsRecord],
}

impl MetricsSink for JsonMetricsSink {
    fn export(&self, records: &[MetricsRecord]) -> Result<(), MetricsError> {
        let report = JsonReport {
            summary: MetricsSummary::from_records(records),
            records,
        };
        let mut out = create(&self.path)?;
        serde_json::to_writer_pretty(&mut out, &report)?;
        out.flush()?;
        info!(path = %self.path.display(), records = records.len(), "Exported metrics JSON");
        Ok(())
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, MetricsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Empty cell for an undefined value
fn cell<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn label(summary: &MetricsSummary) -> String {
    summary
        .algorithm
        .map(|a| a.to_string())
        .unwrap_or_else(|| "-".to_string())
}
