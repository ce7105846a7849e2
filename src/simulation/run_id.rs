/*!
 * Run Identifiers
 * Timestamped run ids and the export paths derived from them
 */

use crate::scheduler::Algorithm;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;

/// `run-yyyy_mm_dd-HH_MM_SS` for the current UTC time
pub fn run_id() -> String {
    run_id_at(OffsetDateTime::now_utc())
}

pub fn run_id_at(at: OffsetDateTime) -> String {
    let format = format_description!("[year]_[month]_[day]-[hour]_[minute]_[second]");
    match at.format(format) {
        Ok(stamp) => format!("run-{stamp}"),
        Err(_) => format!("run-{}", at.unix_timestamp()),
    }
}

/// `<dir>/metrics-<ALG>-<run_id>.csv`
pub fn single_run_metrics_path(dir: &Path, algorithm: Algorithm, run_id: &str) -> PathBuf {
    dir.join(format!("metrics-{algorithm}-{run_id}.csv"))
}

/// `<dir>/compare/<run_id>`
pub fn compare_dir(dir: &Path, run_id: &str) -> PathBuf {
    dir.join("compare").join(run_id)
}

/// `<dir>/compare/<run_id>/metrics-<ALG>.csv`
pub fn compare_metrics_path(dir: &Path, run_id: &str, algorithm: Algorithm) -> PathBuf {
    compare_dir(dir, run_id).join(format!("metrics-{algorithm}.csv"))
}
