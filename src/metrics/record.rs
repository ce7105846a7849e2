/*!
 * Metrics Record
 * Immutable per-process timing metrics captured at termination
 */

use crate::core::types::{Burst, Pid, Tick};
use crate::process::Process;
use crate::scheduler::Algorithm;
use serde::Serialize;

/// Timing metrics of one terminated process
///
/// - `turnaround = finish - arrival`
/// - `wait = turnaround - total_burst`
/// - `response = first_run - arrival`
///
/// A derived value is `None` when the tick it depends on was never reached
/// (a process terminated before it ever ran has no response time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsRecord {
    pub pid: Pid,
    pub name: String,
    pub algorithm: Algorithm,
    pub arrival_tick: Tick,
    pub first_run_tick: Option<Tick>,
    pub finish_tick: Option<Tick>,
    pub total_burst: Burst,
    pub executed_ticks: u64,
    pub waited_ticks: u64,
    pub response: Option<i64>,
    pub wait: Option<i64>,
    pub turnaround: Option<i64>,
    /// Terminated by a user action before its burst completed
    pub forced: bool,
}

impl MetricsRecord {
    /// Derive the record for `process` under `algorithm`
    pub fn capture(process: &Process, algorithm: Algorithm) -> Self {
        let arrival = process.arrival_tick();
        let first_run = process.first_run_tick();
        let finish = process.finish_tick();
        let total_burst = process.total_burst();

        let turnaround = finish.map(|f| signed(f) - signed(arrival));
        let wait = turnaround.map(|t| t - i64::from(total_burst));
        let response = first_run.map(|r| signed(r) - signed(arrival));

        Self {
            pid: process.pid(),
            name: process.name().to_string(),
            algorithm,
            arrival_tick: arrival,
            first_run_tick: first_run,
            finish_tick: finish,
            total_burst,
            executed_ticks: process.executed_ticks(),
            waited_ticks: process.waited_ticks(),
            response,
            wait,
            turnaround,
            forced: finish.is_some() && process.executed_ticks() < u64::from(total_burst),
        }
    }

    /// Whether the process ran its whole burst
    #[inline]
    pub fn completed_naturally(&self) -> bool {
        self.finish_tick.is_some() && !self.forced
    }
}

#[inline]
fn signed(tick: Tick) -> i64 {
    i64::try_from(tick).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessState;

    fn running(pid: Pid, arrival: Tick, burst: i64) -> Process {
        let mut p = Process::with_seed(pid, format!("P{pid}"), arrival, burst, 1, 9).unwrap();
        p.change_state(ProcessState::Ready).unwrap();
        p.change_state(ProcessState::Running).unwrap();
        p
    }

    #[test]
    fn test_natural_completion_identities() {
        let mut p = running(2, 0, 3);
        for tick in 6..=8 {
            p.advance_tick(tick);
        }
        let record = MetricsRecord::capture(&p, Algorithm::Fcfs);

        assert_eq!(record.turnaround, Some(8));
        assert_eq!(record.wait, Some(5));
        assert_eq!(record.response, Some(6));
        assert!(record.completed_naturally());
        assert_eq!(record.algorithm, Algorithm::Fcfs);
    }

    #[test]
    fn test_unfinished_process_has_no_derived_values() {
        let p = Process::with_seed(1, "P1", 4, 5, 1, 1).unwrap();
        let record = MetricsRecord::capture(&p, Algorithm::Sjf);
        assert_eq!(record.turnaround, None);
        assert_eq!(record.wait, None);
        assert_eq!(record.response, None);
        assert!(!record.forced);
    }

    #[test]
    fn test_forced_termination_is_flagged() {
        let mut p = running(3, 1, 8);
        p.advance_tick(2);
        p.force_terminate(7);
        let record = MetricsRecord::capture(&p, Algorithm::RoundRobin);

        assert!(record.forced);
        assert_eq!(record.finish_tick, Some(7));
        assert_eq!(record.turnaround, Some(6));
        assert_eq!(record.wait, Some(-2));
        assert_eq!(record.response, Some(1));
        assert_eq!(record.executed_ticks, 1);
    }

    #[test]
    fn test_forced_before_first_run_has_no_response() {
        let mut p = Process::with_seed(4, "P4", 2, 5, 1, 1).unwrap();
        p.force_terminate(3);
        let record = MetricsRecord::capture(&p, Algorithm::Priority);
        assert_eq!(record.response, None);
        assert_eq!(record.turnaround, Some(1));
    }
}
