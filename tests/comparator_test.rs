/*!
 * Comparator Tests
 * Paired runs see identical arrivals whatever the policies do
 */

use cpu_sched_sim::monitoring::RecordedEvent;
use cpu_sched_sim::{
    Algorithm, ArrivalSpec, Comparator, Engine, EventKind, MemorySink, SimulationConfig,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// (tick, pid, detail) of every arrival seen by one algorithm
fn arrivals(events: &[RecordedEvent], algorithm: Algorithm) -> Vec<(u64, Option<u32>, String)> {
    events
        .iter()
        .filter(|e| e.kind == EventKind::ProcessCreated && e.fields.algorithm == algorithm)
        .map(|e| (e.fields.tick, e.fields.pid, e.fields.detail.clone()))
        .collect()
}

fn base() -> SimulationConfig {
    SimulationConfig::default()
        .with_quantum(2)
        .with_seed(2024)
        .with_arrival_probability(0.4)
}

#[test]
fn test_scenario_d_identical_arrival_timelines() {
    let sink = Arc::new(MemorySink::new());
    let mut comparator =
        Comparator::new(base(), Algorithm::Fcfs, Algorithm::RoundRobin, sink.clone()).unwrap();
    for _ in 0..80 {
        comparator.tick().unwrap();
    }

    let events = sink.events();
    let fcfs = arrivals(&events, Algorithm::Fcfs);
    let rr = arrivals(&events, Algorithm::RoundRobin);
    assert!(!fcfs.is_empty());
    assert_eq!(fcfs, rr);

    let pids: Vec<u32> = fcfs.iter().filter_map(|a| a.1).collect();
    assert_eq!(pids, (1..=pids.len() as u32).collect::<Vec<_>>());
}

#[test]
fn test_engines_fed_same_specs_agree_on_workload() {
    let specs = vec![
        vec![ArrivalSpec::derived(1, 6, 3, 7), ArrivalSpec::derived(2, 2, 1, 7)],
        vec![],
        vec![ArrivalSpec::derived(3, 4, 2, 7)],
    ];
    let mut sjf = Engine::coordinated(
        SimulationConfig::new(Algorithm::Sjf),
        Arc::new(MemorySink::new()),
    )
    .unwrap();
    let mut prio = Engine::coordinated(
        SimulationConfig::new(Algorithm::Priority),
        Arc::new(MemorySink::new()),
    )
    .unwrap();

    for arrivals in specs.iter().chain(std::iter::repeat(&Vec::new()).take(20)) {
        sjf.tick(arrivals);
        prio.tick(arrivals);
    }

    let workload = |engine: &Engine| {
        let mut rows: Vec<(u32, u64, u32)> = engine
            .metrics()
            .iter()
            .map(|r| (r.pid, r.arrival_tick, r.total_burst))
            .collect();
        rows.sort_unstable();
        rows
    };
    assert_eq!(workload(&sjf), vec![(1, 0, 6), (2, 0, 2), (3, 2, 4)]);
    assert_eq!(workload(&sjf), workload(&prio));
}

#[tokio::test]
async fn test_stop_reports_both_sides() {
    let mut comparator = Comparator::new(
        base().with_arrival_probability(1.0),
        Algorithm::Sjf,
        Algorithm::Priority,
        Arc::new(MemorySink::new()),
    )
    .unwrap();
    for _ in 0..40 {
        comparator.tick().unwrap();
    }

    let report = comparator.stop().await.unwrap();
    assert_eq!(report.comparison.a.processes, report.a.len());
    assert_eq!(report.comparison.b.processes, report.b.len());
    assert_eq!(report.comparison.a.algorithm, Some(Algorithm::Sjf));
    assert!(comparator.tick().is_err());
}

#[tokio::test]
async fn test_same_seed_same_report() {
    async fn once() -> cpu_sched_sim::ComparisonReport {
        let mut comparator = Comparator::new(
            base(),
            Algorithm::Fcfs,
            Algorithm::RoundRobin,
            Arc::new(MemorySink::new()),
        )
        .unwrap();
        for _ in 0..50 {
            comparator.tick().unwrap();
        }
        comparator.stop().await.unwrap()
    }

    assert_eq!(once().await, once().await);
}
