/*!
 * Engine Tests
 * Tick sequencing, actions and metrics capture through the public API
 */

use cpu_sched_sim::monitoring::RecordedEvent;
use cpu_sched_sim::{
    Algorithm, ArrivalSpec, Engine, EventKind, Level, MemorySink, MetricsRecord, Pid,
    ProcessState, SimulationConfig,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn coordinated(config: SimulationConfig) -> (Engine, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let engine = Engine::coordinated(config, sink.clone()).unwrap();
    (engine, sink)
}

fn spec(pid: Pid, burst: i64, priority: i64) -> ArrivalSpec {
    ArrivalSpec::new(pid, format!("P{pid}"), burst, priority, u64::from(pid) * 7)
}

/// PID that executed each tick, in order
fn execution_order(sink: &MemorySink) -> Vec<Pid> {
    sink.of_kind(EventKind::TickExecuted)
        .iter()
        .filter_map(|e| e.fields.pid)
        .collect()
}

fn record(engine: &Engine, pid: Pid) -> MetricsRecord {
    engine
        .metrics()
        .iter()
        .find(|r| r.pid == pid)
        .cloned()
        .unwrap()
}

fn run(engine: &mut Engine, ticks: usize) {
    for _ in 0..ticks {
        engine.tick(&[]);
    }
}

#[test]
fn test_scenario_a_fcfs() {
    let (mut engine, sink) = coordinated(SimulationConfig::new(Algorithm::Fcfs));
    engine.tick(&[spec(1, 5, 1), spec(2, 3, 1)]);
    run(&mut engine, 7);

    assert_eq!(execution_order(&sink), vec![1, 1, 1, 1, 1, 2, 2, 2]);

    let p1 = record(&engine, 1);
    assert_eq!((p1.arrival_tick, p1.first_run_tick, p1.finish_tick), (0, Some(1), Some(5)));
    assert_eq!((p1.turnaround, p1.wait), (Some(5), Some(0)));

    let p2 = record(&engine, 2);
    assert_eq!((p2.first_run_tick, p2.finish_tick), (Some(6), Some(8)));
    assert_eq!((p2.turnaround, p2.wait, p2.response), (Some(8), Some(5), Some(6)));
    assert_eq!(p2.waited_ticks, 5);
    assert_eq!(engine.live_count(), 0);
}

#[test]
fn test_scenario_b_round_robin() {
    let (mut engine, sink) =
        coordinated(SimulationConfig::new(Algorithm::RoundRobin).with_quantum(2));
    engine.tick(&[spec(1, 5, 1), spec(2, 3, 1)]);
    run(&mut engine, 7);

    // P2 needs a third slice before P1's last tick
    assert_eq!(execution_order(&sink), vec![1, 1, 2, 2, 1, 1, 2, 1]);

    let preemptions = sink
        .of_kind(EventKind::StateChanged)
        .iter()
        .filter(|e| e.fields.detail.contains("preempted"))
        .count();
    assert_eq!(preemptions, 3);

    assert_eq!(record(&engine, 2).finish_tick, Some(7));
    assert_eq!(record(&engine, 1).finish_tick, Some(8));
    assert!(engine.metrics().iter().all(|r| r.executed_ticks == u64::from(r.total_burst)));
    assert_eq!(engine.tick(&[]).active_count, 0);
}

#[test]
fn test_priority_is_non_preemptive_by_default() {
    let (mut engine, sink) = coordinated(SimulationConfig::new(Algorithm::Priority));
    engine.tick(&[spec(1, 5, 5)]);
    engine.tick(&[]);
    engine.tick(&[spec(2, 2, 1)]);
    run(&mut engine, 4);

    assert_eq!(execution_order(&sink), vec![1, 1, 1, 1, 1, 2, 2]);
}

#[test]
fn test_preemptive_priority_displaces_runner() {
    let (mut engine, sink) = coordinated(SimulationConfig::new(Algorithm::PriorityPreemptive));
    engine.tick(&[spec(1, 5, 5)]);
    engine.tick(&[]);
    engine.tick(&[spec(2, 2, 1)]);

    let snapshot = engine.handle().latest_snapshot().unwrap();
    assert_eq!(snapshot.running(), Some(2));
    assert_eq!(snapshot.row(1).map(|r| r.state), Some(ProcessState::Ready));

    run(&mut engine, 4);
    assert_eq!(execution_order(&sink), vec![1, 1, 2, 2, 1, 1, 1]);
}

#[test]
fn test_sjf_keeps_running_process() {
    let (mut engine, sink) = coordinated(SimulationConfig::new(Algorithm::Sjf));
    engine.tick(&[spec(1, 4, 1), spec(2, 6, 1)]);
    engine.tick(&[spec(3, 1, 1)]);
    run(&mut engine, 9);

    assert_eq!(execution_order(&sink), vec![1, 1, 1, 1, 3, 2, 2, 2, 2, 2, 2]);
}

#[test]
fn test_suspend_and_resume_actions() {
    let (mut engine, _) = coordinated(SimulationConfig::new(Algorithm::Fcfs));
    let handle = engine.handle();
    engine.tick(&[spec(1, 5, 1), spec(2, 5, 1)]);

    handle.request_suspend(1);
    let snapshot = engine.tick(&[]);
    assert_eq!(snapshot.row(1).map(|r| r.state), Some(ProcessState::Suspended));
    assert_eq!(snapshot.running(), Some(2));

    engine.tick(&[]);
    let suspended = engine.process(1).unwrap();
    assert_eq!((suspended.executed_ticks(), suspended.waited_ticks()), (1, 0));

    handle.request_resume(1);
    let snapshot = engine.tick(&[]);
    assert_eq!(snapshot.row(1).map(|r| r.state), Some(ProcessState::Ready));
    assert_eq!(snapshot.running(), Some(2));
    assert_eq!(engine.process(1).unwrap().waited_ticks(), 1);
}

#[test]
fn test_forced_termination_captures_metrics() {
    let (mut engine, sink) = coordinated(SimulationConfig::new(Algorithm::Fcfs));
    let handle = engine.handle();
    engine.tick(&[spec(1, 8, 1), spec(2, 2, 1)]);
    run(&mut engine, 3);

    handle.request_terminate(1);
    let snapshot = engine.tick(&[]);

    assert!(snapshot.row(1).is_none());
    assert_eq!(snapshot.running(), Some(2));

    let forced = record(&engine, 1);
    assert!(forced.forced);
    assert_eq!(forced.finish_tick, Some(5));
    assert_eq!(forced.executed_ticks, 4);
    assert_eq!(forced.turnaround, Some(5));
    assert_eq!(forced.wait, Some(-3));

    let warnings: Vec<RecordedEvent> = sink
        .of_kind(EventKind::ProcessTerminated)
        .into_iter()
        .filter(|e| e.level == Level::Warn)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(handle.terminated_metrics_snapshot().len(), 1);
}

#[test]
fn test_suspended_then_terminated_counts_no_wait() {
    let (mut engine, _) = coordinated(SimulationConfig::new(Algorithm::Fcfs));
    let handle = engine.handle();
    engine.tick(&[spec(1, 5, 1), spec(2, 5, 1)]);

    handle.request_suspend(1);
    run(&mut engine, 2);
    handle.request_terminate(1);
    engine.tick(&[]);

    let record = record(&engine, 1);
    assert!(record.forced);
    assert_eq!(record.finish_tick, Some(4));
    assert_eq!((record.executed_ticks, record.waited_ticks), (1, 0));
    assert_eq!(record.response, Some(1));
    assert_eq!(record.turnaround, Some(4));
    assert_eq!(record.wait, Some(-1));
}

#[test]
fn test_actions_on_stale_targets_are_ignored() {
    let (mut engine, sink) = coordinated(SimulationConfig::new(Algorithm::Fcfs));
    let handle = engine.handle();
    engine.tick(&[spec(1, 1, 1), spec(2, 4, 1)]);

    handle.request_terminate(1);
    handle.request_resume(2);
    handle.request_suspend(99);
    engine.tick(&[]);

    assert!(sink
        .of_kind(EventKind::Error)
        .iter()
        .all(|e| e.level == Level::Debug));
    assert_eq!(sink.count(EventKind::Error), 3);
    assert_eq!(engine.metrics().len(), 1);
    assert!(!engine.metrics()[0].forced);
}

#[test]
fn test_observer_receives_every_snapshot() {
    let (mut engine, _) = coordinated(SimulationConfig::default());
    let ticks = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&ticks);
    engine.set_observer(move |s| seen.lock().push((s.tick, s.active_count)));

    engine.tick(&[spec(1, 2, 1)]);
    engine.tick(&[]);
    engine.tick(&[]);

    assert_eq!(*ticks.lock(), vec![(1, 1), (2, 0), (3, 0)]);
}

#[test]
fn test_autonomous_runs_are_reproducible() {
    let config = SimulationConfig::new(Algorithm::RoundRobin)
        .with_quantum(3)
        .with_seed(99)
        .with_arrival_probability(0.5);

    let mut a = Engine::autonomous(config.clone(), Arc::new(MemorySink::new())).unwrap();
    let mut b = Engine::autonomous(config, Arc::new(MemorySink::new())).unwrap();
    for _ in 0..60 {
        assert_eq!(*a.tick(&[]), *b.tick(&[]));
    }
    assert_eq!(a.shutdown(), b.shutdown());
    assert_eq!(a.clock(), 60);
}

#[test]
fn test_autonomous_pids_strictly_increase() {
    let config = SimulationConfig::default().with_arrival_probability(1.0);
    let sink = Arc::new(MemorySink::new());
    let mut engine = Engine::autonomous(config, sink.clone()).unwrap();
    run(&mut engine, 10);

    let pids: Vec<Pid> = sink
        .of_kind(EventKind::ProcessCreated)
        .iter()
        .filter_map(|e| e.fields.pid)
        .collect();
    assert_eq!(pids, (1..=10).collect::<Vec<_>>());
}
