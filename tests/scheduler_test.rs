/*!
 * Scheduler Tests
 * Policy ordering, purging and quantum behaviour through the public API
 */

use cpu_sched_sim::scheduler::{Algorithm, Fcfs, RoundRobin, Scheduler, SchedulingPolicy};
use cpu_sched_sim::{Pid, Process, ProcessState, ProcessTable, SchedulerError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ready(table: &mut ProcessTable, pid: Pid, burst: i64, priority: i64) {
    let mut p = Process::with_seed(pid, format!("P{pid}"), 0, burst, priority, u64::from(pid)).unwrap();
    p.change_state(ProcessState::Ready).unwrap();
    table.insert(p).unwrap();
}

fn load(policy: &mut dyn SchedulingPolicy, table: &ProcessTable) {
    for p in table.iter() {
        policy.add(p);
    }
}

#[test]
fn test_factory_fails_fast() {
    assert!(matches!(
        Scheduler::from_name("lottery", None),
        Err(SchedulerError::UnknownAlgorithm(_))
    ));
    assert!(matches!(
        Scheduler::new(Algorithm::RoundRobin, None),
        Err(SchedulerError::MissingQuantum)
    ));
    let rr = Scheduler::new(Algorithm::RoundRobin, Some(3)).unwrap();
    assert_eq!(rr.algorithm(), Algorithm::RoundRobin);
    assert_eq!(rr.quantum(), Some(3));
}

#[test]
fn test_fcfs_purges_blocked_and_terminated_heads() {
    let mut table = ProcessTable::new();
    for pid in 1..=4 {
        ready(&mut table, pid, 5, 1);
    }
    let mut fcfs = Fcfs::new();
    load(&mut fcfs, &table);

    table.get_mut(1).unwrap().force_terminate(1);
    let p2 = table.get_mut(2).unwrap();
    p2.change_state(ProcessState::Running).unwrap();
    p2.change_state(ProcessState::Blocked).unwrap();

    assert_eq!(fcfs.select(&table), Some(3));
    assert_eq!(fcfs.len(), 2);
    fcfs.remove(3);
    assert_eq!(fcfs.select(&table), Some(4));
}

#[test]
fn test_select_is_idempotent_for_every_algorithm() {
    for algorithm in Algorithm::ALL {
        let mut table = ProcessTable::new();
        ready(&mut table, 1, 6, 3);
        ready(&mut table, 2, 2, 1);
        ready(&mut table, 3, 4, 2);

        let mut scheduler = Scheduler::new(algorithm, Some(2)).unwrap();
        load(&mut scheduler, &table);

        let first = scheduler.select(&table);
        assert!(first.is_some(), "{algorithm} selected nothing");
        assert_eq!(scheduler.select(&table), first, "{algorithm}");
        assert_eq!(scheduler.select(&table), first, "{algorithm}");
    }
}

#[test]
fn test_expected_first_choice_per_algorithm() {
    let mut table = ProcessTable::new();
    // (pid, burst, priority)
    ready(&mut table, 1, 9, 3);
    ready(&mut table, 2, 2, 2);
    ready(&mut table, 3, 5, 1);

    let expected = [
        (Algorithm::Fcfs, 1),
        (Algorithm::Priority, 3),
        (Algorithm::PriorityPreemptive, 3),
        (Algorithm::Sjf, 2),
        (Algorithm::RoundRobin, 1),
    ];
    for (algorithm, pid) in expected {
        let mut scheduler = Scheduler::new(algorithm, Some(2)).unwrap();
        load(&mut scheduler, &table);
        assert_eq!(scheduler.select(&table), Some(pid), "{algorithm}");
    }
}

#[test]
fn test_rotate_moves_behind_later_arrivals() {
    let mut table = ProcessTable::new();
    ready(&mut table, 1, 9, 1);
    ready(&mut table, 2, 9, 1);
    let mut rr = RoundRobin::new(2);
    load(&mut rr, &table);

    table.get_mut(1).unwrap().change_state(ProcessState::Running).unwrap();
    rr.on_tick(table.get(1).unwrap());
    ready(&mut table, 3, 9, 1);
    rr.add(table.get(3).unwrap());

    rr.rotate(1);
    assert_eq!(rr.order(), vec![2, 3, 1]);
    assert_eq!(rr.quantum_remaining(1), Some(2));
}

#[test]
fn test_reset_clears_everything() {
    let mut table = ProcessTable::new();
    ready(&mut table, 1, 3, 1);
    let mut scheduler = Scheduler::new(Algorithm::Sjf, None).unwrap();
    load(&mut scheduler, &table);
    scheduler.reset();
    assert!(scheduler.is_empty());
    assert_eq!(scheduler.select(&table), None);
}

proptest! {
    #[test]
    fn prop_round_robin_runs_at_most_quantum_ticks(quantum in 1u32..6, burst in 1i64..40) {
        let mut table = ProcessTable::new();
        ready(&mut table, 1, burst, 1);
        let mut rr = RoundRobin::new(quantum);
        rr.add(table.get(1).unwrap());

        let p = table.get_mut(1).unwrap();
        p.change_state(ProcessState::Running).unwrap();
        let mut consecutive = 0u32;
        for tick in 1..=(burst as u64) {
            p.advance_tick(tick);
            rr.on_tick(p);
            consecutive += 1;
            if rr.should_preempt(p) {
                prop_assert_eq!(consecutive, quantum);
                p.change_state(ProcessState::Ready).unwrap();
                rr.rotate(1);
                p.change_state(ProcessState::Running).unwrap();
                consecutive = 0;
            }
            prop_assert!(consecutive <= quantum);
        }
        prop_assert!(p.is_terminated());
    }
}
