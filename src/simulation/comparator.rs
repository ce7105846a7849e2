/*!
 * Algorithm Comparator
 * Two coordinated engines fed the same arrivals on the same tick
 */

use super::action::ArrivalSpec;
use super::config::SimulationConfig;
use super::driver::{Periodic, RunState, Runner};
use super::engine::Engine;
use super::handle::EngineHandle;
use super::snapshot::Snapshot;
use crate::core::errors::SimulationError;
use crate::core::types::{Pid, SimulationResult, Tick};
use crate::metrics::{Comparison, MetricsRecord};
use crate::monitoring::EventSink;
use crate::scheduler::Algorithm;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::info;

pub type PairObserver = Box<dyn FnMut(&Arc<Snapshot>, &Arc<Snapshot>) + Send>;

/// Outcome of a paired run
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub a: Vec<MetricsRecord>,
    pub b: Vec<MetricsRecord>,
    pub comparison: Comparison,
}

/// Engines plus the arrival source they share
struct Pair {
    config: SimulationConfig,
    a: Engine,
    b: Engine,
    rng: StdRng,
    next_pid: Pid,
    clock: Tick,
    observer: Option<PairObserver>,
}

impl Pair {
    fn roll_arrivals(&mut self) -> Vec<ArrivalSpec> {
        if self.rng.gen::<f64>() >= self.config.arrival_probability {
            return Vec::new();
        }

        let pid = self.next_pid;
        self.next_pid += 1;
        let burst = self
            .rng
            .gen_range(self.config.burst_min..=self.config.burst_max);
        let priority = self
            .rng
            .gen_range(self.config.priority_min..=self.config.priority_max);

        vec![ArrivalSpec::derived(
            pid,
            i64::from(burst),
            i64::from(priority),
            self.config.seed,
        )]
    }

    fn step(&mut self) -> (Arc<Snapshot>, Arc<Snapshot>) {
        let arrivals = self.roll_arrivals();
        self.clock += 1;

        let a = self.a.tick(&arrivals);
        let b = self.b.tick(&arrivals);
        if let Some(observer) = self.observer.as_mut() {
            observer(&a, &b);
        }
        (a, b)
    }
}

impl Periodic for Pair {
    fn on_interval(&mut self) {
        self.step();
    }

    fn on_panic(&mut self, detail: &str) {
        let detail = format!("paired tick panicked: {detail}");
        self.a.report_fault(&detail);
        self.b.report_fault(&detail);
    }
}

/// Runs two algorithms side by side under an identical workload
///
/// The comparator owns the only arrival RNG and PID counter; each engine
/// still owns its own process list and scheduler.
pub struct Comparator {
    runner: Runner<Pair>,
    handles: (EngineHandle, EngineHandle),
    algorithms: (Algorithm, Algorithm),
}

impl Comparator {
    /// Build both engines from `base`, overriding only the algorithm.
    ///
    /// `base.quantum` applies to whichever side is round-robin.
    pub fn new(
        base: SimulationConfig,
        algorithm_a: Algorithm,
        algorithm_b: Algorithm,
        sink: Arc<dyn EventSink>,
    ) -> SimulationResult<Self> {
        let a = Engine::coordinated(base.clone().with_algorithm(algorithm_a), Arc::clone(&sink))?;
        let b = Engine::coordinated(base.clone().with_algorithm(algorithm_b), sink)?;
        let handles = (a.handle(), b.handle());
        let period = base.tick_interval();

        info!(a = %algorithm_a, b = %algorithm_b, seed = base.seed, "Comparator initialized");

        let pair = Pair {
            rng: StdRng::seed_from_u64(base.seed),
            config: base,
            a,
            b,
            next_pid: 1,
            clock: 0,
            observer: None,
        };

        Ok(Self {
            runner: Runner::new(pair, period, "comparator"),
            handles,
            algorithms: (algorithm_a, algorithm_b),
        })
    }

    /// Register the callback that receives both snapshots after each tick.
    ///
    /// Only possible before `start`.
    pub fn set_observer(
        &mut self,
        observer: impl FnMut(&Arc<Snapshot>, &Arc<Snapshot>) + Send + 'static,
    ) -> SimulationResult<()> {
        let pair = self.runner.parked_mut().ok_or(SimulationError::AlreadyRunning)?;
        pair.observer = Some(Box::new(observer));
        Ok(())
    }

    /// Drive one paired tick by hand
    pub fn tick(&mut self) -> SimulationResult<(Arc<Snapshot>, Arc<Snapshot>)> {
        match self.runner.state() {
            RunState::Idle => {}
            RunState::Stopped => return Err(SimulationError::NotRunning),
            RunState::Running | RunState::Paused => return Err(SimulationError::AlreadyRunning),
        }
        let pair = self
            .runner
            .parked_mut()
            .ok_or_else(|| SimulationError::Internal("comparator lost its engines".into()))?;
        Ok(pair.step())
    }

    pub fn start(&mut self) -> SimulationResult<()> {
        self.runner.start()?;
        info!("Comparator started");
        Ok(())
    }

    pub fn pause(&mut self) -> SimulationResult<()> {
        self.runner.pause()
    }

    pub fn resume(&mut self) -> SimulationResult<()> {
        self.runner.resume()
    }

    /// Tear both engines down and compare what they produced
    pub async fn stop(&mut self) -> SimulationResult<ComparisonReport> {
        let mut pair = self.runner.finish().await?;
        let a = pair.a.shutdown();
        let b = pair.b.shutdown();
        let comparison = Comparison::new(&a, &b);

        info!(
            ticks = pair.clock,
            a_terminated = a.len(),
            b_terminated = b.len(),
            "Comparator stopped"
        );
        Ok(ComparisonReport { a, b, comparison })
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.runner.state()
    }

    pub fn algorithms(&self) -> (Algorithm, Algorithm) {
        self.algorithms
    }

    pub fn handle_a(&self) -> EngineHandle {
        self.handles.0.clone()
    }

    pub fn handle_b(&self) -> EngineHandle {
        self.handles.1.clone()
    }
}
