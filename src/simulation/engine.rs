/*!
 * Simulation Engine
 * One tick: drain actions, admit arrivals, select, dispatch, resolve, publish
 */

use super::action::{Action, ArrivalSpec};
use super::config::SimulationConfig;
use super::handle::{EngineHandle, Shared};
use super::snapshot::Snapshot;
use crate::core::errors::ProcessError;
use crate::core::types::{Pid, Quantum, SimulationResult, Tick};
use crate::metrics::MetricsRecord;
use crate::monitoring::{EventFields, EventKind, EventSink, Level};
use crate::process::{Process, ProcessState, ProcessTable};
use crate::scheduler::{Algorithm, Scheduler, SchedulingPolicy};
use ahash::AHashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Where a run's arrivals come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationMode {
    /// The engine rolls its own arrivals from its seeded RNG
    Autonomous,
    /// Arrivals are passed to [`Engine::tick`] by an outside driver
    Coordinated,
}

impl GenerationMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Autonomous => "autonomous",
            Self::Coordinated => "coordinated",
        }
    }
}

pub type SnapshotObserver = Box<dyn FnMut(&Arc<Snapshot>) + Send>;

/// Event emission bound to one run's algorithm and quantum
struct Reporter {
    sink: Arc<dyn EventSink>,
    algorithm: Algorithm,
    quantum: Option<Quantum>,
}

impl Reporter {
    fn fields(&self, tick: Tick) -> EventFields {
        EventFields::new(tick, self.algorithm, self.quantum)
    }

    fn run(&self, kind: EventKind, level: Level, tick: Tick, detail: impl Into<String>) {
        self.sink
            .record(kind, level, self.fields(tick).with_detail(detail));
    }

    fn process(
        &self,
        kind: EventKind,
        level: Level,
        tick: Tick,
        process: &Process,
        detail: impl Into<String>,
    ) {
        let fields = self
            .fields(tick)
            .with_pid(process.pid())
            .with_state(process.state().as_str())
            .with_usage(process.cpu_usage(), process.memory())
            .with_detail(detail);
        self.sink.record(kind, level, fields);
    }
}

/// Tick-driven simulation of one scheduling policy
///
/// The engine is the only writer of its process table and scheduler.
/// Everything outside talks to it through an [`EngineHandle`].
pub struct Engine {
    config: SimulationConfig,
    mode: GenerationMode,
    scheduler: Scheduler,
    table: ProcessTable,
    events: Reporter,
    shared: Arc<Shared>,
    rng: StdRng,
    clock: Tick,
    next_pid: Pid,
    seen: AHashSet<Pid>,
    running: Option<Pid>,
    metrics: Vec<MetricsRecord>,
    observer: Option<SnapshotObserver>,
    stopped: bool,
}

impl Engine {
    /// Validate `config` and build the engine and its scheduler
    pub fn new(
        config: SimulationConfig,
        mode: GenerationMode,
        sink: Arc<dyn EventSink>,
    ) -> SimulationResult<Self> {
        config.validate()?;
        let scheduler = Scheduler::new(config.algorithm, config.effective_quantum())?;

        let events = Reporter {
            sink,
            algorithm: scheduler.algorithm(),
            quantum: scheduler.quantum(),
        };
        events.run(
            EventKind::SimulationStarted,
            Level::Info,
            0,
            format!(
                "mode={}, tick_ms={}, arrival_probability={}",
                mode.as_str(),
                config.tick_interval_ms,
                config.arrival_probability
            ),
        );

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            mode,
            scheduler,
            table: ProcessTable::new(),
            events,
            shared: Arc::new(Shared::default()),
            clock: 0,
            next_pid: 1,
            seen: AHashSet::new(),
            running: None,
            metrics: Vec::new(),
            observer: None,
            stopped: false,
        })
    }

    pub fn autonomous(config: SimulationConfig, sink: Arc<dyn EventSink>) -> SimulationResult<Self> {
        Self::new(config, GenerationMode::Autonomous, sink)
    }

    pub fn coordinated(config: SimulationConfig, sink: Arc<dyn EventSink>) -> SimulationResult<Self> {
        Self::new(config, GenerationMode::Coordinated, sink)
    }

    /// Register the callback that receives every published snapshot
    pub fn set_observer(&mut self, observer: impl FnMut(&Arc<Snapshot>) + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle::new(Arc::clone(&self.shared))
    }

    /// Run one tick and return the snapshot it published.
    ///
    /// `arrivals` are admitted in order on top of whatever an autonomous
    /// engine generates itself. After [`Engine::shutdown`] the run no longer
    /// advances and the current view is returned unchanged.
    pub fn tick(&mut self, arrivals: &[ArrivalSpec]) -> Arc<Snapshot> {
        if self.stopped {
            return Arc::new(Snapshot::capture(self.clock, &self.table));
        }

        let arrival_tick = self.clock;
        let now = self.clock + 1;

        self.drain_actions(now);

        for spec in arrivals {
            if let Err(e) = self.admit(spec, arrival_tick) {
                self.report_error(now, Some(spec.pid), &e.to_string());
            }
        }
        if self.mode == GenerationMode::Autonomous {
            self.generate_arrival(arrival_tick, now);
        }

        match self.scheduler.select(&self.table) {
            Some(pid) => {
                if let Err(e) = self.execute(pid, now) {
                    self.report_error(now, Some(pid), &e.to_string());
                }
                self.accumulate_waits(Some(pid));
            }
            None => {
                self.events
                    .run(EventKind::Idle, Level::Info, now, "no ready processes");
                self.accumulate_waits(None);
            }
        }

        self.clock = now;
        self.publish()
    }

    /// Finalize the run and return every captured metrics record.
    ///
    /// Idempotent; only the first call emits the stop event.
    pub fn shutdown(&mut self) -> Vec<MetricsRecord> {
        if !self.stopped {
            self.stopped = true;
            self.events.run(
                EventKind::SimulationStopped,
                Level::Info,
                self.clock,
                format!(
                    "ticks={}, terminated={}, live={}",
                    self.clock,
                    self.metrics.len(),
                    self.table.live_count()
                ),
            );
        }
        self.metrics.clone()
    }

    /// Report a fault caught outside the tick (a panicking tick)
    pub(crate) fn report_fault(&self, detail: &str) {
        self.report_error(self.clock, None, detail);
    }

    #[inline]
    pub fn clock(&self) -> Tick {
        self.clock
    }

    #[inline]
    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.events.algorithm
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Records captured so far, in termination order
    #[inline]
    pub fn metrics(&self) -> &[MetricsRecord] {
        &self.metrics
    }

    #[inline]
    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.table.get(pid)
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.table.live_count()
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn drain_actions(&mut self, now: Tick) {
        while let Some(action) = self.shared.actions.pop() {
            match self.apply(action, now) {
                Ok(()) => {}
                Err(e) if e.is_stale_target() => {
                    self.events.sink.record(
                        EventKind::Error,
                        Level::Debug,
                        self.events
                            .fields(now)
                            .with_pid(action.pid())
                            .with_detail(format!("{} dropped: {}", action.as_str(), e)),
                    );
                }
                Err(e) => self.report_error(
                    now,
                    Some(action.pid()),
                    &format!("{} failed: {}", action.as_str(), e),
                ),
            }
        }
    }

    fn apply(&mut self, action: Action, now: Tick) -> Result<(), ProcessError> {
        match action {
            Action::Terminate(pid) => self.terminate(pid, now),
            Action::Suspend(pid) => self.suspend(pid, now),
            Action::Resume(pid) => self.resume(pid, now),
        }
    }

    fn terminate(&mut self, pid: Pid, now: Tick) -> Result<(), ProcessError> {
        let process = self.table.require_mut(pid)?;
        let from = process.state();
        if !process.force_terminate(now) {
            return Err(ProcessError::InvalidTransition {
                pid,
                from,
                to: ProcessState::Terminated,
            });
        }

        self.scheduler.remove(pid);
        self.events.process(
            EventKind::ProcessTerminated,
            Level::Warn,
            now,
            process,
            format!("forced from {from}"),
        );
        self.retire(pid, now);
        Ok(())
    }

    fn suspend(&mut self, pid: Pid, now: Tick) -> Result<(), ProcessError> {
        let process = self.table.require_mut(pid)?;
        let from = process.state();
        process.change_state(ProcessState::Suspended)?;

        self.scheduler.remove(pid);
        if self.running == Some(pid) {
            self.running = None;
        }
        self.events.process(
            EventKind::StateChanged,
            Level::Info,
            now,
            process,
            format!("{from}->SUSPENDED (user)"),
        );
        Ok(())
    }

    fn resume(&mut self, pid: Pid, now: Tick) -> Result<(), ProcessError> {
        let process = self.table.require_mut(pid)?;
        if process.state() != ProcessState::Suspended {
            return Err(ProcessError::InvalidTransition {
                pid,
                from: process.state(),
                to: ProcessState::Ready,
            });
        }
        process.change_state(ProcessState::Ready)?;

        self.scheduler.add(process);
        self.events.process(
            EventKind::StateChanged,
            Level::Info,
            now,
            process,
            "SUSPENDED->READY (user)",
        );
        Ok(())
    }

    fn generate_arrival(&mut self, arrival_tick: Tick, now: Tick) {
        if self.rng.gen::<f64>() >= self.config.arrival_probability {
            return;
        }

        while self.seen.contains(&self.next_pid) {
            self.next_pid += 1;
        }
        let pid = self.next_pid;
        let burst = self
            .rng
            .gen_range(self.config.burst_min..=self.config.burst_max);
        let priority = self
            .rng
            .gen_range(self.config.priority_min..=self.config.priority_max);
        let spec = ArrivalSpec::new(
            pid,
            format!("P{pid}"),
            i64::from(burst),
            i64::from(priority),
            self.rng.gen(),
        );

        if let Err(e) = self.admit(&spec, arrival_tick) {
            self.report_error(now, Some(pid), &e.to_string());
        }
    }

    /// Build a process from `spec`, move it to READY and hand it to the policy
    fn admit(&mut self, spec: &ArrivalSpec, arrival_tick: Tick) -> SimulationResult<()> {
        if self.seen.contains(&spec.pid) {
            return Err(ProcessError::DuplicatePid(spec.pid).into());
        }

        let mut process = Process::with_seed(
            spec.pid,
            spec.name.clone(),
            arrival_tick,
            spec.burst,
            spec.priority,
            spec.seed,
        )?;
        self.seen.insert(spec.pid);
        self.next_pid = self.next_pid.max(spec.pid.saturating_add(1));

        let tick = arrival_tick + 1;
        self.events.process(
            EventKind::ProcessCreated,
            Level::Info,
            tick,
            &process,
            format!(
                "burst={}, priority={}",
                process.total_burst(),
                process.priority()
            ),
        );

        process.change_state(ProcessState::Ready)?;
        self.events.process(
            EventKind::StateChanged,
            Level::Info,
            tick,
            &process,
            "NEW->READY",
        );

        self.scheduler.add(&process);
        self.table.insert(process)?;
        Ok(())
    }

    fn execute(&mut self, pid: Pid, now: Tick) -> SimulationResult<()> {
        if let Some(previous) = self.running.filter(|&p| p != pid) {
            self.displace(previous, now)?;
        }

        let process = self.table.require_mut(pid)?;
        if process.state() == ProcessState::Ready {
            process.change_state(ProcessState::Running)?;
            self.events.process(
                EventKind::StateChanged,
                Level::Info,
                now,
                process,
                "READY->RUNNING",
            );
        }
        self.running = Some(pid);

        process.advance_tick(now);
        self.scheduler.on_tick(process);
        self.events.process(
            EventKind::TickExecuted,
            Level::Debug,
            now,
            process,
            format!("remaining={}", process.remaining_burst()),
        );

        if process.is_terminated() {
            self.events.process(
                EventKind::StateChanged,
                Level::Info,
                now,
                process,
                "RUNNING->TERMINATED",
            );
            self.events.process(
                EventKind::ProcessTerminated,
                Level::Info,
                now,
                process,
                "completed",
            );
            self.scheduler.remove(pid);
            self.retire(pid, now);
        } else if self.scheduler.should_preempt(process) {
            process.change_state(ProcessState::Ready)?;
            self.events.process(
                EventKind::StateChanged,
                Level::Info,
                now,
                process,
                "RUNNING->READY (preempted)",
            );
            match self.scheduler.as_round_robin_mut() {
                Some(rr) => rr.rotate(pid),
                None => {
                    self.scheduler.remove(pid);
                    self.scheduler.add(process);
                }
            }
            self.running = None;
        }
        Ok(())
    }

    /// Return a process that lost the CPU to a preemptive selection to READY
    fn displace(&mut self, pid: Pid, now: Tick) -> SimulationResult<()> {
        self.running = None;
        let Some(process) = self.table.get_mut(pid) else {
            return Ok(());
        };
        if process.state() != ProcessState::Running {
            return Ok(());
        }

        process.change_state(ProcessState::Ready)?;
        self.events.process(
            EventKind::StateChanged,
            Level::Info,
            now,
            process,
            "RUNNING->READY (preempted)",
        );
        Ok(())
    }

    /// Capture metrics for a terminated process and drop it from the table
    fn retire(&mut self, pid: Pid, now: Tick) {
        if self.running == Some(pid) {
            self.running = None;
        }
        let Some(process) = self.table.remove(pid) else {
            return;
        };

        let record = MetricsRecord::capture(&process, self.events.algorithm);
        self.events.sink.record(
            EventKind::MetricsCaptured,
            Level::Debug,
            self.events.fields(now).with_pid(pid).with_detail(format!(
                "turnaround={}, wait={}, response={}",
                Optional(record.turnaround),
                Optional(record.wait),
                Optional(record.response)
            )),
        );

        self.shared.metrics.lock().push(record.clone());
        self.metrics.push(record);
    }

    fn accumulate_waits(&mut self, examined: Option<Pid>) {
        for process in self.table.iter_mut() {
            if process.state() == ProcessState::Ready && Some(process.pid()) != examined {
                process.accumulate_wait_tick();
            }
        }
    }

    fn publish(&mut self) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot::capture(self.clock, &self.table));
        self.shared.snapshot.store(Some(Arc::clone(&snapshot)));
        if let Some(observer) = self.observer.as_mut() {
            observer(&snapshot);
        }
        debug!(
            tick = snapshot.tick,
            active = snapshot.active_count,
            algorithm = %self.events.algorithm,
            "Snapshot published"
        );
        snapshot
    }

    fn report_error(&self, tick: Tick, pid: Option<Pid>, detail: &str) {
        let mut fields = self.events.fields(tick).with_detail(detail);
        fields.pid = pid;
        self.events.sink.record(EventKind::Error, Level::Error, fields);
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("algorithm", &self.events.algorithm)
            .field("mode", &self.mode)
            .field("clock", &self.clock)
            .field("live", &self.table.len())
            .field("terminated", &self.metrics.len())
            .field("stopped", &self.stopped)
            .finish()
    }
}

/// Renders `None` as `-`
struct Optional(Option<i64>);

impl fmt::Display for Optional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("-"),
        }
    }
}
