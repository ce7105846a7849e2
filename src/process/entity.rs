/*!
 * Process Entity
 * One simulated task: identity, burst accounting, telemetry and instrumentation
 */

use super::types::ProcessState;
use crate::core::errors::{ensure_positive_burst, ProcessError, ProcessResult};
use crate::core::limits::{
    CPU_INITIAL_MAX, CPU_RUNNING_MAX, CPU_RUNNING_MIN, HIGHEST_PRIORITY, MEMORY_INITIAL_MAX,
    MEMORY_RUNNING_MAX, MEMORY_RUNNING_MIN,
};
use crate::core::types::{Burst, Pid, Priority, Tick};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Simulated process
///
/// Never changes state on its own: the engine and the scheduling policy drive
/// every transition. Each process owns its RNG so CPU/memory jitter is
/// independent of whatever generated its arrival.
#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    name: String,
    state: ProcessState,
    priority: Priority,
    total_burst: Burst,
    remaining_burst: Burst,

    cpu_usage: u32,
    memory: u32,

    executed_ticks: u64,
    waited_ticks: u64,

    arrival_tick: Tick,
    first_run_tick: Option<Tick>,
    finish_tick: Option<Tick>,

    rng: StdRng,
}

impl Process {
    /// Create a process in state NEW.
    ///
    /// Fails with [`ProcessError::InvalidBurst`] if `burst <= 0`. Priorities
    /// below 1 are coerced to 1.
    pub fn new(
        pid: Pid,
        name: impl Into<String>,
        arrival_tick: Tick,
        burst: i64,
        priority: i64,
        mut rng: StdRng,
    ) -> ProcessResult<Self> {
        let total_burst = ensure_positive_burst(pid, burst)?;
        let priority = priority.clamp(i64::from(HIGHEST_PRIORITY), i64::from(Priority::MAX))
            as Priority;

        let cpu_usage = rng.gen_range(CPU_RUNNING_MIN..=CPU_INITIAL_MAX);
        let memory = rng.gen_range(MEMORY_RUNNING_MIN..=MEMORY_INITIAL_MAX);

        Ok(Self {
            pid,
            name: name.into(),
            state: ProcessState::New,
            priority,
            total_burst,
            remaining_burst: total_burst,
            cpu_usage,
            memory,
            executed_ticks: 0,
            waited_ticks: 0,
            arrival_tick,
            first_run_tick: None,
            finish_tick: None,
            rng,
        })
    }

    /// Create a process whose jitter comes from its own seed
    pub fn with_seed(
        pid: Pid,
        name: impl Into<String>,
        arrival_tick: Tick,
        burst: i64,
        priority: i64,
        seed: u64,
    ) -> ProcessResult<Self> {
        Self::new(
            pid,
            name,
            arrival_tick,
            burst,
            priority,
            StdRng::seed_from_u64(seed),
        )
    }

    /// Advance one tick in the current state
    pub fn advance_tick(&mut self, current_tick: Tick) {
        match self.state {
            ProcessState::Running => {
                if self.first_run_tick.is_none() {
                    self.first_run_tick = Some(current_tick);
                }

                self.remaining_burst = self.remaining_burst.saturating_sub(1);
                self.executed_ticks += 1;
                self.cpu_usage = self.rng.gen_range(CPU_RUNNING_MIN..=CPU_RUNNING_MAX);
                self.memory = self.rng.gen_range(MEMORY_RUNNING_MIN..=MEMORY_RUNNING_MAX);

                if self.remaining_burst == 0 {
                    self.state = ProcessState::Terminated;
                    self.cpu_usage = 0;
                    self.memory = 0;
                    self.finish_tick = Some(current_tick);
                }
            }
            ProcessState::Ready => {
                self.waited_ticks += 1;
                self.cpu_usage = 0;
            }
            ProcessState::Blocked => {
                self.cpu_usage = 0;
            }
            ProcessState::New | ProcessState::Suspended | ProcessState::Terminated => {}
        }
    }

    /// Engine-driven state transition
    pub fn change_state(&mut self, next: ProcessState) -> ProcessResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(ProcessError::InvalidTransition {
                pid: self.pid,
                from: self.state,
                to: next,
            });
        }

        self.state = next;
        if matches!(next, ProcessState::Ready | ProcessState::Suspended) {
            self.cpu_usage = 0;
        }
        Ok(())
    }

    /// Terminate immediately, stamping the caller's tick as the finish time.
    ///
    /// Returns `false` if the process had already terminated.
    pub fn force_terminate(&mut self, current_tick: Tick) -> bool {
        if self.state.is_terminated() {
            return false;
        }

        self.state = ProcessState::Terminated;
        self.remaining_burst = 0;
        self.cpu_usage = 0;
        self.memory = 0;
        self.finish_tick = Some(current_tick);
        true
    }

    /// Count one waiting tick without running the full state step
    #[inline]
    pub fn accumulate_wait_tick(&mut self) {
        self.waited_ticks += 1;
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[inline]
    pub fn total_burst(&self) -> Burst {
        self.total_burst
    }

    #[inline]
    pub fn remaining_burst(&self) -> Burst {
        self.remaining_burst
    }

    /// Simulated CPU usage (percent)
    #[inline]
    pub fn cpu_usage(&self) -> u32 {
        self.cpu_usage
    }

    /// Simulated resident memory (MB)
    #[inline]
    pub fn memory(&self) -> u32 {
        self.memory
    }

    #[inline]
    pub fn executed_ticks(&self) -> u64 {
        self.executed_ticks
    }

    #[inline]
    pub fn waited_ticks(&self) -> u64 {
        self.waited_ticks
    }

    #[inline]
    pub fn arrival_tick(&self) -> Tick {
        self.arrival_tick
    }

    /// First tick spent RUNNING, if any
    #[inline]
    pub fn first_run_tick(&self) -> Option<Tick> {
        self.first_run_tick
    }

    /// Tick at which the process terminated, if it has
    #[inline]
    pub fn finish_tick(&self) -> Option<Tick> {
        self.finish_tick
    }

    #[inline]
    pub fn has_started(&self) -> bool {
        self.first_run_tick.is_some()
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }
}
