/*!
 * Periodic Driver
 *
 * Background task that ticks a simulation target at a fixed period.
 * The target moves into the task while it runs and is handed back on
 * shutdown, so no lock ever guards simulation state.
 */

use crate::core::errors::SimulationError;
use crate::core::types::SimulationResult;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Something a periodic driver can tick
pub(crate) trait Periodic: Send + 'static {
    fn on_interval(&mut self);

    /// A tick panicked; the driver keeps firing afterwards
    fn on_panic(&mut self, detail: &str);
}

/// Control messages for the driver task
///
/// Pause and resume do not travel here: they flip `active` directly so they
/// take effect before the next interval is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverCommand {
    Shutdown,
}

/// Run-control state of a driven simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Built but never started; may still be ticked by hand
    Idle,
    Running,
    Paused,
    Stopped,
}

impl RunState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

/// Handle to the driver background task
///
/// Preferred shutdown is `shutdown().await`; dropping without it aborts the
/// task.
struct Driver<T: Periodic> {
    command_tx: mpsc::UnboundedSender<DriverCommand>,
    handle: Option<JoinHandle<T>>,
    active: Arc<AtomicBool>,
    shutdown_initiated: Arc<AtomicBool>,
    label: &'static str,
}

impl<T: Periodic> Driver<T> {
    fn spawn(target: T, period: Duration, label: &'static str) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let active = Arc::new(AtomicBool::new(true));
        let handle = tokio::spawn(run_loop(
            target,
            period,
            label,
            Arc::clone(&active),
            command_rx,
        ));

        info!(driver = label, period_ms = period.as_millis() as u64, "Driver task spawned");

        Self {
            command_tx,
            handle: Some(handle),
            active,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            label,
        }
    }

    /// Consulted at the top of every interval; no tick runs once this returns
    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
        if active {
            info!(driver = self.label, "Driver resumed");
        } else {
            info!(driver = self.label, "Driver paused");
        }
    }

    fn send(&self, command: DriverCommand) {
        let _ = self.command_tx.send(command);
    }

    /// Stop the task and take the target back
    async fn shutdown(mut self) -> SimulationResult<T> {
        self.shutdown_initiated.store(true, Ordering::SeqCst);
        self.send(DriverCommand::Shutdown);

        let handle = self
            .handle
            .take()
            .ok_or_else(|| SimulationError::Internal("driver task already joined".into()))?;
        handle.await.map_err(|e| {
            warn!("Driver task shutdown error: {}", e);
            SimulationError::Internal(format!("driver task failed: {e}"))
        })
    }
}

impl<T: Periodic> Drop for Driver<T> {
    fn drop(&mut self) {
        if self.shutdown_initiated.load(Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self.handle.take() {
            warn!("Driver dropped without shutdown() - aborting task");
            handle.abort();
        }
    }
}

async fn run_loop<T: Periodic>(
    mut target: T,
    period: Duration,
    label: &'static str,
    active: Arc<AtomicBool>,
    mut command_rx: mpsc::UnboundedReceiver<DriverCommand>,
) -> T {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            command = command_rx.recv() => {
                match command {
                    Some(DriverCommand::Shutdown) | None => {
                        info!(driver = label, "Driver shutting down");
                        break;
                    }
                }
            }

            _ = interval.tick() => {
                if active.load(Ordering::SeqCst) {
                    let outcome = catch_unwind(AssertUnwindSafe(|| target.on_interval()));
                    if let Err(panic) = outcome {
                        let detail = panic_message(panic.as_ref());
                        error!(driver = label, %detail, "Tick panicked");
                        target.on_panic(&detail);
                    }
                }
            }
        }
    }

    target
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

enum Slot<T: Periodic> {
    Parked(T),
    Driving(Driver<T>),
    Finished,
}

/// Run control shared by the autonomous and paired drivers:
/// `idle -> running <-> paused -> stopped`
pub(crate) struct Runner<T: Periodic> {
    slot: Slot<T>,
    state: RunState,
    period: Duration,
    label: &'static str,
}

impl<T: Periodic> Runner<T> {
    pub(crate) fn new(target: T, period: Duration, label: &'static str) -> Self {
        Self {
            slot: Slot::Parked(target),
            state: RunState::Idle,
            period,
            label,
        }
    }

    #[inline]
    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    /// The target, while no task owns it
    pub(crate) fn parked_mut(&mut self) -> Option<&mut T> {
        match &mut self.slot {
            Slot::Parked(target) => Some(target),
            _ => None,
        }
    }

    pub(crate) fn start(&mut self) -> SimulationResult<()> {
        match self.state {
            RunState::Idle => {}
            RunState::Running | RunState::Paused => return Err(SimulationError::AlreadyRunning),
            RunState::Stopped => return Err(SimulationError::NotRunning),
        }

        match std::mem::replace(&mut self.slot, Slot::Finished) {
            Slot::Parked(target) => {
                self.slot = Slot::Driving(Driver::spawn(target, self.period, self.label));
                self.state = RunState::Running;
                Ok(())
            }
            other => {
                self.slot = other;
                Err(SimulationError::Internal("runner lost its target".into()))
            }
        }
    }

    pub(crate) fn pause(&mut self) -> SimulationResult<()> {
        self.switch(RunState::Running, RunState::Paused)
    }

    pub(crate) fn resume(&mut self) -> SimulationResult<()> {
        self.switch(RunState::Paused, RunState::Running)
    }

    fn switch(&mut self, from: RunState, to: RunState) -> SimulationResult<()> {
        match (&self.slot, self.state == from) {
            (Slot::Driving(driver), true) => {
                driver.set_active(to == RunState::Running);
                self.state = to;
                Ok(())
            }
            _ => Err(SimulationError::NotRunning),
        }
    }

    /// Stop any running task and hand the target back exactly once
    pub(crate) async fn finish(&mut self) -> SimulationResult<T> {
        let slot = std::mem::replace(&mut self.slot, Slot::Finished);
        self.state = RunState::Stopped;
        match slot {
            Slot::Parked(target) => Ok(target),
            Slot::Driving(driver) => driver.shutdown().await,
            Slot::Finished => Err(SimulationError::NotRunning),
        }
    }
}
