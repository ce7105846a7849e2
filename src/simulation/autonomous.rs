/*!
 * Autonomous Simulation
 * A self-generating engine ticked by a periodic background task
 */

use super::config::SimulationConfig;
use super::driver::{Periodic, RunState, Runner};
use super::engine::{Engine, GenerationMode};
use super::handle::EngineHandle;
use crate::core::errors::SimulationError;
use crate::core::types::SimulationResult;
use crate::metrics::MetricsRecord;
use crate::monitoring::EventSink;
use std::sync::Arc;
use tracing::info;

impl Periodic for Engine {
    fn on_interval(&mut self) {
        self.tick(&[]);
    }

    fn on_panic(&mut self, detail: &str) {
        self.report_fault(&format!("tick panicked: {detail}"));
    }
}

/// Run control for one autonomous engine
///
/// `start` spawns the periodic driver (requires a tokio runtime), `pause`
/// keeps it firing as a no-op, `stop` joins it and finalizes the run.
pub struct Simulation {
    runner: Runner<Engine>,
    handle: EngineHandle,
}

impl Simulation {
    /// Wrap an engine; the mode is checked when the run starts
    pub fn new(engine: Engine) -> Self {
        let handle = engine.handle();
        let period = engine.config().tick_interval();
        Self {
            runner: Runner::new(engine, period, "simulation"),
            handle,
        }
    }

    /// Build an autonomous engine from `config`
    pub fn autonomous(config: SimulationConfig, sink: Arc<dyn EventSink>) -> SimulationResult<Self> {
        Ok(Self::new(Engine::autonomous(config, sink)?))
    }

    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.runner.state()
    }

    /// The engine, while the periodic driver does not own it
    pub fn engine_mut(&mut self) -> Option<&mut Engine> {
        self.runner.parked_mut()
    }

    pub fn start(&mut self) -> SimulationResult<()> {
        if let Some(engine) = self.runner.parked_mut() {
            if engine.mode() != GenerationMode::Autonomous {
                return Err(SimulationError::WrongMode {
                    expected: GenerationMode::Autonomous.as_str(),
                });
            }
        }
        self.runner.start()?;
        info!("Simulation started");
        Ok(())
    }

    pub fn pause(&mut self) -> SimulationResult<()> {
        self.runner.pause()
    }

    pub fn resume(&mut self) -> SimulationResult<()> {
        self.runner.resume()
    }

    /// Cancel the driver, finalize the engine and return its metrics
    pub async fn stop(&mut self) -> SimulationResult<Vec<MetricsRecord>> {
        let mut engine = self.runner.finish().await?;
        let records = engine.shutdown();
        info!(
            ticks = engine.clock(),
            terminated = records.len(),
            "Simulation stopped"
        );
        Ok(records)
    }
}
