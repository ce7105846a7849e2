/*!
 * Simulation Configuration
 * Construction-time parameters of a run, loadable from JSON
 */

use crate::core::errors::{ConfigError, SchedulerError, SimulationError};
use crate::core::limits::{
    DEFAULT_ARRIVAL_PROBABILITY, DEFAULT_BURST_MAX, DEFAULT_BURST_MIN, DEFAULT_PRIORITY_MAX,
    DEFAULT_PRIORITY_MIN, DEFAULT_SEED, DEFAULT_TICK_INTERVAL_MS,
};
use crate::core::types::{Burst, Priority, Quantum, SimulationResult};
use crate::scheduler::Algorithm;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    pub arrival_probability: f64,
    pub burst_min: Burst,
    pub burst_max: Burst,
    pub priority_min: Priority,
    pub priority_max: Priority,
    pub seed: u64,
    pub algorithm: Algorithm,
    /// Required for round-robin, ignored otherwise
    pub quantum: Option<Quantum>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            arrival_probability: DEFAULT_ARRIVAL_PROBABILITY,
            burst_min: DEFAULT_BURST_MIN,
            burst_max: DEFAULT_BURST_MAX,
            priority_min: DEFAULT_PRIORITY_MIN,
            priority_max: DEFAULT_PRIORITY_MAX,
            seed: DEFAULT_SEED,
            algorithm: Algorithm::default(),
            quantum: None,
        }
    }
}

impl SimulationConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Parse a JSON document and validate it
    pub fn from_json_str(json: &str) -> SimulationResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_quantum(mut self, quantum: Quantum) -> Self {
        self.quantum = Some(quantum);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tick_interval_ms(mut self, millis: u64) -> Self {
        self.tick_interval_ms = millis;
        self
    }

    pub fn with_arrival_probability(mut self, probability: f64) -> Self {
        self.arrival_probability = probability;
        self
    }

    pub fn with_burst_range(mut self, min: Burst, max: Burst) -> Self {
        self.burst_min = min;
        self.burst_max = max;
        self
    }

    pub fn with_priority_range(mut self, min: Priority, max: Priority) -> Self {
        self.priority_min = min;
        self.priority_max = max;
        self
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check every rule; the first violation wins
    pub fn validate(&self) -> SimulationResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval.into());
        }
        if !(0.0..=1.0).contains(&self.arrival_probability) {
            return Err(ConfigError::InvalidProbability(self.arrival_probability).into());
        }
        check_range("burst", self.burst_min, self.burst_max)?;
        check_range("priority", self.priority_min, self.priority_max)?;

        if self.algorithm.requires_quantum() {
            match self.quantum {
                None => return Err(SchedulerError::MissingQuantum.into()),
                Some(0) => return Err(SchedulerError::InvalidQuantum(0).into()),
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Quantum to hand to the scheduler (dropped for algorithms without one)
    #[inline]
    pub fn effective_quantum(&self) -> Option<Quantum> {
        self.quantum.filter(|_| self.algorithm.requires_quantum())
    }
}

fn check_range(name: &str, min: u32, max: u32) -> Result<(), SimulationError> {
    if min == 0 || min > max {
        return Err(ConfigError::InvalidRange {
            name: name.to_string(),
            min,
            max,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.arrival_probability, 0.35);
        assert_eq!((config.burst_min, config.burst_max), (5, 12));
        assert_eq!((config.priority_min, config.priority_max), (1, 5));
        assert_eq!(config.seed, 12345);
        assert_eq!(config.algorithm, Algorithm::Fcfs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_round_robin_needs_quantum() {
        let config = SimulationConfig::new(Algorithm::RoundRobin);
        assert_eq!(
            config.validate(),
            Err(SimulationError::Scheduler(SchedulerError::MissingQuantum))
        );
        assert!(config.clone().with_quantum(2).validate().is_ok());
        assert!(config.with_quantum(0).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = SimulationConfig::default();
        assert!(base.clone().with_arrival_probability(1.5).validate().is_err());
        assert!(base.clone().with_arrival_probability(f64::NAN).validate().is_err());
        assert!(base.clone().with_burst_range(0, 4).validate().is_err());
        assert!(base.clone().with_priority_range(5, 1).validate().is_err());
        assert_eq!(
            base.with_tick_interval_ms(0).validate(),
            Err(SimulationError::Config(ConfigError::InvalidTickInterval))
        );
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config =
            SimulationConfig::from_json_str(r#"{"algorithm": "rr", "quantum": 4, "seed": 7}"#)
                .unwrap();
        assert_eq!(config.algorithm, Algorithm::RoundRobin);
        assert_eq!(config.effective_quantum(), Some(4));
        assert_eq!(config.seed, 7);
        assert_eq!(config.burst_max, 12);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            SimulationConfig::from_json_str("{not json"),
            Err(SimulationError::Config(ConfigError::Parse(_)))
        ));
        assert!(matches!(
            SimulationConfig::from_json_str(r#"{"algorithm": "lottery"}"#),
            Err(SimulationError::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn test_quantum_ignored_outside_round_robin() {
        let config = SimulationConfig::new(Algorithm::Sjf).with_quantum(3);
        assert_eq!(config.effective_quantum(), None);
    }
}
