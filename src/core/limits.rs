/*!
 * Simulation Limits and Constants
 *
 * Centralized location for the ranges and defaults used by the simulator.
 * Organized by domain for discoverability.
 */

use super::types::{Burst, Priority};

// =============================================================================
// PROCESS TELEMETRY
// =============================================================================

/// CPU usage bounds while a process is RUNNING (percent)
pub const CPU_RUNNING_MIN: u32 = 5;
pub const CPU_RUNNING_MAX: u32 = 100;

/// CPU usage bounds assigned at construction (percent)
pub const CPU_INITIAL_MAX: u32 = 30;

/// Memory bounds while a process is RUNNING (MB)
pub const MEMORY_RUNNING_MIN: u32 = 10;
pub const MEMORY_RUNNING_MAX: u32 = 2048;

/// Memory upper bound assigned at construction (MB)
pub const MEMORY_INITIAL_MAX: u32 = 200;

/// Highest priority value a process can hold (1 = most important)
pub const HIGHEST_PRIORITY: Priority = 1;

// =============================================================================
// SIMULATION DEFAULTS
// =============================================================================

/// Default tick period of the periodic driver (milliseconds)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// Default probability that a new process arrives on a tick
pub const DEFAULT_ARRIVAL_PROBABILITY: f64 = 0.35;

/// Default burst range for synthesized processes (ticks)
pub const DEFAULT_BURST_MIN: Burst = 5;
pub const DEFAULT_BURST_MAX: Burst = 12;

/// Default priority range for synthesized processes
pub const DEFAULT_PRIORITY_MIN: Priority = 1;
pub const DEFAULT_PRIORITY_MAX: Priority = 5;

/// Default RNG seed
pub const DEFAULT_SEED: u64 = 12345;

/// Multiplier used to derive per-process seeds in coordinated runs
pub const PROCESS_SEED_MULTIPLIER: u64 = 31;
