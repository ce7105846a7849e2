/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type (unique within one run, never reused)
pub type Pid = u32;

/// Simulated time, counted in ticks since the engine was created
pub type Tick = u64;

/// Priority level (lower number is more important, always >= 1)
pub type Priority = u32;

/// CPU burst length in ticks
pub type Burst = u32;

/// Round-robin time slice in ticks
pub type Quantum = u32;

/// Common result type for simulation operations
pub type SimulationResult<T> = Result<T, super::errors::SimulationError>;
