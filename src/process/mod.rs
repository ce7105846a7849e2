/*!
 * Process Module
 * Simulated process entity, its state machine, and the engine's master table
 */

mod entity;
mod table;
pub mod types;

// Re-export for convenience
pub use entity::Process;
pub use table::ProcessTable;
pub use types::ProcessState;
