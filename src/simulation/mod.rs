/*!
 * Simulation Module
 * Engine, run control and the paired comparison driver
 */

mod action;
mod autonomous;
mod comparator;
mod config;
mod driver;
mod engine;
mod handle;
mod run_id;
mod snapshot;

pub use action::{process_seed, Action, ArrivalSpec};
pub use autonomous::Simulation;
pub use comparator::{Comparator, ComparisonReport, PairObserver};
pub use config::SimulationConfig;
pub use driver::RunState;
pub use engine::{Engine, GenerationMode, SnapshotObserver};
pub use handle::EngineHandle;
pub use run_id::{compare_dir, compare_metrics_path, run_id, run_id_at, single_run_metrics_path};
pub use snapshot::{ProcessRow, Snapshot};
