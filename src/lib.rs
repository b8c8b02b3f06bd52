/*!
 * spawnkit Library
 * Three small execution facilities behind typed APIs:
 * OS child processes, worker threads, and parallel async tasks
 */

pub mod config;
pub mod core;
pub mod demos;
pub mod monitoring;
pub mod process;
pub mod task;
pub mod worker;

// Re-exports
pub use config::DemoConfig;
pub use monitoring::init_tracing;
pub use process::{CommandSpec, ExitReport, ProcessRunner};
pub use task::{collect_sums_blocking, SumSet, SumSetReport};
pub use worker::{Worker, WorkerConfig, WorkerReport};
