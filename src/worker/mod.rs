/*!
 * Worker Module
 * OS worker threads running counted work loops, joined for a report
 */

pub mod types;
pub mod worker;

// Re-export public types
pub use types::{WorkerConfig, WorkerError, WorkerReport, WorkerResult};
pub use worker::{counted_loop, Worker};
