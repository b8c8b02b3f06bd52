/*!
 * Process Module
 * OS child process spawning, waiting, and termination
 */

pub mod runner;
pub mod types;

// Re-export public types
pub use runner::ProcessRunner;
pub use types::{CommandSpec, ExitReport, ProcessError, ProcessResult};
