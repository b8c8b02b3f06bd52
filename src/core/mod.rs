/*!
 * Core Module
 * Shared types and serde helpers
 */

pub mod serde;
pub mod types;

pub use types::{Pid, TaskId, WorkerId};
