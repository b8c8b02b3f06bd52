/*!
 * Core Types
 * Common identifier types used across the crate
 */

/// Internal process ID assigned by the runner (not the OS pid)
pub type Pid = u32;

/// Worker thread ID
pub type WorkerId = u32;

/// Async task ID within a task set
pub type TaskId = u32;
