/*!
 * Task Types
 * Partial sum results and error types
 */

use crate::core::serde::is_zero_u64;
use crate::core::types::TaskId;
use serde::Serialize;
use thiserror::Error;

/// Task operation result
pub type TaskResult<T> = Result<T, TaskError>;

/// Task errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Invalid workload: {0}")]
    InvalidWorkload(String),

    #[error("Task join failed: {0}")]
    JoinFailed(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// One unit of partial work: how many random values task `id` sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SumTask {
    pub id: TaskId,
    pub n_values: usize,
}

impl SumTask {
    pub fn new(id: TaskId, n_values: usize) -> Self {
        Self { id, n_values }
    }
}

/// Result of one partial computation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialSum {
    pub id: TaskId,
    pub n_values: usize,
    pub sum: f64,
}

/// Collected results of a task set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SumSetReport {
    /// Partials in submission order
    pub partials: Vec<PartialSum>,
    pub total: f64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub wall_time_micros: u64,
}
