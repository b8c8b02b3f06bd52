/*!
 * Worker Types
 * Configuration, report, and error types for worker threads
 */

use crate::core::serde::is_zero_u64;
use crate::core::types::WorkerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default iteration count for the counted work loop
pub const DEFAULT_ITERATIONS: u64 = 10_000;

/// Worker operation result
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Worker errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("Invalid worker config: {0}")]
    InvalidConfig(String),

    #[error("Worker spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Worker panicked: {0}")]
    Panicked(String),
}

/// Configuration for a worker thread
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkerConfig {
    /// Label identifying the worker in logs and thread names
    pub label: String,
    /// Number of iterations the counted loop runs
    pub iterations: u64,
}

impl WorkerConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }
}

/// What a joined worker did
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkerReport {
    pub id: WorkerId,
    pub label: String,
    pub iterations_done: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub wall_time_micros: u64,
}
