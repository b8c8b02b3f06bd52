/*!
 * Process Types
 * Command specification, exit report, and error types
 */

use crate::core::serde::{is_empty_vec, is_false, is_none, is_zero_u64};
use crate::core::types::Pid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Process not found: {0}")]
    NotFound(Pid),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Command rejected: {0}")]
    Rejected(String),

    #[error("Wait failed: {0}")]
    WaitFailed(String),
}

/// Specification of a child process to spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CommandSpec {
    pub command: String,
    #[serde(default, skip_serializing_if = "is_empty_vec")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "is_empty_vec")]
    pub env_vars: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "is_none")]
    pub working_dir: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub capture_output: bool,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: vec![],
            env_vars: vec![],
            working_dir: None,
            capture_output: false,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_env(mut self, env_vars: Vec<(String, String)>) -> Self {
        self.env_vars = env_vars;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_output_capture(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

/// What happened to a child the runner waited on
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExitReport {
    pub pid: Pid,
    pub os_pid: u32,
    pub command: String,
    /// Exit code, or -1 when the child was terminated by a signal
    pub exit_code: i32,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub wall_time_micros: u64,
    /// Captured output, present when the spec asked for capture
    #[serde(skip_serializing_if = "is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub stderr: Option<String>,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
