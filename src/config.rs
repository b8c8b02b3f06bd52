/*!
 * Demo Configuration
 * Parameters for the three demos, with env-var overrides
 */

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the child process command line
pub const ENV_COMMAND: &str = "SPAWNKIT_COMMAND";
/// Environment variable overriding the worker iteration count
pub const ENV_WORKER_ITERATIONS: &str = "SPAWNKIT_WORKER_ITERATIONS";
/// Environment variable overriding the sum workloads (comma-separated)
pub const ENV_SUM_WORKLOADS: &str = "SPAWNKIT_SUM_WORKLOADS";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Parameters for the demo driver
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DemoConfig {
    /// Command the child process demo spawns
    pub command: String,
    pub command_args: Vec<String>,
    /// Iterations for the worker thread's counted loop
    pub worker_iterations: u64,
    /// Value counts for the parallel sum tasks
    pub sum_workloads: Vec<usize>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            command: "ps".to_string(),
            command_args: vec![],
            worker_iterations: 10_000,
            sum_workloads: vec![50_000, 90_000, 100_000],
        }
    }
}

impl DemoConfig {
    /// Build the config from defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(ENV_COMMAND) {
            let mut parts = raw.split_whitespace().map(str::to_string);
            config.command = parts.next().ok_or(ConfigError::InvalidVar {
                var: ENV_COMMAND,
                reason: "Empty command".to_string(),
            })?;
            config.command_args = parts.collect();
        }

        if let Ok(raw) = std::env::var(ENV_WORKER_ITERATIONS) {
            config.worker_iterations =
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidVar {
                        var: ENV_WORKER_ITERATIONS,
                        reason: e.to_string(),
                    })?;
        }

        if let Ok(raw) = std::env::var(ENV_SUM_WORKLOADS) {
            config.sum_workloads = raw
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<usize>()
                        .map_err(|e| ConfigError::InvalidVar {
                            var: ENV_SUM_WORKLOADS,
                            reason: format!("'{}': {}", part.trim(), e),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
        }

        Ok(config)
    }
}
