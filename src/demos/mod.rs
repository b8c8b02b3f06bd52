/*!
 * Demo Drivers
 * One driver per facility, plus the selector that runs them in order
 */

use crate::config::DemoConfig;
use crate::core::serde::is_none;
use crate::monitoring::span_operation;
use crate::process::{CommandSpec, ExitReport, ProcessResult, ProcessRunner};
use crate::task::{SumSet, SumSetReport, TaskResult};
use crate::worker::{Worker, WorkerConfig, WorkerReport, WorkerResult};
use log::info;
use serde::Serialize;
use std::str::FromStr;

/// The three demos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    ChildProcess,
    WorkerThreads,
    ParallelSums,
}

impl DemoKind {
    pub const ALL: [DemoKind; 3] = [
        DemoKind::ChildProcess,
        DemoKind::WorkerThreads,
        DemoKind::ParallelSums,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DemoKind::ChildProcess => "child-process",
            DemoKind::WorkerThreads => "worker-threads",
            DemoKind::ParallelSums => "parallel-sums",
        }
    }
}

impl FromStr for DemoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "child-process" => Ok(DemoKind::ChildProcess),
            "worker-threads" => Ok(DemoKind::WorkerThreads),
            "parallel-sums" => Ok(DemoKind::ParallelSums),
            other => Err(format!(
                "Unknown demo '{}' (expected child-process, worker-threads, or parallel-sums)",
                other
            )),
        }
    }
}

/// Worker demo detail: the joined worker plus the calling thread's count
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkerThreadsReport {
    pub worker: WorkerReport,
    pub main_iterations: u64,
}

/// Outcome of one demo run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DemoOutcome {
    pub demo: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub child_process: Option<ExitReport>,
    #[serde(skip_serializing_if = "is_none")]
    pub worker_threads: Option<WorkerThreadsReport>,
    #[serde(skip_serializing_if = "is_none")]
    pub parallel_sums: Option<SumSetReport>,
}

impl DemoOutcome {
    fn success(demo: DemoKind) -> Self {
        Self {
            demo: demo.name(),
            ok: true,
            error: None,
            child_process: None,
            worker_threads: None,
            parallel_sums: None,
        }
    }

    fn failure(demo: DemoKind, error: String) -> Self {
        Self {
            ok: false,
            error: Some(error),
            ..Self::success(demo)
        }
    }
}

/// Report for a full driver run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DemoReport {
    pub outcomes: Vec<DemoOutcome>,
}

impl DemoReport {
    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.ok)
    }
}

/// Spawn the configured child process and wait until it exits
pub fn run_child_process(config: &DemoConfig) -> ProcessResult<ExitReport> {
    let span = span_operation("child_process");
    let _guard = span.enter();

    let runner = ProcessRunner::new();
    let spec =
        CommandSpec::new(config.command.clone()).with_args(config.command_args.clone());

    info!("Spawning child '{}' and waiting until it exits", config.command);
    let result = runner.run(spec);

    match &result {
        Ok(report) => {
            info!(
                "Child process demo done: '{}' exited with code {}",
                report.command, report.exit_code
            );
            span.record_result(true);
        }
        Err(e) => span.record_error(&e.to_string()),
    }
    result
}

/// Spawn a worker thread, interleave work on the calling thread, then join
pub fn run_worker_threads(config: &DemoConfig) -> WorkerResult<WorkerThreadsReport> {
    let span = span_operation("worker_threads");
    let _guard = span.enter();

    let worker =
        Worker::spawn(WorkerConfig::new("A").with_iterations(config.worker_iterations))?;

    // The calling thread does the same counted work while the worker runs
    let main_iterations = crate::worker::counted_loop("main", config.worker_iterations);
    info!("Main thread has done its work, waiting for worker '{}'", worker.label());

    let result = worker.join().map(|worker| WorkerThreadsReport {
        worker,
        main_iterations,
    });

    match &result {
        Ok(report) => {
            info!(
                "Worker threads demo done: worker {} + main {} iterations",
                report.worker.iterations_done, report.main_iterations
            );
            span.record_result(true);
        }
        Err(e) => span.record_error(&e.to_string()),
    }
    result
}

/// Submit the configured partial sums and collect them into a total
pub async fn run_parallel_sums(config: &DemoConfig) -> TaskResult<SumSetReport> {
    let span = span_operation("parallel_sums");
    span.record_items_processed(config.sum_workloads.len());

    let result = async {
        let set = SumSet::spawn(&config.sum_workloads)?;
        set.collect().await
    }
    .await;

    match &result {
        Ok(report) => {
            info!("Parallel sums demo done: total {:.3}", report.total);
            span.record_result(true);
        }
        Err(e) => span.record_error(&e.to_string()),
    }
    result
}

/// Run the selected demos in order
///
/// A failing demo is recorded in its outcome; the remaining demos still run.
pub async fn run(kinds: &[DemoKind], config: &DemoConfig) -> DemoReport {
    let mut outcomes = Vec::with_capacity(kinds.len());

    for &kind in kinds {
        let outcome = match kind {
            DemoKind::ChildProcess => {
                let config = config.clone();
                // Waiting on the child blocks, so it runs off the async runtime
                match tokio::task::spawn_blocking(move || run_child_process(&config)).await {
                    Ok(Ok(report)) => DemoOutcome {
                        child_process: Some(report),
                        ..DemoOutcome::success(kind)
                    },
                    Ok(Err(e)) => DemoOutcome::failure(kind, e.to_string()),
                    Err(e) => DemoOutcome::failure(kind, e.to_string()),
                }
            }
            DemoKind::WorkerThreads => {
                let config = config.clone();
                match tokio::task::spawn_blocking(move || run_worker_threads(&config)).await {
                    Ok(Ok(report)) => DemoOutcome {
                        worker_threads: Some(report),
                        ..DemoOutcome::success(kind)
                    },
                    Ok(Err(e)) => DemoOutcome::failure(kind, e.to_string()),
                    Err(e) => DemoOutcome::failure(kind, e.to_string()),
                }
            }
            DemoKind::ParallelSums => match run_parallel_sums(config).await {
                Ok(report) => DemoOutcome {
                    parallel_sums: Some(report),
                    ..DemoOutcome::success(kind)
                },
                Err(e) => DemoOutcome::failure(kind, e.to_string()),
            },
        };
        outcomes.push(outcome);
    }

    DemoReport { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_kind_parse() {
        assert_eq!(
            "child-process".parse::<DemoKind>().unwrap(),
            DemoKind::ChildProcess
        );
        assert_eq!(
            "worker-threads".parse::<DemoKind>().unwrap(),
            DemoKind::WorkerThreads
        );
        assert_eq!(
            "parallel-sums".parse::<DemoKind>().unwrap(),
            DemoKind::ParallelSums
        );
        assert!("scheduler".parse::<DemoKind>().is_err());
    }

    #[test]
    fn test_demo_kind_names_round_trip() {
        for kind in DemoKind::ALL {
            assert_eq!(kind.name().parse::<DemoKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_outcome_serialization_skips_empty_fields() {
        let outcome = DemoOutcome::failure(DemoKind::ChildProcess, "boom".to_string());
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["demo"], "child-process");
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("worker_threads").is_none());
        assert!(json.get("parallel_sums").is_none());
    }
}
