/*!
 * Parallel Sum Computation
 * CPU-bound partial sums submitted to the blocking pool and collected
 */

use super::types::{PartialSum, SumSetReport, SumTask, TaskError, TaskResult};
use crate::core::types::TaskId;
use futures::future::try_join_all;
use log::{debug, info};
use rand::Rng;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Sum `n_values` uniform random values in `[0, 1)`
///
/// Stand-in for a real CPU-bound computation. Uses the thread-local RNG so
/// concurrent tasks draw independent sequences.
pub fn random_sum(n_values: usize) -> f64 {
    let mut rng = rand::thread_rng();
    let mut sum = 0.0;
    for _ in 0..n_values {
        sum += rng.gen::<f64>();
    }
    sum
}

impl SumTask {
    /// Run the task's computation to completion
    pub fn compute(self) -> PartialSum {
        PartialSum {
            id: self.id,
            n_values: self.n_values,
            sum: random_sum(self.n_values),
        }
    }
}

/// A set of in-flight partial sum tasks
///
/// Tasks run on the runtime's blocking pool; `collect` awaits them all.
pub struct SumSet {
    handles: Vec<JoinHandle<PartialSum>>,
    started: Instant,
}

impl SumSet {
    /// Submit one task per workload
    ///
    /// Must be called from within a tokio runtime. Workloads are validated
    /// before anything is spawned.
    pub fn spawn(workloads: &[usize]) -> TaskResult<SumSet> {
        if workloads.is_empty() {
            return Err(TaskError::InvalidWorkload("No workloads given".to_string()));
        }
        if let Some(pos) = workloads.iter().position(|&n| n == 0) {
            return Err(TaskError::InvalidWorkload(format!(
                "Workload {} has zero values",
                pos
            )));
        }

        let handles = workloads
            .iter()
            .enumerate()
            .map(|(id, &n_values)| {
                let task = SumTask::new(id as TaskId, n_values);
                debug!("Submitting sum task {} ({} values)", task.id, task.n_values);
                // CPU-bound work goes to the blocking pool, off the async runtime
                tokio::task::spawn_blocking(move || task.compute())
            })
            .collect();

        info!("Submitted {} sum tasks", workloads.len());

        Ok(SumSet {
            handles,
            started: Instant::now(),
        })
    }

    /// Number of in-flight tasks
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Await every task and sum the partials
    ///
    /// Partials keep submission order. A panicked task surfaces as
    /// `JoinFailed` rather than aborting the caller.
    pub async fn collect(self) -> TaskResult<SumSetReport> {
        let partials = try_join_all(self.handles)
            .await
            .map_err(|e| TaskError::JoinFailed(e.to_string()))?;

        let total: f64 = partials.iter().map(|p| p.sum).sum();
        let report = SumSetReport {
            partials,
            total,
            wall_time_micros: self.started.elapsed().as_micros() as u64,
        };
        info!(
            "Collected {} partial sums, total {:.3}",
            report.partials.len(),
            report.total
        );
        Ok(report)
    }
}

/// Blocking accessor for non-async callers
///
/// Builds a runtime, submits the workloads, and blocks until every partial
/// is in. Calling this from inside a tokio runtime panics; async callers
/// use `SumSet::spawn` + `collect` directly.
pub fn collect_sums_blocking(workloads: &[usize]) -> TaskResult<SumSetReport> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| TaskError::Runtime(e.to_string()))?;
    runtime.block_on(async { SumSet::spawn(workloads)?.collect().await })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_sum_bounds() {
        let sum = random_sum(1000);
        assert!(sum > 0.0);
        assert!(sum < 1000.0);
    }

    #[tokio::test]
    async fn test_spawn_and_collect() {
        let set = SumSet::spawn(&[100, 200, 300]).unwrap();
        assert_eq!(set.len(), 3);

        let report = set.collect().await.unwrap();
        assert_eq!(report.partials.len(), 3);

        // Submission order is preserved
        for (i, partial) in report.partials.iter().enumerate() {
            assert_eq!(partial.id, i as u32);
            assert!(partial.sum >= 0.0);
            assert!(partial.sum <= partial.n_values as f64);
        }

        let expected: f64 = report.partials.iter().map(|p| p.sum).sum();
        assert_eq!(report.total, expected);
    }

    #[tokio::test]
    async fn test_empty_workloads_rejected() {
        let result = SumSet::spawn(&[]);
        assert!(matches!(result, Err(TaskError::InvalidWorkload(_))));
    }

    #[tokio::test]
    async fn test_zero_workload_rejected() {
        let result = SumSet::spawn(&[100, 0, 300]);
        assert!(matches!(result, Err(TaskError::InvalidWorkload(_))));
    }

    #[test]
    fn test_blocking_accessor() {
        let report = collect_sums_blocking(&[50, 60]).unwrap();
        assert_eq!(report.partials.len(), 2);
        assert!(report.total > 0.0);
    }

    #[test]
    fn test_sum_task_compute_bounds() {
        let partial = SumTask::new(7, 100).compute();
        assert_eq!(partial.id, 7);
        assert_eq!(partial.n_values, 100);
        assert!(partial.sum > 0.0);
        assert!(partial.sum < 100.0);
    }

    #[tokio::test]
    async fn test_collect_maps_task_panic_to_join_failed() {
        let set = SumSet {
            handles: vec![tokio::task::spawn_blocking(|| -> PartialSum {
                panic!("task exploded")
            })],
            started: Instant::now(),
        };

        let err = set.collect().await.unwrap_err();
        assert!(matches!(err, TaskError::JoinFailed(_)));
    }
}
