/*!
 * Parallel Sum Task Tests
 * Tests for async partial sums and the blocking accessor
 */

use pretty_assertions::assert_eq;
use spawnkit::task::{collect_sums_blocking, random_sum, SumSet, TaskError};

#[tokio::test]
async fn test_partial_sums_collected_in_order() {
    let workloads = [500, 900, 1_000];
    let report = SumSet::spawn(&workloads).unwrap().collect().await.unwrap();

    assert_eq!(report.partials.len(), 3);
    for (i, partial) in report.partials.iter().enumerate() {
        assert_eq!(partial.id, i as u32);
        assert_eq!(partial.n_values, workloads[i]);
        assert!(partial.sum > 0.0);
        assert!(partial.sum < partial.n_values as f64);
    }
}

#[tokio::test]
async fn test_total_is_sum_of_partials() {
    let report = SumSet::spawn(&[1_000, 2_000]).unwrap().collect().await.unwrap();

    let expected: f64 = report.partials.iter().map(|p| p.sum).sum();
    assert_eq!(report.total, expected);
}

#[tokio::test]
async fn test_invalid_workloads_rejected_before_spawn() {
    assert!(matches!(
        SumSet::spawn(&[]),
        Err(TaskError::InvalidWorkload(_))
    ));
    assert!(matches!(
        SumSet::spawn(&[100, 0]),
        Err(TaskError::InvalidWorkload(_))
    ));
}

#[tokio::test]
async fn test_many_tasks_in_parallel() {
    let workloads = vec![250; 16];
    let report = SumSet::spawn(&workloads).unwrap().collect().await.unwrap();

    assert_eq!(report.partials.len(), 16);
    assert!(report.total > 0.0);
    assert!(report.total < 16.0 * 250.0);
}

#[test]
fn test_blocking_accessor_outside_runtime() {
    // Submit, then block on the result from a plain synchronous caller
    let report = collect_sums_blocking(&[500, 900, 1_000]).unwrap();

    assert_eq!(report.partials.len(), 3);
    let expected: f64 = report.partials.iter().map(|p| p.sum).sum();
    assert_eq!(report.total, expected);
}

#[test]
fn test_random_sum_mean_is_plausible() {
    // Mean of uniform [0,1) is 0.5; with 10k samples the sum should be
    // comfortably inside [4000, 6000]
    let sum = random_sum(10_000);
    assert!(sum > 4_000.0, "sum {} too small", sum);
    assert!(sum < 6_000.0, "sum {} too large", sum);
}
