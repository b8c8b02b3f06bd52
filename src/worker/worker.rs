/*!
 * Worker Thread
 * Named OS thread running a counted loop, joined by the owner
 */

use super::types::{WorkerConfig, WorkerError, WorkerReport, WorkerResult};
use crate::core::types::WorkerId;
use log::{debug, info, trace};
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Instant;

static NEXT_WORKER_ID: AtomicU32 = AtomicU32::new(1);

/// Handle to a spawned worker thread
///
/// The handle owns the thread; `join` consumes it. Dropping an unjoined
/// handle detaches the thread, so owners are expected to join.
pub struct Worker {
    id: WorkerId,
    label: String,
    handle: thread::JoinHandle<u64>,
    started: Instant,
}

impl Worker {
    /// Spawn a named worker thread running the counted loop
    pub fn spawn(config: WorkerConfig) -> WorkerResult<Worker> {
        if config.label.trim().is_empty() {
            return Err(WorkerError::InvalidConfig("Empty label".to_string()));
        }
        if config.iterations == 0 {
            return Err(WorkerError::InvalidConfig(
                "Iteration count must be nonzero".to_string(),
            ));
        }

        let id = NEXT_WORKER_ID.fetch_add(1, Ordering::SeqCst);
        let label = config.label.clone();
        let iterations = config.iterations;

        let handle = thread::Builder::new()
            .name(format!("worker-{}", label))
            .spawn(move || counted_loop(&label, iterations))
            .map_err(|e| WorkerError::SpawnFailed(e.to_string()))?;

        info!(
            "Spawned worker '{}' (id: {}, {} iterations)",
            config.label, id, iterations
        );

        Ok(Worker {
            id,
            label: config.label,
            handle,
            started: Instant::now(),
        })
    }

    /// Join the worker thread and report what it did
    pub fn join(self) -> WorkerResult<WorkerReport> {
        let iterations_done = self.handle.join().map_err(|e| {
            let msg = e
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| e.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            WorkerError::Panicked(msg)
        })?;

        let report = WorkerReport {
            id: self.id,
            label: self.label,
            iterations_done,
            wall_time_micros: self.started.elapsed().as_micros() as u64,
        };
        info!(
            "Worker '{}' (id: {}) joined after {} iterations",
            report.label, report.id, report.iterations_done
        );
        Ok(report)
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check whether the worker's loop has already returned
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// The counted work loop run on the worker thread
///
/// Emits a trace tick per iteration and a progress line every 1000, then
/// returns the iteration count for the join report.
pub fn counted_loop(label: &str, iterations: u64) -> u64 {
    let mut done = 0u64;
    for i in 0..iterations {
        trace!("[{}] tick {}", label, i);
        done += 1;
        if done % 1000 == 0 {
            debug!("Worker '{}' progress: {}/{}", label, done, iterations);
        }
    }
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_spawn_and_join() {
        let worker = Worker::spawn(WorkerConfig::new("unit").with_iterations(100)).unwrap();
        assert_eq!(worker.label(), "unit");

        let report = worker.join().unwrap();
        assert_eq!(report.iterations_done, 100);
        assert_eq!(report.label, "unit");
    }

    #[test]
    fn test_empty_label_rejected() {
        let result = Worker::spawn(WorkerConfig::new("   "));
        assert!(matches!(result, Err(WorkerError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = Worker::spawn(WorkerConfig::new("z").with_iterations(0));
        assert!(matches!(result, Err(WorkerError::InvalidConfig(_))));
    }

    #[test]
    fn test_worker_ids_unique() {
        let a = Worker::spawn(WorkerConfig::new("a").with_iterations(1)).unwrap();
        let b = Worker::spawn(WorkerConfig::new("b").with_iterations(1)).unwrap();
        assert_ne!(a.id(), b.id());
        a.join().unwrap();
        b.join().unwrap();
    }

    #[test]
    fn test_is_finished_after_work() {
        let worker = Worker::spawn(WorkerConfig::new("fin").with_iterations(10)).unwrap();

        // Tiny loop finishes quickly; poll with a deadline
        let deadline = Instant::now() + Duration::from_secs(5);
        while !worker.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(worker.is_finished());
        worker.join().unwrap();
    }

    #[test]
    fn test_counted_loop_counts() {
        assert_eq!(counted_loop("direct", 42), 42);
    }

    #[test]
    fn test_join_maps_panic_to_error() {
        let handle = thread::Builder::new()
            .name("worker-explosive".to_string())
            .spawn(|| -> u64 { panic!("worker exploded") })
            .unwrap();
        let worker = Worker {
            id: 0,
            label: "explosive".to_string(),
            handle,
            started: Instant::now(),
        };

        let err = worker.join().unwrap_err();
        assert!(matches!(
            err,
            WorkerError::Panicked(ref msg) if msg.contains("worker exploded")
        ));
    }
}
