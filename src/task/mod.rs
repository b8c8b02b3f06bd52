/*!
 * Task Module
 * Parallel partial computations on the runtime's blocking pool
 */

pub mod compute;
pub mod types;

// Re-export public types
pub use compute::{collect_sums_blocking, random_sum, SumSet};
pub use types::{PartialSum, SumSetReport, SumTask, TaskError, TaskResult};
