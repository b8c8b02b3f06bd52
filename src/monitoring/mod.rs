/*!
 * Monitoring Module
 * Structured tracing setup and operation spans
 */

pub mod tracer;

pub use tracer::{init_tracing, span_operation, OperationSpan};
