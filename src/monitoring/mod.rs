/*!
 * Monitoring
 * Structured logging for the simulator
 */

mod tracer;

pub use tracer::{init_tracing, CommandSpan};
