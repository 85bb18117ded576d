/*!
 * Process Module
 * Process table, CPU context and scheduling
 */

pub mod cpu;
pub mod scheduler;
pub mod table;
pub mod types;

// Re-export for convenience
pub use cpu::Cpu;
pub use scheduler::{QuantumOutcome, Scheduler, TerminationReport, Transition, TurnaroundStats};
pub use table::{PcbTable, Spawn};
pub use types::{PcbEntry, Priority, ProcessState};
