/*!
 * Process Scheduler Simulator Library
 *
 * Single-CPU, priority-driven process scheduler simulated in user space:
 * process table, ready/blocked/running state machine, instruction execution
 * and quantum-based dispatch, driven by a single-character command language.
 */

pub mod command;
pub mod core;
pub mod monitoring;
pub mod process;
pub mod program;
pub mod reporting;
pub mod transport;

// Re-exports
pub use command::{run_manager, Command, ProcessManager, Response};
pub use crate::core::{
    CommandError, ConfigError, LoadError, Pid, SchedulerError, SimConfig, SimError, SimResult,
    Timestamp, TransportError, Value,
};
pub use monitoring::init_tracing;
pub use process::{
    PcbEntry, Priority, ProcessState, QuantumOutcome, Scheduler, TerminationReport, Transition,
};
pub use program::{FileLoader, InMemoryLoader, Instruction, OpCode, Program, ProgramLoader};
pub use reporting::{ReportFormat, SystemSnapshot};
pub use transport::{pipe, run_commander};
