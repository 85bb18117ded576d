/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::Pid;
use crate::program::OpCode;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Program load errors
///
/// Fatal to one load attempt only. The caller decides the fallback.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum LoadError {
    #[error("Error opening file {source_name}: {reason}")]
    #[diagnostic(
        code(load::io),
        help("Check that the program file exists and is readable.")
    )]
    Io { source_name: String, reason: String },

    #[error("{source_name}:{line} - Invalid integer argument '{argument}' for {op} operation")]
    #[diagnostic(
        code(load::invalid_integer),
        help("S, A, D and F take a single integer argument, e.g. `S 5`.")
    )]
    InvalidInteger {
        source_name: String,
        line: usize,
        op: OpCode,
        argument: String,
    },

    #[error("{source_name}:{line} - Missing string argument for {op} operation")]
    #[diagnostic(
        code(load::missing_argument),
        help("R takes the name of the program to load, e.g. `R child`.")
    )]
    MissingArgument {
        source_name: String,
        line: usize,
        op: OpCode,
    },

    #[error("{source_name}:{line} - Invalid operation '{op}'")]
    #[diagnostic(
        code(load::invalid_operation),
        help("Valid operations are S, A, D, B, E, F and R.")
    )]
    InvalidOperation {
        source_name: String,
        line: usize,
        op: char,
    },
}

/// Scheduler errors
///
/// Illegal operations are non-fatal: the operation is a no-op and the
/// simulation continues.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("No process is running to execute {op}")]
    #[diagnostic(
        code(scheduler::no_running_process),
        help("Unblock a process or wait for one to become ready.")
    )]
    NoRunningProcess { op: OpCode },

    #[error("Fork offset {offset} is negative")]
    #[diagnostic(
        code(scheduler::negative_fork_offset),
        help("Fork offsets count instructions the parent skips and cannot be negative.")
    )]
    NegativeForkOffset { offset: i64 },

    #[error("Fork offset {offset} from program counter {program_counter} exceeds program length {program_len}")]
    #[diagnostic(
        code(scheduler::fork_out_of_range),
        help("The parent must land inside its program after skipping the offset.")
    )]
    ForkOutOfRange {
        offset: i64,
        program_counter: usize,
        program_len: usize,
    },

    #[error("No blocked process to unblock")]
    #[diagnostic(code(scheduler::nothing_blocked))]
    NothingBlocked,

    #[error("Priority out of range: {0}")]
    #[diagnostic(
        code(scheduler::invalid_priority),
        help("Priority must be between 0 and 3.")
    )]
    InvalidPriority(u8),

    #[error("Scheduler invariant violated for process {pid}: {reason}")]
    #[diagnostic(code(scheduler::invariant_violation))]
    InvariantViolation { pid: Pid, reason: String },
}

/// Command errors
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CommandError {
    #[error("Invalid command {:?}", char::from(*.0))]
    #[diagnostic(code(command::unknown), help("Enter Q, P, U or T."))]
    Unknown(u8),
}

/// Command transport errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Diagnostic)]
pub enum TransportError {
    #[error("Command pipe closed")]
    #[diagnostic(
        code(transport::closed),
        help("The other end of the pipe has exited.")
    )]
    Closed,
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    #[diagnostic(
        code(config::invalid_value),
        help("SIM_INIT_PRIORITY must be 0-3, SIM_REPORT_FORMAT must be text or json.")
    )]
    InvalidValue { key: String, value: String },
}

/// Unified simulator error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SimError {
    #[error("Load error: {0}")]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Command error: {0}")]
    #[diagnostic(transparent)]
    Command(#[from] CommandError),

    #[error("Transport error: {0}")]
    #[diagnostic(transparent)]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(sim::io_error),
        help("Writing a report or reading commands failed.")
    )]
    Io(String),
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err.to_string())
    }
}

/// Result type for simulator operations
pub type SimResult<T> = std::result::Result<T, SimError>;
