/*!
 * Process Types
 * Process control block, state and priority
 */

use crate::core::errors::SchedulerError;
use crate::core::limits::{MAX_PRIORITY, TIME_SLICES};
use crate::core::types::{Pid, Timestamp, Value};
use crate::program::Program;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Waiting in the ready queue
    Ready,
    /// Bound to the CPU
    Running,
    /// Waiting in the blocked queue for an unblock
    Blocked,
    /// Finished; absorbing
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Blocked => "BLOCKED",
            ProcessState::Terminated => "TERMINATED",
        };
        f.write_str(name)
    }
}

/// Process priority in `0..=3`
///
/// Lower values get shorter time slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Highest-responsiveness tier
    pub const HIGHEST: Priority = Priority(0);

    /// Build a priority known to be in range at compile time
    pub(crate) const fn new_unchecked(value: u8) -> Self {
        Self(value)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Time slice granted on dispatch
    #[inline]
    #[must_use]
    pub const fn time_slice(self) -> u32 {
        TIME_SLICES[self.0 as usize]
    }
}

impl TryFrom<u8> for Priority {
    type Error = SchedulerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > MAX_PRIORITY {
            return Err(SchedulerError::InvalidPriority(value));
        }
        Ok(Self(value))
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process control block
///
/// Created once and never removed. `pid` always equals the table slot.
#[derive(Debug, Clone)]
pub struct PcbEntry {
    pub pid: Pid,
    /// `None` for the bootstrap process
    pub parent: Option<Pid>,
    pub program: Program,
    pub program_counter: usize,
    pub value: Value,
    pub priority: Priority,
    pub state: ProcessState,
    pub start_time: Timestamp,
    pub time_used: u64,
    /// Set only once the process is terminated
    pub time_finished: Option<Timestamp>,
}

impl PcbEntry {
    #[inline(always)]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, ProcessState::Terminated)
    }

    /// `time_finished - start_time`, once terminated
    #[must_use]
    pub fn turnaround(&self) -> Option<u64> {
        self.time_finished
            .map(|finished| finished.saturating_sub(self.start_time))
    }
}
