/*!
 * CPU Context
 * The single register set shared by whichever process is running
 */

use crate::core::types::Value;
use serde::{Deserialize, Serialize};

/// CPU registers
///
/// Bound to the scheduler's running slot. The running program itself lives in
/// the running PCB entry and is only borrowed for one quantum at a time;
/// `program_counter` and `value` are checkpointed back into that entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    pub program_counter: usize,
    pub value: Value,
    /// Priority-derived quota for the current dispatch (advisory)
    pub time_slice: u32,
    pub time_slice_used: u64,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }
}
