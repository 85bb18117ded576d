/*!
 * Process Table
 * Append-only arena of process control blocks keyed by pid
 */

use super::types::{PcbEntry, Priority, ProcessState};
use crate::core::types::{Pid, Timestamp, Value};
use crate::program::Program;

/// Parameters of a new table entry
#[derive(Debug, Clone)]
pub struct Spawn {
    pub parent: Option<Pid>,
    pub program: Program,
    pub program_counter: usize,
    pub value: Value,
    pub priority: Priority,
    pub start_time: Timestamp,
}

/// Process table
///
/// Grows monotonically. Slots are never freed, so a pid stays valid for the
/// lifetime of the simulation.
#[derive(Debug, Clone, Default)]
pub struct PcbTable {
    entries: Vec<PcbEntry>,
}

impl PcbTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a ready entry at the next free slot and return its pid
    pub fn spawn(&mut self, spawn: Spawn) -> Pid {
        let pid = self.entries.len();
        self.entries.push(PcbEntry {
            pid,
            parent: spawn.parent,
            program: spawn.program,
            program_counter: spawn.program_counter,
            value: spawn.value,
            priority: spawn.priority,
            state: ProcessState::Ready,
            start_time: spawn.start_time,
            time_used: 0,
            time_finished: None,
        });
        pid
    }

    #[inline]
    pub fn get(&self, pid: Pid) -> Option<&PcbEntry> {
        self.entries.get(pid)
    }

    #[inline]
    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut PcbEntry> {
        self.entries.get_mut(pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PcbEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
