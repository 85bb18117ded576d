/*!
 * CPU Scheduler
 * Owns the process table, CPU context, queues and clock of one simulation
 */

use super::cpu::Cpu;
use super::table::{PcbTable, Spawn};
use super::types::{PcbEntry, Priority, ProcessState};
use crate::core::errors::{LoadError, SchedulerError};
use crate::core::limits::INIT_PID;
use crate::core::types::{Pid, Timestamp};
use crate::program::ProgramLoader;
use crate::reporting::{CpuSnapshot, ProcessInfo, SystemSnapshot};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::info;

mod dispatch;
mod executor;
mod operations;
mod stats;

pub use executor::Transition;
pub use operations::QuantumOutcome;
pub use stats::{TerminationReport, TurnaroundStats};

/// Single-CPU scheduler
///
/// Every operation takes `&mut self` and runs to completion, so commands are
/// applied in a total order. The running slot, ready queue, blocked queue and
/// the set of terminated entries partition the process table.
pub struct Scheduler {
    table: PcbTable,
    cpu: Cpu,

    // At most one process holds the CPU
    running: Option<Pid>,
    ready: VecDeque<Pid>,
    blocked: VecDeque<Pid>,

    clock: Timestamp,
    stats: TurnaroundStats,

    loader: Arc<dyn ProgramLoader>,
}

impl Scheduler {
    /// Create process 0 from `init_program` and dispatch it
    ///
    /// A failed bootstrap load aborts the simulation.
    pub fn boot(
        loader: Arc<dyn ProgramLoader>,
        init_program: &str,
        priority: Priority,
    ) -> Result<Self, LoadError> {
        let program = loader.load(init_program)?;

        let mut scheduler = Self {
            table: PcbTable::new(),
            cpu: Cpu::new(),
            running: None,
            ready: VecDeque::new(),
            blocked: VecDeque::new(),
            clock: 0,
            stats: TurnaroundStats::default(),
            loader,
        };

        let pid = scheduler.table.spawn(Spawn {
            parent: None,
            program,
            program_counter: 0,
            value: 0,
            priority,
            start_time: 0,
        });
        debug_assert_eq!(pid, INIT_PID);
        scheduler.ready.push_back(pid);
        scheduler.dispatch();

        info!(
            program = init_program,
            priority = priority.get(),
            "init process created"
        );
        Ok(scheduler)
    }

    #[inline]
    pub fn table(&self) -> &PcbTable {
        &self.table
    }

    #[inline]
    pub fn process(&self, pid: Pid) -> Option<&PcbEntry> {
        self.table.get(pid)
    }

    #[inline]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Pid bound to the CPU, if any
    #[inline]
    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    pub fn ready(&self) -> impl Iterator<Item = Pid> + '_ {
        self.ready.iter().copied()
    }

    pub fn blocked(&self) -> impl Iterator<Item = Pid> + '_ {
        self.blocked.iter().copied()
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.clock
    }

    /// Running turnaround totals, updated as processes end
    #[inline]
    pub fn stats(&self) -> TurnaroundStats {
        self.stats
    }

    /// Read-only view of the table, CPU and queues
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            timestamp: self.clock,
            running: self.running,
            ready: self.ready.iter().copied().collect(),
            blocked: self.blocked.iter().copied().collect(),
            cpu: CpuSnapshot::from(&self.cpu),
            processes: self.table.iter().map(ProcessInfo::from).collect(),
        }
    }

    /// Check the scheduling invariants
    ///
    /// - every entry's pid equals its slot
    /// - running, ready and blocked are pairwise disjoint and only hold
    ///   existing pids
    /// - each entry's state agrees with the collection holding it, and
    ///   terminated entries are held by none
    pub fn verify(&self) -> Result<(), SchedulerError> {
        let mut location: Vec<Option<ProcessState>> = vec![None; self.table.len()];

        let held = self
            .running
            .iter()
            .map(|&pid| (pid, ProcessState::Running))
            .chain(self.ready.iter().map(|&pid| (pid, ProcessState::Ready)))
            .chain(self.blocked.iter().map(|&pid| (pid, ProcessState::Blocked)));

        for (pid, state) in held {
            let slot = location.get_mut(pid).ok_or_else(|| violation(pid, "queued pid has no entry"))?;
            if slot.is_some() {
                return Err(violation(pid, "held by more than one queue"));
            }
            *slot = Some(state);
        }

        for (slot, entry) in self.table.iter().enumerate() {
            if entry.pid != slot {
                return Err(violation(slot, "pid does not match table slot"));
            }
            match (entry.state, location[slot]) {
                (ProcessState::Terminated, None) => {}
                (state, Some(held)) if state == held => {}
                (state, held) => {
                    return Err(violation(
                        slot,
                        &format!("state {} but held by {:?}", state, held),
                    ));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("clock", &self.clock)
            .field("running", &self.running)
            .field("ready", &self.ready)
            .field("blocked", &self.blocked)
            .field("cpu", &self.cpu)
            .field("processes", &self.table.len())
            .finish()
    }
}

fn violation(pid: Pid, reason: &str) -> SchedulerError {
    SchedulerError::InvariantViolation {
        pid,
        reason: reason.to_string(),
    }
}

/// Error for a pid the scheduler holds but the table lacks
pub(super) fn missing_entry(pid: Pid) -> SchedulerError {
    violation(pid, "no table entry")
}
