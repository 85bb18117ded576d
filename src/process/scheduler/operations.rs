/*!
 * Scheduler Core Operations
 * Quantum, unblock and terminate commands
 */

use super::executor::Transition;
use super::stats::TerminationReport;
use super::Scheduler;
use crate::core::errors::SchedulerError;
use crate::core::types::Pid;
use crate::process::types::ProcessState;
use crate::program::Instruction;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Result of one quantum command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QuantumOutcome {
    /// No process held the CPU; only the clock advanced
    Idle,
    /// One instruction ran on behalf of `pid`
    Executed {
        pid: Pid,
        instruction: Instruction,
        transition: Result<Transition, SchedulerError>,
        /// Process bound to the CPU by the dispatcher afterwards
        dispatched: Option<Pid>,
    },
}

impl Scheduler {
    /// Execute one quantum
    ///
    /// Fetches the instruction at the running process's program counter, or
    /// synthesizes `End` once the counter has run off the program. The clock
    /// advances exactly once per call. An idle CPU never dispatches here.
    pub fn quantum(&mut self) -> QuantumOutcome {
        let Some(pid) = self.running else {
            info!(timestamp = self.clock, "no processes are running");
            self.clock += 1;
            return QuantumOutcome::Idle;
        };

        let instruction = self.fetch(pid).unwrap_or_else(|| {
            info!(pid = pid, "end of program reached");
            Instruction::End
        });

        let transition = self.execute(&instruction);
        match &transition {
            Ok(outcome) => {
                info!(pid = pid, instruction = %instruction, ?outcome, "instruction executed")
            }
            Err(error) => {
                warn!(pid = pid, instruction = %instruction, error = %error, "instruction rejected")
            }
        }

        self.clock += 1;
        let dispatched = self.dispatch();
        self.checkpoint();

        QuantumOutcome::Executed {
            pid,
            instruction,
            transition,
            dispatched,
        }
    }

    /// Fetch the next instruction of `pid` and charge it one time unit
    fn fetch(&mut self, pid: Pid) -> Option<Instruction> {
        let entry = self.table.get_mut(pid)?;
        let instruction = entry.program.get(self.cpu.program_counter)?.clone();

        self.cpu.program_counter += 1;
        self.cpu.time_slice_used += 1;
        entry.time_used += 1;
        Some(instruction)
    }

    /// Copy the CPU checkpoint into the running entry
    fn checkpoint(&mut self) {
        let Some(pid) = self.running else {
            return;
        };
        if let Some(entry) = self.table.get_mut(pid) {
            entry.program_counter = self.cpu.program_counter;
            entry.value = self.cpu.value;
        }
    }

    /// Move the oldest blocked process to the ready queue and dispatch
    pub fn unblock(&mut self) -> Result<Pid, SchedulerError> {
        let pid = self.blocked.pop_front().ok_or(SchedulerError::NothingBlocked)?;

        match self.table.get_mut(pid) {
            Some(entry) => entry.state = ProcessState::Ready,
            None => return Err(super::missing_entry(pid)),
        }
        self.ready.push_back(pid);
        info!(pid = pid, "process unblocked");

        self.dispatch();
        Ok(pid)
    }

    /// Aggregate turnaround statistics over terminated processes
    pub fn terminate(&self) -> TerminationReport {
        let report = TerminationReport::from_table(&self.table);
        info!(
            terminated = report.terminated,
            average_turnaround = ?report.average_turnaround,
            "simulation terminated"
        );
        report
    }
}
