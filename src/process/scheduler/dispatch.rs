/*!
 * Dispatcher
 * Binds the head of the ready queue to an idle CPU
 */

use super::Scheduler;
use crate::core::types::Pid;
use crate::process::cpu::Cpu;
use crate::process::types::ProcessState;
use tracing::{debug, warn};

impl Scheduler {
    /// Dispatch the next ready process if the CPU is idle
    ///
    /// Never preempts: a running process keeps the CPU until it blocks or
    /// ends. Returns the newly dispatched pid.
    pub fn dispatch(&mut self) -> Option<Pid> {
        if self.running.is_some() {
            return None;
        }

        let pid = self.ready.pop_front()?;
        let Some(entry) = self.table.get_mut(pid) else {
            warn!(pid = pid, "ready queue held a pid with no table entry");
            return None;
        };

        entry.state = ProcessState::Running;
        self.cpu = Cpu {
            program_counter: entry.program_counter,
            value: entry.value,
            time_slice: entry.priority.time_slice(),
            time_slice_used: entry.time_used,
        };
        self.running = Some(pid);

        debug!(
            pid = pid,
            priority = entry.priority.get(),
            time_slice = self.cpu.time_slice,
            "process dispatched"
        );
        Some(pid)
    }
}
