/*!
 * Process Manager
 * Serializes commands onto one scheduler and feeds it from the command pipe
 */

use super::Command;
use crate::core::config::SimConfig;
use crate::core::errors::{CommandError, LoadError, SchedulerError, SimError, SimResult};
use crate::core::types::Pid;
use crate::monitoring::CommandSpan;
use crate::process::{QuantumOutcome, Scheduler, TerminationReport};
use crate::program::ProgramLoader;
use crate::reporting::{ReportFormat, SystemSnapshot};
use crate::transport::CommandReceiver;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one processed command
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Quantum(QuantumOutcome),
    Unblocked(Result<Pid, SchedulerError>),
    Snapshot(SystemSnapshot),
    Terminated(TerminationReport),
}

/// Cloneable handle to one simulation
///
/// Each command holds the scheduler lock for its whole duration, so commands
/// from any number of handles are applied in a total order.
#[derive(Clone)]
pub struct ProcessManager {
    scheduler: Arc<Mutex<Scheduler>>,
}

impl ProcessManager {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
        }
    }

    /// Boot process 0 from the configured init program
    pub fn boot(loader: Arc<dyn ProgramLoader>, config: &SimConfig) -> Result<Self, LoadError> {
        let scheduler = Scheduler::boot(loader, &config.init_program, config.init_priority)?;
        Ok(Self::new(scheduler))
    }

    /// Apply one command
    pub fn handle(&self, command: Command) -> Response {
        let mut scheduler = self.scheduler.lock();
        let span = CommandSpan::new(command, scheduler.timestamp());
        let _entered = span.enter();

        match command {
            Command::Quantum => Response::Quantum(scheduler.quantum()),
            Command::Unblock => {
                let result = scheduler.unblock();
                if let Err(error) = &result {
                    warn!(error = %error, "unblock rejected");
                }
                Response::Unblocked(result)
            }
            Command::Print => Response::Snapshot(scheduler.snapshot()),
            Command::Terminate => Response::Terminated(scheduler.terminate()),
        }
    }

    /// Decode and apply one command byte
    pub fn handle_byte(&self, byte: u8) -> Result<Response, CommandError> {
        let command = Command::try_from(byte)?;
        Ok(self.handle(command))
    }

    pub fn snapshot(&self) -> SystemSnapshot {
        self.scheduler.lock().snapshot()
    }

    /// Run `f` with shared access to the scheduler
    pub fn with_scheduler<R>(&self, f: impl FnOnce(&Scheduler) -> R) -> R {
        f(&self.scheduler.lock())
    }
}

/// Consume command bytes until `T` or until the pipe closes
///
/// A closed pipe is an implicit terminate. Snapshots and the final report are
/// written to `out`; rejected bytes are logged and ignored.
pub fn run_manager<W: Write>(
    manager: &ProcessManager,
    receiver: CommandReceiver,
    format: ReportFormat,
    mut out: W,
) -> SimResult<TerminationReport> {
    loop {
        let response = match receiver.recv() {
            Some(byte) => match manager.handle_byte(byte) {
                Ok(response) => response,
                Err(error) => {
                    warn!(error = %error, "command rejected");
                    continue;
                }
            },
            None => {
                info!("command pipe closed, terminating");
                manager.handle(Command::Terminate)
            }
        };

        match response {
            Response::Snapshot(snapshot) => {
                let rendered = snapshot
                    .render(format)
                    .map_err(|e| SimError::Io(e.to_string()))?;
                writeln!(out, "{}", rendered)?;
            }
            Response::Terminated(report) => {
                writeln!(out, "{}", report)?;
                out.flush()?;
                return Ok(report);
            }
            Response::Quantum(_) | Response::Unblocked(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Priority;
    use crate::program::{InMemoryLoader, Instruction};
    use pretty_assertions::assert_eq;

    fn manager(init: Vec<Instruction>) -> ProcessManager {
        let loader = InMemoryLoader::new().with_program("init", init);
        let scheduler = Scheduler::boot(Arc::new(loader), "init", Priority::HIGHEST).unwrap();
        ProcessManager::new(scheduler)
    }

    #[test]
    fn test_unknown_byte_rejected_without_state_change() {
        let manager = manager(vec![Instruction::Set(1)]);
        let before = manager.snapshot();

        assert_eq!(
            manager.handle_byte(b'z').unwrap_err(),
            CommandError::Unknown(b'z')
        );
        assert_eq!(manager.snapshot(), before);
    }

    #[test]
    fn test_print_does_not_mutate() {
        let manager = manager(vec![Instruction::Set(1), Instruction::Block]);
        manager.handle(Command::Quantum);

        let first = manager.snapshot();
        let Response::Snapshot(printed) = manager.handle(Command::Print) else {
            panic!("expected snapshot");
        };
        assert_eq!(printed, first);
        assert_eq!(manager.snapshot(), first);
    }

    #[test]
    fn test_unblock_with_nothing_blocked_reports_error() {
        let manager = manager(vec![Instruction::End]);
        assert_eq!(
            manager.handle(Command::Unblock),
            Response::Unblocked(Err(SchedulerError::NothingBlocked))
        );
    }

    #[test]
    fn test_clones_share_one_scheduler() {
        let manager = manager(vec![Instruction::Set(4)]);
        let other = manager.clone();
        other.handle(Command::Quantum);
        assert_eq!(manager.with_scheduler(|s| s.timestamp()), 1);
    }
}
