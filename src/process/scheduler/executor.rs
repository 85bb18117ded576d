/*!
 * Instruction Executor
 * Applies one instruction to the CPU context and process table
 */

use super::{missing_entry, Scheduler};
use crate::core::errors::{LoadError, SchedulerError};
use crate::core::types::Pid;
use crate::process::table::Spawn;
use crate::process::types::ProcessState;
use crate::program::{Instruction, OpCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// State transition caused by one executed instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    /// Only CPU registers changed
    None,
    /// The running process moved to the blocked queue
    Blocked,
    /// The running process terminated
    Terminated { turnaround: u64 },
    /// A child process was appended to the ready queue
    Forked { child: Pid },
    /// The running program was replaced
    Replaced { instructions: usize },
    /// Loading the replacement failed; the process continues on an empty program
    ReplaceFailed { error: LoadError },
}

impl Scheduler {
    /// Execute one instruction on behalf of the running process
    ///
    /// Illegal operations leave all state untouched and return an error.
    pub(crate) fn execute(&mut self, instruction: &Instruction) -> Result<Transition, SchedulerError> {
        match instruction {
            Instruction::Set(_) | Instruction::Add(_) | Instruction::Decrement(_) => {
                self.require_running(instruction.opcode())?;
                Ok(self.arithmetic(instruction))
            }
            Instruction::Block => self.block(),
            Instruction::End => self.end(),
            Instruction::Fork(offset) => self.fork(*offset),
            Instruction::Replace(source) => self.replace(source),
        }
    }

    fn arithmetic(&mut self, instruction: &Instruction) -> Transition {
        match instruction {
            Instruction::Set(v) => self.cpu.value = *v,
            Instruction::Add(v) => self.cpu.value = self.cpu.value.wrapping_add(*v),
            Instruction::Decrement(v) => self.cpu.value = self.cpu.value.wrapping_sub(*v),
            _ => {}
        }
        Transition::None
    }

    fn require_running(&self, op: OpCode) -> Result<Pid, SchedulerError> {
        self.running
            .ok_or(SchedulerError::NoRunningProcess { op })
    }

    fn block(&mut self) -> Result<Transition, SchedulerError> {
        let pid = self.require_running(OpCode::Block)?;
        let entry = self.table.get_mut(pid).ok_or_else(|| missing_entry(pid))?;

        entry.program_counter = self.cpu.program_counter;
        entry.value = self.cpu.value;
        entry.state = ProcessState::Blocked;
        self.blocked.push_back(pid);
        self.running = None;

        info!(pid = pid, "process blocked");
        Ok(Transition::Blocked)
    }

    fn end(&mut self) -> Result<Transition, SchedulerError> {
        let pid = self.require_running(OpCode::End)?;
        let finished = self.clock + 1;
        let entry = self.table.get_mut(pid).ok_or_else(|| missing_entry(pid))?;

        entry.program_counter = self.cpu.program_counter;
        entry.value = self.cpu.value;
        entry.state = ProcessState::Terminated;
        entry.time_finished = Some(finished);
        let turnaround = finished.saturating_sub(entry.start_time);

        self.stats.record(turnaround);
        self.running = None;

        info!(pid = pid, turnaround = turnaround, "process terminated");
        Ok(Transition::Terminated { turnaround })
    }

    fn fork(&mut self, offset: i64) -> Result<Transition, SchedulerError> {
        let pid = self.require_running(OpCode::Fork)?;
        if offset < 0 {
            return Err(SchedulerError::NegativeForkOffset { offset });
        }

        let parent = self.table.get(pid).ok_or_else(|| missing_entry(pid))?;
        let program_counter = self.cpu.program_counter;
        let program_len = parent.program.len();

        // The parent must still point inside its program after skipping
        let skip = usize::try_from(offset)
            .ok()
            .filter(|skip| {
                program_counter
                    .checked_add(*skip)
                    .is_some_and(|target| target < program_len)
            })
            .ok_or(SchedulerError::ForkOutOfRange {
                offset,
                program_counter,
                program_len,
            })?;

        let spawn = Spawn {
            parent: Some(pid),
            program: parent.program.clone(),
            program_counter,
            value: self.cpu.value,
            priority: parent.priority,
            start_time: self.clock,
        };
        let child = self.table.spawn(spawn);
        self.ready.push_back(child);
        self.cpu.program_counter += skip;

        info!(parent = pid, child = child, offset = offset, "process forked");
        Ok(Transition::Forked { child })
    }

    fn replace(&mut self, source: &str) -> Result<Transition, SchedulerError> {
        let pid = self.require_running(OpCode::Replace)?;
        let loader = Arc::clone(&self.loader);
        let entry = self.table.get_mut(pid).ok_or_else(|| missing_entry(pid))?;

        entry.program.clear();
        match loader.load(source) {
            Ok(program) => {
                let instructions = program.len();
                entry.program = program;
                self.cpu.program_counter = 0;
                info!(pid = pid, source = source, instructions = instructions, "program replaced");
                Ok(Transition::Replaced { instructions })
            }
            Err(error) => {
                warn!(pid = pid, source = source, error = %error, "error replacing program");
                self.cpu.program_counter += 1;
                Ok(Transition::ReplaceFailed { error })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::Priority;
    use crate::program::InMemoryLoader;
    use pretty_assertions::assert_eq;

    fn five_instruction_program() -> Vec<Instruction> {
        vec![
            Instruction::Fork(2),
            Instruction::Add(1),
            Instruction::Block,
            Instruction::Add(10),
            Instruction::End,
        ]
    }

    fn boot_with(loader: InMemoryLoader) -> Scheduler {
        Scheduler::boot(Arc::new(loader), "init", Priority::HIGHEST).unwrap()
    }

    #[test]
    fn test_arithmetic_updates_accumulator() {
        let mut scheduler = boot_with(InMemoryLoader::new().with_program("init", vec![]));

        scheduler.execute(&Instruction::Set(5)).unwrap();
        scheduler.execute(&Instruction::Add(3)).unwrap();
        scheduler.execute(&Instruction::Decrement(10)).unwrap();

        assert_eq!(scheduler.cpu().value, -2);
    }

    #[test]
    fn test_arithmetic_without_running_process() {
        let mut scheduler = boot_with(InMemoryLoader::new().with_program("init", vec![]));
        scheduler.execute(&Instruction::Set(4)).unwrap();
        scheduler.execute(&Instruction::Block).unwrap();

        assert_eq!(
            scheduler.execute(&Instruction::Add(3)),
            Err(SchedulerError::NoRunningProcess { op: OpCode::Add })
        );
        assert_eq!(
            scheduler.execute(&Instruction::Set(9)),
            Err(SchedulerError::NoRunningProcess { op: OpCode::Set })
        );
        assert_eq!(scheduler.cpu().value, 4);
        assert_eq!(scheduler.process(0).unwrap().value, 4);
    }

    #[test]
    fn test_block_without_running_process() {
        let mut scheduler = boot_with(InMemoryLoader::new().with_program("init", vec![]));
        scheduler.execute(&Instruction::Block).unwrap();

        assert_eq!(
            scheduler.execute(&Instruction::Block),
            Err(SchedulerError::NoRunningProcess { op: OpCode::Block })
        );
        assert_eq!(scheduler.blocked().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_end_without_running_process() {
        let mut scheduler = boot_with(InMemoryLoader::new().with_program("init", vec![]));
        scheduler.execute(&Instruction::End).unwrap();

        assert_eq!(
            scheduler.execute(&Instruction::End),
            Err(SchedulerError::NoRunningProcess { op: OpCode::End })
        );
        assert_eq!(scheduler.stats().terminated, 1);
    }

    #[test]
    fn test_fork_inherits_counter_and_skips_parent() {
        let loader = InMemoryLoader::new().with_program("init", five_instruction_program());
        let mut scheduler = boot_with(loader);
        scheduler.execute(&Instruction::Set(7)).unwrap();
        scheduler.cpu.program_counter = 1;

        let transition = scheduler.execute(&Instruction::Fork(2)).unwrap();
        assert_eq!(transition, Transition::Forked { child: 1 });

        let child = scheduler.process(1).unwrap();
        assert_eq!(child.parent, Some(0));
        assert_eq!(child.program_counter, 1);
        assert_eq!(child.value, 7);
        assert_eq!(child.state, ProcessState::Ready);
        assert_eq!(child.program, five_instruction_program());
        assert_eq!(scheduler.cpu().program_counter, 3);
        assert_eq!(scheduler.ready().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_fork_out_of_range_rejected() {
        let loader = InMemoryLoader::new().with_program("init", five_instruction_program());
        let mut scheduler = boot_with(loader);
        scheduler.cpu.program_counter = 1;

        assert_eq!(
            scheduler.execute(&Instruction::Fork(4)),
            Err(SchedulerError::ForkOutOfRange {
                offset: 4,
                program_counter: 1,
                program_len: 5
            })
        );
        assert!(matches!(
            scheduler.execute(&Instruction::Fork(-1)),
            Err(SchedulerError::NegativeForkOffset { offset: -1 })
        ));
        assert_eq!(scheduler.table().len(), 1);
        assert_eq!(scheduler.cpu().program_counter, 1);
    }

    #[test]
    fn test_replace_installs_new_program() {
        let loader = InMemoryLoader::new()
            .with_program("init", vec![Instruction::Replace("next".into())])
            .with_program("next", vec![Instruction::Set(1), Instruction::End]);
        let mut scheduler = boot_with(loader);
        scheduler.cpu.program_counter = 1;
        scheduler.cpu.value = 9;

        let transition = scheduler.execute(&Instruction::Replace("next".into())).unwrap();

        assert_eq!(transition, Transition::Replaced { instructions: 2 });
        assert_eq!(scheduler.cpu().program_counter, 0);
        assert_eq!(scheduler.cpu().value, 9);
        assert_eq!(scheduler.process(0).unwrap().program.len(), 2);
    }

    #[test]
    fn test_replace_failure_leaves_empty_program() {
        let loader = InMemoryLoader::new().with_program("init", vec![Instruction::Replace("gone".into())]);
        let mut scheduler = boot_with(loader);
        scheduler.cpu.program_counter = 1;

        let transition = scheduler.execute(&Instruction::Replace("gone".into())).unwrap();

        assert!(matches!(transition, Transition::ReplaceFailed { .. }));
        assert_eq!(scheduler.cpu().program_counter, 2);
        assert!(scheduler.process(0).unwrap().program.is_empty());
        assert_eq!(scheduler.running(), Some(0));
    }
}
