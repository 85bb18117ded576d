/*!
 * Scheduler Tests
 * End-to-end scheduling scenarios driven through quantum and unblock
 */

use pretty_assertions::assert_eq;
use process_sim::{
    InMemoryLoader, Instruction, Priority, ProcessState, QuantumOutcome, Scheduler,
    SchedulerError, Transition,
};
use std::sync::Arc;

fn boot(init: Vec<Instruction>) -> Scheduler {
    let loader = InMemoryLoader::new().with_program("init", init);
    Scheduler::boot(Arc::new(loader), "init", Priority::HIGHEST).unwrap()
}

fn run_quanta(scheduler: &mut Scheduler, count: usize) {
    for _ in 0..count {
        scheduler.quantum();
        scheduler.verify().unwrap();
    }
}

#[test]
fn test_set_add_block() {
    let mut scheduler = boot(vec![
        Instruction::Set(5),
        Instruction::Add(3),
        Instruction::Block,
    ]);

    run_quanta(&mut scheduler, 2);
    assert_eq!(scheduler.cpu().value, 8);

    run_quanta(&mut scheduler, 1);
    assert_eq!(scheduler.running(), None);
    assert_eq!(scheduler.blocked().collect::<Vec<_>>(), vec![0]);
    assert_eq!(scheduler.process(0).unwrap().value, 8);
    assert_eq!(scheduler.process(0).unwrap().state, ProcessState::Blocked);
}

#[test]
fn test_fork_from_counter_one() {
    let mut scheduler = boot(vec![
        Instruction::Fork(2),
        Instruction::Set(1),
        Instruction::Block,
        Instruction::Set(2),
        Instruction::End,
    ]);

    let outcome = scheduler.quantum();
    assert!(matches!(
        outcome,
        QuantumOutcome::Executed {
            transition: Ok(Transition::Forked { child: 1 }),
            ..
        }
    ));

    let child = scheduler.process(1).unwrap();
    assert_eq!(child.program_counter, 1);
    assert_eq!(child.parent, Some(0));
    assert_eq!(child.start_time, 0);
    assert_eq!(scheduler.process(0).unwrap().program_counter, 3);
    assert_eq!(scheduler.ready().collect::<Vec<_>>(), vec![1]);
    scheduler.verify().unwrap();
}

#[test]
fn test_fork_past_end_rejected() {
    let mut scheduler = boot(vec![
        Instruction::Fork(4),
        Instruction::Set(1),
        Instruction::Block,
        Instruction::Set(2),
        Instruction::End,
    ]);

    let outcome = scheduler.quantum();
    assert!(matches!(
        outcome,
        QuantumOutcome::Executed {
            transition: Err(SchedulerError::ForkOutOfRange {
                offset: 4,
                program_counter: 1,
                program_len: 5
            }),
            ..
        }
    ));
    assert_eq!(scheduler.table().len(), 1);
    assert_eq!(scheduler.process(0).unwrap().program_counter, 1);
}

#[test]
fn test_children_run_after_parent_blocks() {
    let mut scheduler = boot(vec![
        Instruction::Set(10),
        Instruction::Fork(1),
        Instruction::Block,
        Instruction::Add(1),
        Instruction::Block,
    ]);

    // Parent: S 10, F 1 (skips the child's B), A 1, B
    run_quanta(&mut scheduler, 4);
    assert_eq!(scheduler.process(0).unwrap().value, 11);
    assert_eq!(scheduler.process(0).unwrap().state, ProcessState::Blocked);

    // The child was dispatched by the blocking quantum
    assert_eq!(scheduler.running(), Some(1));
    assert_eq!(scheduler.cpu().value, 10);
    assert_eq!(scheduler.cpu().program_counter, 2);
    assert_eq!(scheduler.cpu().time_slice, 1);
}

#[test]
fn test_idle_cpu_does_not_self_dispatch() {
    let mut scheduler = boot(vec![Instruction::Block]);
    run_quanta(&mut scheduler, 1);

    assert_eq!(scheduler.quantum(), QuantumOutcome::Idle);
    assert_eq!(scheduler.quantum(), QuantumOutcome::Idle);
    assert_eq!(scheduler.timestamp(), 3);

    assert_eq!(scheduler.unblock(), Ok(0));
    assert_eq!(scheduler.running(), Some(0));
}

#[test]
fn test_blocked_queue_is_fifo() {
    let mut scheduler = boot(vec![Instruction::Fork(1), Instruction::Block, Instruction::Block]);

    // Parent forks and blocks, then the child blocks
    run_quanta(&mut scheduler, 3);
    assert_eq!(scheduler.blocked().collect::<Vec<_>>(), vec![0, 1]);

    assert_eq!(scheduler.unblock(), Ok(0));
    assert_eq!(scheduler.running(), Some(0));
    assert_eq!(scheduler.unblock(), Ok(1));
    assert_eq!(scheduler.ready().collect::<Vec<_>>(), vec![1]);
    scheduler.verify().unwrap();
}

#[test]
fn test_average_turnaround() {
    let mut scheduler = boot(vec![
        Instruction::Set(5),
        Instruction::Fork(1),
        Instruction::Block,
        Instruction::Add(1),
        Instruction::End,
    ]);

    // S 5, F 1 (child starts at t=1), A 1, E (init finishes at t=4)
    run_quanta(&mut scheduler, 4);
    assert_eq!(scheduler.process(0).unwrap().turnaround(), Some(4));
    assert_eq!(scheduler.running(), Some(1));

    // Child blocks, is unblocked, then runs A 1 and E (finishes at t=7)
    run_quanta(&mut scheduler, 1);
    assert_eq!(scheduler.unblock(), Ok(1));
    run_quanta(&mut scheduler, 2);

    let child = scheduler.process(1).unwrap();
    assert_eq!(child.value, 6);
    assert_eq!(child.turnaround(), Some(6));

    let report = scheduler.terminate();
    assert_eq!(report.terminated, 2);
    assert_eq!(report.average_turnaround, Some(5.0));
    assert_eq!(scheduler.stats().average(), Some(5.0));
}

#[test]
fn test_terminate_without_terminated_processes() {
    let scheduler = boot(vec![Instruction::Set(1)]);
    let report = scheduler.terminate();
    assert_eq!(report.average_turnaround, None);
    assert_eq!(report.to_string(), "No processes terminated");
}

#[test]
fn test_terminated_entries_are_never_reused() {
    let mut scheduler = boot(vec![Instruction::Fork(0), Instruction::End]);

    // Parent forks with offset 0, both processes run E
    run_quanta(&mut scheduler, 3);
    assert_eq!(scheduler.table().len(), 2);
    for entry in scheduler.table().iter() {
        assert_eq!(entry.state, ProcessState::Terminated);
        assert!(entry.time_finished.is_some());
    }

    // Further quanta idle, nothing is recreated
    assert_eq!(scheduler.quantum(), QuantumOutcome::Idle);
    assert_eq!(scheduler.table().len(), 2);
}

#[test]
fn test_priority_is_inherited_by_children() {
    let loader = InMemoryLoader::new().with_program(
        "init",
        vec![Instruction::Fork(0), Instruction::Block, Instruction::Block],
    );
    let priority = Priority::try_from(3).unwrap();
    let mut scheduler = Scheduler::boot(Arc::new(loader), "init", priority).unwrap();
    assert_eq!(scheduler.cpu().time_slice, 8);

    run_quanta(&mut scheduler, 2);
    assert_eq!(scheduler.running(), Some(1));
    assert_eq!(scheduler.process(1).unwrap().priority, priority);
    assert_eq!(scheduler.cpu().time_slice, 8);
}
