/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
///
/// Equal to the PCB table slot of the process. Never reused.
pub type Pid = usize;

/// Global clock value, advanced once per quantum command
pub type Timestamp = u64;

/// CPU accumulator type
pub type Value = i64;
