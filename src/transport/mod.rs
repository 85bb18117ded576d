/*!
 * Transport Module
 * Byte pipe between the commander and the process manager
 */

pub mod commander;
pub mod pipe;

pub use commander::run_commander;
pub use pipe::{pipe, CommandReceiver, CommandSender};
