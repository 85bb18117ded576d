/*!
 * Command Module
 * Single-character command alphabet and the process manager that applies it
 */

pub mod manager;

pub use manager::{run_manager, ProcessManager, Response};

use crate::core::errors::CommandError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Command accepted by the process manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// `Q` - execute one quantum
    Quantum,
    /// `U` - unblock the oldest blocked process
    Unblock,
    /// `P` - print the process table and CPU state
    Print,
    /// `T` - terminate the simulation
    Terminate,
}

impl Command {
    #[inline]
    #[must_use]
    pub const fn byte(self) -> u8 {
        match self {
            Command::Quantum => b'Q',
            Command::Unblock => b'U',
            Command::Print => b'P',
            Command::Terminate => b'T',
        }
    }
}

impl TryFrom<u8> for Command {
    type Error = CommandError;

    /// Case-sensitive
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'Q' => Ok(Command::Quantum),
            b'U' => Ok(Command::Unblock),
            b'P' => Ok(Command::Print),
            b'T' => Ok(Command::Terminate),
            other => Err(CommandError::Unknown(other)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.byte()))
    }
}
