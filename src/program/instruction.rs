/*!
 * Instruction Model
 * Immutable descriptors for one program step
 */

use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation code of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpCode {
    Set,
    Add,
    Decrement,
    Block,
    End,
    Fork,
    Replace,
}

impl OpCode {
    /// Letter used for this operation in program files
    #[inline]
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            OpCode::Set => 'S',
            OpCode::Add => 'A',
            OpCode::Decrement => 'D',
            OpCode::Block => 'B',
            OpCode::End => 'E',
            OpCode::Fork => 'F',
            OpCode::Replace => 'R',
        }
    }

    /// Parse an operation letter (case-insensitive)
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'S' => Some(OpCode::Set),
            'A' => Some(OpCode::Add),
            'D' => Some(OpCode::Decrement),
            'B' => Some(OpCode::Block),
            'E' => Some(OpCode::End),
            'F' => Some(OpCode::Fork),
            'R' => Some(OpCode::Replace),
            _ => None,
        }
    }

    /// Whether the operation requires an integer argument
    #[inline]
    #[must_use]
    pub const fn takes_integer(self) -> bool {
        matches!(
            self,
            OpCode::Set | OpCode::Add | OpCode::Decrement | OpCode::Fork
        )
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One program step, with its argument carried in the variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "arg", rename_all = "snake_case")]
pub enum Instruction {
    /// `cpu.value = v`
    Set(Value),
    /// `cpu.value += v`
    Add(Value),
    /// `cpu.value -= v`
    Decrement(Value),
    /// Move the running process to the blocked queue
    Block,
    /// Terminate the running process
    End,
    /// Create a child process; the parent skips `offset` instructions
    Fork(i64),
    /// Replace the running program with the named one
    Replace(String),
}

impl Instruction {
    #[inline]
    #[must_use]
    pub fn opcode(&self) -> OpCode {
        match self {
            Instruction::Set(_) => OpCode::Set,
            Instruction::Add(_) => OpCode::Add,
            Instruction::Decrement(_) => OpCode::Decrement,
            Instruction::Block => OpCode::Block,
            Instruction::End => OpCode::End,
            Instruction::Fork(_) => OpCode::Fork,
            Instruction::Replace(_) => OpCode::Replace,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Set(v) | Instruction::Add(v) | Instruction::Decrement(v) => {
                write!(f, "{} {}", self.opcode(), v)
            }
            Instruction::Fork(offset) => write!(f, "{} {}", self.opcode(), offset),
            Instruction::Replace(name) => write!(f, "{} {}", self.opcode(), name),
            Instruction::Block | Instruction::End => write!(f, "{}", self.opcode()),
        }
    }
}

/// Ordered, finite instruction sequence owned by one process
pub type Program = Vec<Instruction>;

/// Render a program back into the line-per-instruction file format
#[must_use]
pub fn render_program(program: &[Instruction]) -> String {
    program.iter().map(|i| format!("{}\n", i)).collect()
}
