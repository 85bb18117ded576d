/*!
 * Program Loader
 * Parses the line-per-instruction program format from files or memory
 */

use super::instruction::{Instruction, OpCode, Program};
use super::traits::ProgramLoader;
use crate::core::errors::LoadError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse program text
///
/// One instruction per line. Lines are trimmed and blank lines skipped. The
/// first character is the operation code (case-insensitive) and the trimmed
/// remainder is its argument. Any failure aborts the whole parse.
pub fn parse_program(source_name: &str, text: &str) -> Result<Program, LoadError> {
    let mut program = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        let mut chars = line.chars();
        let Some(letter) = chars.next() else {
            continue;
        };
        let argument = chars.as_str().trim();

        let op = OpCode::from_letter(letter).ok_or_else(|| LoadError::InvalidOperation {
            source_name: source_name.to_string(),
            line: line_number,
            op: letter.to_ascii_uppercase(),
        })?;

        let instruction = if op.takes_integer() {
            let value: i64 = argument.parse().map_err(|_| LoadError::InvalidInteger {
                source_name: source_name.to_string(),
                line: line_number,
                op,
                argument: argument.to_string(),
            })?;
            match op {
                OpCode::Set => Instruction::Set(value),
                OpCode::Add => Instruction::Add(value),
                OpCode::Decrement => Instruction::Decrement(value),
                _ => Instruction::Fork(value),
            }
        } else {
            match op {
                OpCode::Block => Instruction::Block,
                OpCode::End => Instruction::End,
                _ => {
                    if argument.is_empty() {
                        return Err(LoadError::MissingArgument {
                            source_name: source_name.to_string(),
                            line: line_number,
                            op,
                        });
                    }
                    Instruction::Replace(argument.to_string())
                }
            }
        };

        program.push(instruction);
    }

    Ok(program)
}

/// Loads programs from files under a base directory
#[derive(Debug, Clone)]
pub struct FileLoader {
    base_dir: PathBuf,
}

impl FileLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve a program name; absolute names are used as-is
    pub fn resolve(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl ProgramLoader for FileLoader {
    fn load(&self, source: &str) -> Result<Program, LoadError> {
        let path = self.resolve(source);
        let text = std::fs::read_to_string(&path).map_err(|e| LoadError::Io {
            source_name: source.to_string(),
            reason: e.to_string(),
        })?;

        let program = parse_program(source, &text)?;
        debug!(
            source = source,
            path = %path.display(),
            instructions = program.len(),
            "program loaded"
        );
        Ok(program)
    }
}

/// Serves programs registered up front, keyed by name
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    programs: HashMap<String, Program>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-built program
    pub fn with_program(mut self, name: impl Into<String>, program: Program) -> Self {
        self.programs.insert(name.into(), program);
        self
    }

    /// Register a program from source text
    pub fn with_source(mut self, name: &str, text: &str) -> Result<Self, LoadError> {
        let program = parse_program(name, text)?;
        self.programs.insert(name.to_string(), program);
        Ok(self)
    }
}

impl ProgramLoader for InMemoryLoader {
    fn load(&self, source: &str) -> Result<Program, LoadError> {
        self.programs
            .get(source)
            .cloned()
            .ok_or_else(|| LoadError::Io {
                source_name: source.to_string(),
                reason: "no such program".to_string(),
            })
    }
}
