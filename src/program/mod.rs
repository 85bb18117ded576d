/*!
 * Program Module
 * Instruction model and program loading
 */

pub mod instruction;
pub mod loader;
pub mod traits;

// Re-export for convenience
pub use instruction::{render_program, Instruction, OpCode, Program};
pub use loader::{parse_program, FileLoader, InMemoryLoader};
pub use traits::ProgramLoader;
