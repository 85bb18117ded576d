/*!
 * Program Traits
 * Loader abstraction used by boot and Replace
 */

use super::instruction::Program;
use crate::core::errors::LoadError;

/// Produces programs from source names
///
/// A load either returns the whole program or fails; partial programs are
/// never returned.
pub trait ProgramLoader: Send + Sync {
    /// Load the program named `source`
    fn load(&self, source: &str) -> Result<Program, LoadError>;
}
