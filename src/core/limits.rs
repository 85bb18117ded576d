/*!
 * System Limits and Constants
 *
 * Centralized location for simulator-wide limits, defaults, and magic numbers.
 * Organized by domain.
 */

use super::types::Pid;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Highest valid process priority
pub const MAX_PRIORITY: u8 = 3;

/// Time slice granted on dispatch, indexed by priority
/// Doubles per level: priority 0 gets the shortest slice
pub const TIME_SLICES: [u32; MAX_PRIORITY as usize + 1] = [1, 2, 4, 8];

// =============================================================================
// BOOTSTRAP
// =============================================================================

/// Process ID of the bootstrap process
pub const INIT_PID: Pid = 0;

/// Program loaded for the bootstrap process when none is configured
pub const DEFAULT_INIT_PROGRAM: &str = "init";

/// Priority of the bootstrap process when none is configured
pub const DEFAULT_INIT_PRIORITY: u8 = 0;

/// Directory programs are resolved against when none is configured
pub const DEFAULT_PROGRAM_DIR: &str = ".";

// =============================================================================
// TRANSPORT
// =============================================================================

/// Command bytes buffered between commander and manager
/// The commander blocks once this many commands are in flight
pub const COMMAND_PIPE_CAPACITY: usize = 64;
