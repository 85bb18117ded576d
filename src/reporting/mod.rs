/*!
 * Reporting Module
 * Read-only snapshots of the process table and CPU for the print command
 */

pub mod snapshot;

// Re-export for convenience
pub use snapshot::{CpuSnapshot, ProcessInfo, ReportFormat, SystemSnapshot};
