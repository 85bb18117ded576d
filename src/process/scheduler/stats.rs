/*!
 * Scheduler Statistics
 * Turnaround tracking for terminated processes
 */

use crate::process::table::PcbTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Running turnaround totals, accumulated as processes end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnaroundStats {
    pub cumulative_turnaround: u64,
    pub terminated: usize,
}

impl TurnaroundStats {
    pub fn record(&mut self, turnaround: u64) {
        self.cumulative_turnaround += turnaround;
        self.terminated += 1;
    }

    #[must_use]
    pub fn average(&self) -> Option<f64> {
        if self.terminated == 0 {
            None
        } else {
            Some(self.cumulative_turnaround as f64 / self.terminated as f64)
        }
    }
}

/// Statistics reported by the terminate command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminationReport {
    pub terminated: usize,
    /// `None` when no process terminated
    pub average_turnaround: Option<f64>,
}

impl TerminationReport {
    /// Average `time_finished - start_time` over terminated entries
    pub fn from_table(table: &PcbTable) -> Self {
        let (total, count) = table
            .iter()
            .filter_map(|entry| entry.turnaround())
            .fold((0u64, 0usize), |(total, count), t| (total + t, count + 1));

        Self {
            terminated: count,
            average_turnaround: (count > 0).then(|| total as f64 / count as f64),
        }
    }
}

impl fmt::Display for TerminationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.average_turnaround {
            Some(average) => write!(
                f,
                "Average turnaround time: {:.2} ({} processes terminated)",
                average, self.terminated
            ),
            None => write!(f, "No processes terminated"),
        }
    }
}
