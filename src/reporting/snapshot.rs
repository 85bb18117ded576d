/*!
 * System Snapshot
 * Serializable copy of scheduler state with text and JSON renderings
 */

use crate::core::types::{Pid, Timestamp, Value};
use crate::process::cpu::Cpu;
use crate::process::types::{PcbEntry, Priority, ProcessState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BANNER: &str = "****************************************************************";
const DIVIDER: &str = "--------------------------------------";

/// Snapshot rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format: {}", other)),
        }
    }
}

/// One process table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    /// `None` for the bootstrap process
    pub parent: Option<Pid>,
    pub program_counter: usize,
    pub value: Value,
    pub priority: Priority,
    pub state: ProcessState,
    pub start_time: Timestamp,
    pub time_used: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time_finished: Option<Timestamp>,
}

impl From<&PcbEntry> for ProcessInfo {
    fn from(entry: &PcbEntry) -> Self {
        Self {
            pid: entry.pid,
            parent: entry.parent,
            program_counter: entry.program_counter,
            value: entry.value,
            priority: entry.priority,
            state: entry.state,
            start_time: entry.start_time,
            time_used: entry.time_used,
            time_finished: entry.time_finished,
        }
    }
}

/// CPU register dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CpuSnapshot {
    pub program_counter: usize,
    pub value: Value,
    pub time_slice: u32,
    pub time_slice_used: u64,
}

impl From<&Cpu> for CpuSnapshot {
    fn from(cpu: &Cpu) -> Self {
        Self {
            program_counter: cpu.program_counter,
            value: cpu.value,
            time_slice: cpu.time_slice,
            time_slice_used: cpu.time_slice_used,
        }
    }
}

/// Scheduler state at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SystemSnapshot {
    pub timestamp: Timestamp,
    pub running: Option<Pid>,
    pub ready: Vec<Pid>,
    pub blocked: Vec<Pid>,
    pub cpu: CpuSnapshot,
    pub processes: Vec<ProcessInfo>,
}

impl SystemSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render in the requested format
    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => self.to_json(),
        }
    }
}

impl fmt::Display for SystemSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", BANNER)?;
        writeln!(f, "The current system state is as follows:")?;
        writeln!(f, "{}", BANNER)?;
        writeln!(f, "Current Time: {}", self.timestamp)?;

        for process in &self.processes {
            writeln!(f, "Process ID: {}", process.pid)?;
            match process.parent {
                Some(parent) => writeln!(f, "Parent Process ID: {}", parent)?,
                None => writeln!(f, "Parent Process ID: -1")?,
            }
            writeln!(f, "Program Counter: {}", process.program_counter)?;
            writeln!(f, "Value: {}", process.value)?;
            writeln!(f, "Priority: {}", process.priority)?;
            writeln!(f, "State: {}", process.state)?;
            writeln!(f, "Start Time: {}", process.start_time)?;
            writeln!(f, "Time Used: {}", process.time_used)?;
            if let Some(finished) = process.time_finished {
                writeln!(f, "Time Finished: {}", finished)?;
            }
            writeln!(f, "{}", DIVIDER)?;
        }

        writeln!(f, "CPU State:")?;
        writeln!(f, "-Program Counter: {}", self.cpu.program_counter)?;
        writeln!(f, "-Value: {}", self.cpu.value)?;
        writeln!(f, "-Time Slice: {}", self.cpu.time_slice)?;
        write!(f, "-Time Slice Used: {}", self.cpu.time_slice_used)
    }
}
