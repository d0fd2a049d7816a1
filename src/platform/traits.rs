//! Platform-specific operation traits
//!
//! These traits define the interface for platform-specific operations,
//! allowing for clean abstraction and easier testing.

use crate::error::Result;
use std::path::PathBuf;

/// Snapshot of one local process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    /// Process id
    pub pid: u32,
    /// Parent process id
    pub ppid: u32,
    /// Short command name as reported by the kernel (may be truncated)
    pub name: String,
    /// Path of the executable image, when readable
    pub executable: Option<PathBuf>,
    /// Argument vector
    pub argv: Vec<String>,
    /// Start time in platform units; only meaningful for ordering
    pub start_time: u64,
}

impl ProcessInfo {
    /// The argument vector joined with spaces
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

/// Platform-specific process tree operations
pub trait ProcessTreeOps: Send + Sync {
    /// Get all child process IDs of a given parent PID
    fn get_child_pids(&self, parent_pid: u32) -> Result<Vec<u32>>;

    /// Read name, argv and start time of a process
    fn process_info(&self, pid: u32) -> Result<ProcessInfo>;

    /// Check if a process is still running
    fn is_process_running(&self, pid: u32) -> bool;
}
