//! Process Inspector
//!
//! Walks the local process tree below a pane's foreground process. Process
//! command lines are the authoritative signal for remote sessions: they are
//! truthful where prompt text can be customised or empty.
//!
//! Every failure (pane process gone, `/proc` unreadable, permissions)
//! degrades to an empty result.

use crate::error::DetectionGap;
use crate::platform::{Platform, ProcessInfo, ProcessTreeOps};
use std::collections::HashSet;

/// Reads process trees through the platform layer
pub struct ProcessInspector {
    ops: Box<dyn ProcessTreeOps>,
}

impl ProcessInspector {
    /// Inspector for the running platform
    pub fn new() -> Self {
        Self::with_ops(Platform::process_tree())
    }

    /// Inspector over a custom process table (used by tests and embedders)
    pub fn with_ops(ops: Box<dyn ProcessTreeOps>) -> Self {
        Self { ops }
    }

    /// All descendants of `root_pid` (children, grandchildren, ...), oldest
    /// first. The root itself is not included.
    pub fn descendants(&self, root_pid: u32) -> Vec<ProcessInfo> {
        // pid 0 parents the whole machine (init, kthreadd)
        if root_pid == 0 || !self.ops.is_process_running(root_pid) {
            debug!(target: "Remote", "pid {}: {}", root_pid, DetectionGap::PaneGone);
            return Vec::new();
        }

        let mut descendants = Vec::new();
        let mut to_check = vec![root_pid];
        let mut checked = HashSet::new();

        while let Some(pid) = to_check.pop() {
            if !checked.insert(pid) {
                continue;
            }

            let children = match self.ops.get_child_pids(pid) {
                Ok(children) => children,
                Err(e) if pid == root_pid => {
                    debug!(
                        target: "Remote",
                        "pid {}: {} ({})",
                        root_pid,
                        DetectionGap::ProcessTableUnavailable,
                        e
                    );
                    return Vec::new();
                }
                Err(e) => {
                    trace!(target: "Remote", "cannot list children of {}: {}", pid, e);
                    continue;
                }
            };

            for child in children {
                if checked.contains(&child) {
                    continue;
                }
                match self.ops.process_info(child) {
                    Ok(info) => {
                        descendants.push(info);
                        to_check.push(child);
                    }
                    // Exited between listing and reading
                    Err(e) => trace!(target: "Remote", "skipping pid {}: {}", child, e),
                }
            }
        }

        descendants.sort_by_key(|p| (p.start_time, p.pid));
        descendants
    }

    /// Command lines of all descendants of `root_pid`, oldest first
    pub fn child_command_lines(&self, root_pid: u32) -> Vec<String> {
        self.descendants(root_pid)
            .iter()
            .map(ProcessInfo::command_line)
            .collect()
    }
}

impl Default for ProcessInspector {
    fn default() -> Self {
        Self::new()
    }
}
