//! Session Classifier
//!
//! Combines process-tree evidence with scraped pane text. Process command
//! lines decide *whether* and *where* a pane is remote; text only feeds the
//! working directory. Nothing is cached between calls.

use super::{ContainerClassifier, ContainerTool, Session, SshClassifier};
use crate::error::DetectionGap;
use crate::host::PaneId;
use crate::platform::ProcessInfo;
use crate::scraper::{cwd, TextSnapshot};
use std::collections::{HashMap, HashSet};
use std::path::Path;

const TRACE: &str = "Remote";

/// One kind of remote session that can be recognised from a process
pub trait Classifier: Send + Sync {
    /// Short name used in traces
    fn name(&self) -> &'static str;

    /// Whether the process is this classifier's tool at all
    fn claims(&self, process: &ProcessInfo) -> bool;

    /// Build a session from the process, or `None` when the invocation is
    /// not an interactive remote session or its target is unknown
    fn try_classify(&self, process: &ProcessInfo, pane: PaneId) -> Option<Session>;
}

/// Check whether `process` runs the executable `exe`, by kernel name,
/// executable path or `argv[0]`
pub(crate) fn matches_by_name(exe: &str, process: &ProcessInfo) -> bool {
    if process.name == exe {
        return true;
    }
    let basename = |path: &Path| path.file_name().is_some_and(|name| name == exe);
    if process.executable.as_deref().is_some_and(basename) {
        return true;
    }
    process
        .argv
        .first()
        .is_some_and(|arg0| arg0 == exe || basename(Path::new(arg0)))
}

/// Everything known about a pane at detection time
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    /// Descendants of the pane's foreground process
    pub processes: Vec<ProcessInfo>,
    /// Visible text and title, if it was read
    pub text: Option<TextSnapshot>,
}

/// Ordered chain of classifiers; earlier entries win for the same process
pub struct SessionClassifier {
    chain: Vec<Box<dyn Classifier>>,
}

impl SessionClassifier {
    /// An empty chain that classifies nothing
    pub fn new() -> Self {
        Self { chain: Vec::new() }
    }

    /// ssh, docker and podman, in that order
    pub fn with_defaults() -> Self {
        Self::new()
            .register(Box::new(SshClassifier::new()))
            .register(Box::new(ContainerClassifier::new(ContainerTool::Docker)))
            .register(Box::new(ContainerClassifier::new(ContainerTool::Podman)))
    }

    /// Append a classifier to the end of the chain
    pub fn register(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.chain.push(classifier);
        self
    }

    /// Names of the registered classifiers, in order
    pub fn names(&self) -> Vec<&'static str> {
        self.chain.iter().map(|c| c.name()).collect()
    }

    /// Classify a pane from its evidence.
    ///
    /// The working directory is only inferred when `infer_cwd` is set, and
    /// its absence never affects the classification itself.
    pub fn classify(&self, evidence: &Evidence, pane: PaneId, infer_cwd: bool) -> Option<Session> {
        let session = self.classify_processes(&evidence.processes, pane)?;
        if !infer_cwd {
            return Some(session);
        }

        let working_directory = evidence.text.as_ref().and_then(cwd::infer_from_snapshot);
        if working_directory.is_none() {
            debug!(target: TRACE, "pane {}: {}", pane, DetectionGap::UnknownCwd);
        }
        Some(session.with_working_directory(working_directory))
    }

    /// Pick the session from a set of processes.
    ///
    /// Processes started by another remote process (ProxyJump helpers and
    /// the like) are ignored; among the rest the most recently started wins.
    pub fn classify_processes(&self, processes: &[ProcessInfo], pane: PaneId) -> Option<Session> {
        if processes.is_empty() {
            debug!(target: TRACE, "pane {}: {}", pane, DetectionGap::NoChildProcesses);
            return None;
        }

        let mut claimed = false;
        let matches: Vec<(&ProcessInfo, Session)> = processes
            .iter()
            .filter_map(|process| {
                self.chain
                    .iter()
                    .filter(|classifier| classifier.claims(process))
                    .find_map(|classifier| {
                        claimed = true;
                        classifier.try_classify(process, pane)
                    })
                    .map(|session| (process, session))
            })
            .collect();

        if matches.is_empty() {
            let gap = if claimed {
                DetectionGap::NoIdentity
            } else {
                DetectionGap::NoRemoteProcess
            };
            debug!(target: TRACE, "pane {}: {}", pane, gap);
            return None;
        }

        let by_pid: HashMap<u32, &ProcessInfo> = processes.iter().map(|p| (p.pid, p)).collect();
        let remote_pids: HashSet<u32> = matches.iter().map(|(p, _)| p.pid).collect();

        matches
            .into_iter()
            .filter(|(process, _)| !has_remote_ancestor(process, &by_pid, &remote_pids))
            .max_by(|(a, _), (b, _)| a.start_time.cmp(&b.start_time).then(a.pid.cmp(&b.pid)))
            .map(|(process, session)| {
                debug!(
                    target: TRACE,
                    "pane {}: pid {} ({}) -> {}",
                    pane,
                    process.pid,
                    process.command_line(),
                    session
                );
                session
            })
    }
}

impl Default for SessionClassifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Whether any ancestor of `process` (within the inspected subtree) was
/// itself classified as a remote session
fn has_remote_ancestor(
    process: &ProcessInfo,
    by_pid: &HashMap<u32, &ProcessInfo>,
    remote_pids: &HashSet<u32>,
) -> bool {
    let mut seen = HashSet::new();
    let mut current = process.ppid;
    while seen.insert(current) {
        if remote_pids.contains(&current) {
            return true;
        }
        match by_pid.get(&current) {
            Some(parent) => current = parent.ppid,
            None => return false,
        }
    }
    false
}
