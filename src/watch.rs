//! Profile Watcher
//!
//! Polled by the host (about once a second). Panes that become remote get
//! their resolved profile; when the remote session ends the profile they had
//! before is put back. State lives in memory for the lifetime of the plugin.

use crate::context::RemoteContext;
use crate::host::{Host, PaneId};
use crate::profile::ProfileResolver;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const TRACE: &str = "Remote";

/// Panes younger than this are never restored: a freshly cloned pane has
/// not started its ssh/container client yet
pub const NEWLY_SPAWNED_GRACE: Duration = Duration::from_secs(3);

/// A profile change made by [`ProfileWatcher::poll`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileChange {
    /// `profile` was applied to a pane that became remote
    Applied { pane: PaneId, profile: String },
    /// The remote session ended; `profile` is what was put back
    Restored {
        pane: PaneId,
        profile: Option<String>,
    },
}

/// Tracks which panes carry a profile applied by us
#[derive(Debug)]
pub struct ProfileWatcher {
    /// Remote panes and the profile they had before ours
    remote: HashMap<PaneId, Option<String>>,
    first_seen: HashMap<PaneId, Instant>,
    grace: Duration,
}

impl ProfileWatcher {
    pub fn new() -> Self {
        Self::with_grace(NEWLY_SPAWNED_GRACE)
    }

    pub fn with_grace(grace: Duration) -> Self {
        Self {
            remote: HashMap::new(),
            first_seen: HashMap::new(),
            grace,
        }
    }

    /// Record that `pane` was just given a profile (e.g. by a clone)
    pub fn track(&mut self, pane: PaneId, previous_profile: Option<String>) {
        self.track_at(pane, previous_profile, Instant::now());
    }

    pub fn track_at(&mut self, pane: PaneId, previous_profile: Option<String>, now: Instant) {
        self.first_seen.insert(pane, now);
        self.remote.insert(pane, previous_profile);
    }

    /// Whether `pane` currently carries a profile applied by us
    pub fn is_tracked(&self, pane: PaneId) -> bool {
        self.remote.contains_key(&pane)
    }

    /// Re-check every pane of the host
    pub fn poll<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        context: &RemoteContext,
    ) -> Vec<ProfileChange> {
        self.poll_at(host, context, Instant::now())
    }

    pub fn poll_at<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        context: &RemoteContext,
        now: Instant,
    ) -> Vec<ProfileChange> {
        let panes = host.panes();
        self.remote.retain(|pane, _| panes.contains(pane));
        self.first_seen.retain(|pane, _| panes.contains(pane));

        let mut changes = Vec::new();
        for pane in panes {
            let first_seen = *self.first_seen.entry(pane).or_insert(now);

            match context.detect_without_cwd(&*host, pane) {
                Some(session) => {
                    if self.remote.contains_key(&pane) {
                        continue;
                    }
                    let Some(profile) = ProfileResolver::resolve(&session, context.config()) else {
                        continue;
                    };
                    let current = host.current_profile(pane);
                    if current.as_deref() == Some(profile.as_str()) {
                        continue;
                    }
                    match host.apply_profile(pane, &profile) {
                        Ok(()) => {
                            info!(target: TRACE, "pane {}: applied profile '{}'", pane, profile);
                            self.remote.insert(pane, current);
                            changes.push(ProfileChange::Applied { pane, profile });
                        }
                        Err(e) => warn!(target: TRACE, "pane {}: {}", pane, e),
                    }
                }
                None => {
                    if !self.remote.contains_key(&pane) || now.duration_since(first_seen) < self.grace {
                        continue;
                    }
                    let previous = self.remote.remove(&pane).flatten();
                    if let Some(profile) = &previous {
                        info!(target: TRACE, "pane {}: restoring profile '{}'", pane, profile);
                        if let Err(e) = host.apply_profile(pane, profile) {
                            warn!(target: TRACE, "pane {}: {}", pane, e);
                        }
                    }
                    changes.push(ProfileChange::Restored {
                        pane,
                        profile: previous,
                    });
                }
            }
        }

        changes
    }
}

impl Default for ProfileWatcher {
    fn default() -> Self {
        Self::new()
    }
}
