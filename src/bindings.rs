//! Event Bindings
//!
//! Glue between host events and the clone orchestrator. The host asks for
//! menu entries when it opens a pane's context menu, and forwards menu picks
//! and finished splits.

use crate::clone::{CloneError, CloneRequest, ClonedPane};
use crate::context::RemoteContext;
use crate::error::Result;
use crate::host::{Host, HostEvent, MenuAction, MenuItem, PaneId, SplitDirection};
use crate::watch::{ProfileChange, ProfileWatcher};

const TRACE: &str = "Remote";

/// The plugin instance registered with the host
pub struct Remote {
    context: RemoteContext,
    watcher: ProfileWatcher,
}

impl Remote {
    pub fn new(context: RemoteContext) -> Self {
        Self {
            context,
            watcher: ProfileWatcher::new(),
        }
    }

    /// Plugin with configuration from the default locations
    pub fn load() -> Result<Self> {
        Ok(Self::new(RemoteContext::load()?))
    }

    /// Replace the profile watcher (e.g. to shorten its grace period)
    pub fn with_watcher(mut self, watcher: ProfileWatcher) -> Self {
        self.watcher = watcher;
        self
    }

    pub fn context(&self) -> &RemoteContext {
        &self.context
    }

    pub fn watcher(&self) -> &ProfileWatcher {
        &self.watcher
    }

    /// Whether splits of remote panes are cloned automatically
    pub fn auto_clone(&self) -> bool {
        self.context.config().auto_clone
    }

    pub fn set_auto_clone(&mut self, enabled: bool) {
        debug!(target: TRACE, "clone on split: {}", enabled);
        self.context.config_mut().auto_clone = enabled;
    }

    /// Context menu entries for `pane`; empty unless it hosts a remote session
    pub fn menu_items<H: Host + ?Sized>(&self, host: &H, pane: PaneId) -> Vec<MenuItem> {
        if self.context.detect_without_cwd(host, pane).is_none() {
            return Vec::new();
        }

        [
            MenuAction::CloneAuto,
            MenuAction::CloneHorizontal,
            MenuAction::CloneVertical,
            MenuAction::ToggleCloneOnSplit,
        ]
        .into_iter()
        .map(|action| MenuItem {
            action,
            label: action.label(),
            checked: (action == MenuAction::ToggleCloneOnSplit).then(|| self.auto_clone()),
        })
        .collect()
    }

    /// Dispatch a host event
    pub fn handle_event<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        event: HostEvent,
    ) -> std::result::Result<Option<PaneId>, CloneError> {
        match event {
            HostEvent::Split { source, created } => self.on_split(host, source, created),
            HostEvent::MenuAction { pane, action } => self.on_menu_action(host, pane, action),
        }
    }

    /// A menu entry was picked on `pane`.
    ///
    /// Clone actions return the new pane. A pane that is no longer remote
    /// still gets its plain split.
    pub fn on_menu_action<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        pane: PaneId,
        action: MenuAction,
    ) -> std::result::Result<Option<PaneId>, CloneError> {
        let Some(direction) = action.direction() else {
            let enabled = !self.auto_clone();
            self.set_auto_clone(enabled);
            return Ok(None);
        };

        self.clone_pane(host, pane, direction).map(Some)
    }

    /// Clone `pane` into a new split
    pub fn clone_pane<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        pane: PaneId,
        direction: SplitDirection,
    ) -> std::result::Result<PaneId, CloneError> {
        let infer_cwd = self.context.config().infer_cwd;
        let request = match self.context.detect(&*host, pane) {
            Some(session) => CloneRequest::new(session, direction, infer_cwd),
            None => {
                warn!(target: TRACE, "pane {} lost its remote session", pane);
                CloneRequest::plain(pane, direction)
            }
        };

        let result = self.context.orchestrator().clone(host, request);
        match result {
            Ok(cloned) => Ok(self.remember(cloned)),
            Err(CloneError::NoActiveSession { pane }) => Ok(pane),
            Err(e) => Err(e),
        }
    }

    /// The host finished splitting `source` into `created`
    pub fn on_split<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        source: PaneId,
        created: PaneId,
    ) -> std::result::Result<Option<PaneId>, CloneError> {
        if !self.auto_clone() {
            return Ok(None);
        }
        let Some(session) = self.context.detect(&*host, source) else {
            trace!(target: TRACE, "split of local pane {}", source);
            return Ok(None);
        };

        let infer_cwd = self.context.config().infer_cwd;
        let cloned = self
            .context
            .orchestrator()
            .clone_into(host, created, &session, infer_cwd)?;
        Ok(Some(self.remember(cloned)))
    }

    /// Periodic profile check, see [`ProfileWatcher::poll`]
    pub fn poll<H: Host + ?Sized>(&mut self, host: &mut H) -> Vec<ProfileChange> {
        self.watcher.poll(host, &self.context)
    }

    fn remember(&mut self, cloned: ClonedPane) -> PaneId {
        if cloned.applied_profile.is_some() {
            self.watcher.track(cloned.pane, cloned.previous_profile);
        }
        cloned.pane
    }
}

impl Default for Remote {
    fn default() -> Self {
        Self::new(RemoteContext::default())
    }
}
