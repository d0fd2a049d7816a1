//! Clone Orchestrator
//!
//! Re-establishes a remote session in another pane: create the pane, apply
//! the resolved profile, type the reconnect command and then the `cd` into
//! the inferred working directory. A missing session still leaves the user
//! with the plain pane they asked for.

use crate::config::RemoteConfig;
use crate::host::{Host, HostError, PaneId, SplitDirection};
use crate::profile::ProfileResolver;
use crate::session::Session;

const TRACE: &str = "Remote";

/// A clone action, built per user action or split event and consumed at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    /// Pane the new pane is split off
    pub source: PaneId,
    pub direction: SplitDirection,
    /// Session detected in `source` when the request was made
    pub session: Option<Session>,
    /// Whether to `cd` into the session's working directory
    pub infer_cwd: bool,
}

impl CloneRequest {
    /// Request to clone `session` from the pane it was detected in
    pub fn new(session: Session, direction: SplitDirection, infer_cwd: bool) -> Self {
        Self {
            source: session.source_pane(),
            direction,
            session: Some(session),
            infer_cwd,
        }
    }

    /// Request for a pane without a detected session
    pub fn plain(source: PaneId, direction: SplitDirection) -> Self {
        Self {
            source,
            direction,
            session: None,
            infer_cwd: false,
        }
    }
}

/// Outcome of a successful clone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonedPane {
    /// The pane now running the session
    pub pane: PaneId,
    /// Profile the pane had before ours was applied
    pub previous_profile: Option<String>,
    /// Profile applied to the pane, if any
    pub applied_profile: Option<String>,
}

/// Clone failures
#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    /// The host could not create the pane
    #[error("Failed to create pane: {0}")]
    HostUnavailable(#[source] HostError),

    /// There was nothing to clone; `pane` is the plain pane that was created
    #[error("No remote session to clone, opened plain pane {pane}")]
    NoActiveSession { pane: PaneId },

    /// The pane exists but the reconnect command could not be typed into it
    #[error("Pane {pane} rejected the reconnect command: {source}")]
    InputRejected { pane: PaneId, source: HostError },
}

impl CloneError {
    /// The pane that was created despite the failure, if any
    pub fn fallback_pane(&self) -> Option<PaneId> {
        match self {
            CloneError::HostUnavailable(_) => None,
            CloneError::NoActiveSession { pane } | CloneError::InputRejected { pane, .. } => {
                Some(*pane)
            }
        }
    }
}

/// Drives the host through a clone
pub struct CloneOrchestrator<'a> {
    config: &'a RemoteConfig,
}

impl<'a> CloneOrchestrator<'a> {
    pub fn new(config: &'a RemoteConfig) -> Self {
        Self { config }
    }

    /// Create a pane for `request` and re-establish its session there
    pub fn clone<H: Host + ?Sized>(
        &self,
        host: &mut H,
        request: CloneRequest,
    ) -> Result<ClonedPane, CloneError> {
        let pane = host
            .create_pane(request.source, request.direction)
            .map_err(|e| {
                error!(target: TRACE, "cannot split pane {}: {}", request.source, e);
                CloneError::HostUnavailable(e)
            })?;

        let Some(session) = request.session else {
            info!(
                target: TRACE,
                "pane {} has no remote session, opened plain pane {}",
                request.source,
                pane
            );
            return Err(CloneError::NoActiveSession { pane });
        };

        self.clone_into(host, pane, &session, request.infer_cwd)
    }

    /// Re-establish `session` in the existing pane `pane`
    pub fn clone_into<H: Host + ?Sized>(
        &self,
        host: &mut H,
        pane: PaneId,
        session: &Session,
        infer_cwd: bool,
    ) -> Result<ClonedPane, CloneError> {
        info!(target: TRACE, "cloning {} into pane {}", session, pane);

        let previous_profile = host.current_profile(pane);
        let applied_profile = ProfileResolver::resolve(session, self.config).and_then(|profile| {
            match host.apply_profile(pane, &profile) {
                Ok(()) => Some(profile),
                Err(e) => {
                    // The session is still worth cloning without its profile
                    warn!(target: TRACE, "pane {}: {}", pane, e);
                    None
                }
            }
        });

        let reject = |source: HostError| CloneError::InputRejected { pane, source };
        let reconnect = session.reconnect_command();
        debug!(target: TRACE, "pane {}: sending '{}'", pane, reconnect);
        host.send_input(pane, &format!("{}\n", reconnect))
            .map_err(reject)?;

        if infer_cwd {
            if let Some(cd) = session.cd_command() {
                debug!(target: TRACE, "pane {}: sending '{}'", pane, cd);
                host.send_input(pane, &format!("{}\n", cd)).map_err(reject)?;
            }
        }

        Ok(ClonedPane {
            pane,
            previous_profile,
            applied_profile,
        })
    }
}
