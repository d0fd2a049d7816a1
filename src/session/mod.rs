//! Remote Session Model
//!
//! A [`Session`] describes the remote context (ssh host or container) found
//! in a pane. Sessions are plain values: detection builds a new one each time
//! and nothing mutates it afterwards.

pub mod classifier;
pub mod container;
pub mod ssh;

pub use classifier::{Classifier, SessionClassifier};
pub use container::ContainerClassifier;
pub use ssh::SshClassifier;

use crate::host::PaneId;
use crate::shell_quote::{quote_arg, quote_path};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Container CLI a session was started with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerTool {
    Docker,
    Podman,
}

impl ContainerTool {
    /// Executable name of the tool
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerTool::Docker => "docker",
            ContainerTool::Podman => "podman",
        }
    }
}

impl fmt::Display for ContainerTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of remote context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// An `ssh` client connection
    Ssh,
    /// A shell inside a container, entered with the given tool
    Container(ContainerTool),
}

impl SessionKind {
    pub fn is_ssh(&self) -> bool {
        matches!(self, SessionKind::Ssh)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, SessionKind::Container(_))
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Ssh => f.write_str("ssh"),
            SessionKind::Container(tool) => write!(f, "container ({})", tool),
        }
    }
}

/// A remote session detected in a pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    kind: SessionKind,
    identity: String,
    working_directory: Option<String>,
    source_pane: PaneId,
    reconnect: Vec<String>,
}

impl Session {
    /// An ssh session to `identity`, reconnected with `ssh <identity>`
    pub fn ssh(identity: impl Into<String>, source_pane: PaneId) -> Self {
        let identity = identity.into();
        let reconnect = vec!["ssh".to_string(), identity.clone()];
        Self::detected(SessionKind::Ssh, identity, source_pane, reconnect)
    }

    /// A container session, reconnected with `<tool> exec -it <identity> sh`
    pub fn container(tool: ContainerTool, identity: impl Into<String>, source_pane: PaneId) -> Self {
        let identity = identity.into();
        let reconnect = exec_shell_command(tool, &identity, "sh");
        Self::detected(SessionKind::Container(tool), identity, source_pane, reconnect)
    }

    /// A session whose reconnect argv was derived from a live process
    pub(crate) fn detected(
        kind: SessionKind,
        identity: String,
        source_pane: PaneId,
        reconnect: Vec<String>,
    ) -> Self {
        Self {
            kind,
            identity,
            working_directory: None,
            source_pane,
            reconnect,
        }
    }

    /// Same session with an inferred working directory attached
    pub fn with_working_directory(self, working_directory: Option<String>) -> Self {
        Self {
            working_directory,
            ..self
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    /// Hostname (ssh) or container name/id (container)
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Best-effort working directory inside the remote context
    pub fn working_directory(&self) -> Option<&str> {
        self.working_directory.as_deref()
    }

    pub fn source_pane(&self) -> PaneId {
        self.source_pane
    }

    /// Argument vector that re-establishes this session
    pub fn reconnect_argv(&self) -> &[String] {
        &self.reconnect
    }

    /// Shell command line that re-establishes this session
    pub fn reconnect_command(&self) -> String {
        self.reconnect
            .iter()
            .map(|arg| quote_arg(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `cd` command for the inferred working directory, if any
    pub fn cd_command(&self) -> Option<String> {
        self.working_directory
            .as_deref()
            .map(|dir| format!("cd {}", quote_path(dir)))
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} session '{}' in pane {}", self.kind, self.identity, self.source_pane)?;
        if let Some(cwd) = &self.working_directory {
            write!(f, " at {}", cwd)?;
        }
        Ok(())
    }
}

/// `<tool> exec -it <container> <shell>`
pub(crate) fn exec_shell_command(tool: ContainerTool, container: &str, shell: &str) -> Vec<String> {
    vec![
        tool.as_str().to_string(),
        "exec".to_string(),
        "-it".to_string(),
        container.to_string(),
        shell.to_string(),
    ]
}
