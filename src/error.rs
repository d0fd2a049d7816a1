//! Error types and Result aliases for remotepane
//!
//! Detection never produces errors: a missing session or an unknown working
//! directory is an absence value (see [`DetectionGap`]). Only host integration
//! failures and configuration problems travel through [`Error`].

use crate::config::ConfigError;
use crate::host::HostError;
use std::fmt;

/// Result type alias for remotepane operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for remotepane
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host multiplexer refused or failed an operation
    #[error("Host integration error: {0}")]
    Host(#[from] HostError),

    /// Configuration could not be loaded, parsed or validated
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a detection step came back empty.
///
/// These are expected outcomes, logged for the debug classes and never
/// surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionGap {
    /// The pane (or its foreground process) went away
    PaneGone,
    /// The process table could not be read
    ProcessTableUnavailable,
    /// The foreground process has no descendants
    NoChildProcesses,
    /// Descendants exist but none is an ssh/container session
    NoRemoteProcess,
    /// A remote tool runs but its target could not be extracted
    NoIdentity,
    /// No working directory could be inferred from the pane text
    UnknownCwd,
}

impl fmt::Display for DetectionGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DetectionGap::PaneGone => "pane has gone away",
            DetectionGap::ProcessTableUnavailable => "process table unavailable",
            DetectionGap::NoChildProcesses => "no child processes",
            DetectionGap::NoRemoteProcess => "no remote session process",
            DetectionGap::NoIdentity => "remote target could not be determined",
            DetectionGap::UnknownCwd => "working directory unknown",
        };
        f.write_str(text)
    }
}
