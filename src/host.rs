//! Host multiplexer interface
//!
//! The multiplexer that owns panes, profiles and the input streams of the
//! panes is an external collaborator. Everything remotepane needs from it is
//! expressed by the [`Host`] trait; the host calls back into the crate with
//! [`HostEvent`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a pane owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaneId(u64);

impl PaneId {
    /// Wrap a host-side pane identifier
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-side identifier
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis of a new pane relative to its source pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Split so the new pane sits below the source
    Horizontal,
    /// Split so the new pane sits beside the source
    Vertical,
    /// Let the host pick the axis (usually from the pane's aspect ratio)
    Auto,
}

impl SplitDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitDirection::Horizontal => "horizontal",
            SplitDirection::Vertical => "vertical",
            SplitDirection::Auto => "auto",
        }
    }
}

/// Cursor position inside the visible buffer (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

/// Raw visible buffer of a pane as handed over by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaneText {
    /// Visible lines, top to bottom. May still contain escape sequences.
    pub lines: Vec<String>,
    /// Cursor position, when the host exposes it
    pub cursor: Option<Cursor>,
}

/// Failures reported by the host multiplexer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Host has no pane {pane}")]
    PaneNotFound { pane: PaneId },

    #[error("Failed to split pane {pane} ({direction}): {reason}")]
    PaneCreationFailed {
        pane: PaneId,
        direction: &'static str,
        reason: String,
    },

    #[error("Profile '{profile}' does not exist")]
    ProfileNotFound { profile: String },

    #[error("Pane {pane} rejected input: {reason}")]
    InputRejected { pane: PaneId, reason: String },

    #[error("Host unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Operations consumed from the host multiplexer.
///
/// Reads (`pane_text`, `title`, `foreground_process_id`) fail softly by
/// returning `None`; the pane may have disappeared between calls.
pub trait Host {
    /// Create a new pane next to `relative_to`
    fn create_pane(
        &mut self,
        relative_to: PaneId,
        direction: SplitDirection,
    ) -> Result<PaneId, HostError>;

    /// Switch `pane` to the named profile
    fn apply_profile(&mut self, pane: PaneId, profile: &str) -> Result<(), HostError>;

    /// Name of the profile currently in effect for `pane`
    fn current_profile(&self, pane: PaneId) -> Option<String>;

    /// Type `text` into the pane's input stream
    fn send_input(&mut self, pane: PaneId, text: &str) -> Result<(), HostError>;

    /// Process id of the process the pane was spawned with (usually a shell)
    fn foreground_process_id(&self, pane: PaneId) -> Option<u32>;

    /// All live panes
    fn panes(&self) -> Vec<PaneId>;

    /// Visible buffer of the pane
    fn pane_text(&self, pane: PaneId) -> Option<PaneText>;

    /// Window title of the pane
    fn title(&self, pane: PaneId) -> Option<String>;
}

/// Entries contributed to the host's pane context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Clone, letting the host choose the axis
    CloneAuto,
    /// Clone into a horizontal split
    CloneHorizontal,
    /// Clone into a vertical split
    CloneVertical,
    /// Toggle cloning on every split of a remote pane
    ToggleCloneOnSplit,
}

impl MenuAction {
    /// Menu label, with `_` marking the mnemonic
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::CloneAuto => "Clone _Auto",
            MenuAction::CloneHorizontal => "Clone _Horizontally",
            MenuAction::CloneVertical => "Clone _Vertically",
            MenuAction::ToggleCloneOnSplit => "Clone On _Split",
        }
    }

    /// Split direction for clone actions
    pub fn direction(&self) -> Option<SplitDirection> {
        match self {
            MenuAction::CloneAuto => Some(SplitDirection::Auto),
            MenuAction::CloneHorizontal => Some(SplitDirection::Horizontal),
            MenuAction::CloneVertical => Some(SplitDirection::Vertical),
            MenuAction::ToggleCloneOnSplit => None,
        }
    }
}

/// A menu entry as rendered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: &'static str,
    /// Check state for toggle entries
    pub checked: Option<bool>,
}

/// Events the host delivers to the plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host finished splitting `source`; `created` is the new pane
    Split { source: PaneId, created: PaneId },
    /// The user picked one of our menu entries on `pane`
    MenuAction { pane: PaneId, action: MenuAction },
}
