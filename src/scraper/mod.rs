//! Text Scraper
//!
//! Reads the visible buffer and title of a pane through the [`Host`]. A pane
//! that has gone away yields empty output, which callers treat as "no
//! evidence".

pub mod cwd;
pub mod osc;

use crate::host::{Cursor, Host, PaneId};

/// Visible text, cursor and title of a pane at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSnapshot {
    pub lines: Vec<String>,
    pub cursor: Option<Cursor>,
    pub title: Option<String>,
}

impl TextSnapshot {
    /// Snapshot of plain lines without cursor or title
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            cursor: None,
            title: None,
        }
    }

    pub fn with_cursor(mut self, row: usize, col: usize) -> Self {
        self.cursor = Some(Cursor { row, col });
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
            && self.title.as_deref().map_or(true, str::is_empty)
    }
}

/// Stateless reader of pane text
pub struct TextScraper;

impl TextScraper {
    /// Visible lines of the pane, empty if the pane is gone
    pub fn read_visible_text<H: Host + ?Sized>(host: &H, pane: PaneId) -> Vec<String> {
        host.pane_text(pane).map(|text| text.lines).unwrap_or_default()
    }

    /// Title of the pane, empty if the pane is gone or untitled
    pub fn read_title<H: Host + ?Sized>(host: &H, pane: PaneId) -> String {
        host.title(pane).unwrap_or_default()
    }

    /// Lines, cursor and title in one snapshot
    pub fn snapshot<H: Host + ?Sized>(host: &H, pane: PaneId) -> TextSnapshot {
        let (lines, cursor) = match host.pane_text(pane) {
            Some(text) => (text.lines, text.cursor),
            None => {
                trace!(target: "Remote", "pane {} has no readable text", pane);
                (Vec::new(), None)
            }
        };

        TextSnapshot {
            lines,
            cursor,
            title: host.title(pane).filter(|t| !t.is_empty()),
        }
    }
}
