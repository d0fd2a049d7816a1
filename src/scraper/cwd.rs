//! Working Directory Inference
//!
//! Best-effort extraction of the remote shell's current directory from pane
//! text. Sources, most trusted first:
//!
//! 1. The last OSC 7 / OSC 1337 `CurrentDir=` report in the captured text
//! 2. A path in the prompt just before the cursor (last 3 lines)
//! 3. A `user@host: path` window title
//!
//! All functions here are pure; `None` is the normal "unknown" outcome.

use super::{osc, TextSnapshot};
use crate::host::Cursor;
use once_cell::sync::Lazy;
use regex::Regex;

/// Number of lines, ending at the cursor line, searched for a prompt
const PROMPT_WINDOW: usize = 3;

/// Characters that end a shell prompt when followed by a space or end of line
const PROMPT_TERMINATORS: &[char] = &['$', '#', '%', '>'];

/// `~`, `~/dir/...`, `/`, or `/dir/...`, preceded by start, blank, `:`, `[` or `(`
static PATH_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s:\[(])(~(?:/[\w.+@-]+)*/?|/(?:[\w.+@-]+/?)*)")
        .expect("Failed to compile path token regex")
});

/// `user@host: /path` or `user@host:~/path` as set by common shell rc files
static TITLE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^:\s]+:\s*(~\S*|/\S*)\s*$").expect("Failed to compile title regex")
});

/// Infer the cwd from raw text whose cursor sits at the end
pub fn infer_cwd(text: &str) -> Option<String> {
    let lines = text.lines().map(str::to_string).collect();
    infer_from_snapshot(&TextSnapshot::from_lines(lines))
}

/// Infer the cwd from a pane snapshot
pub fn infer_from_snapshot(snapshot: &TextSnapshot) -> Option<String> {
    let mut reports = Vec::new();
    let lines: Vec<String> = snapshot
        .lines
        .iter()
        .map(|line| {
            let scrubbed = osc::scrub(line);
            reports.extend(scrubbed.cwd_reports);
            scrubbed.text
        })
        .collect();

    if let Some(reported) = reports.pop() {
        trace!(target: "Remote", "cwd from escape sequence: {}", reported);
        return Some(reported);
    }

    if let Some(dir) = cwd_from_prompt(&prompt_window(&lines, snapshot.cursor)) {
        trace!(target: "Remote", "cwd from prompt: {}", dir);
        return Some(dir);
    }

    snapshot.title.as_deref().and_then(cwd_from_title)
}

/// Path from a `user@host: path` title
pub fn cwd_from_title(title: &str) -> Option<String> {
    let captures = TITLE_PATH.captures(title.trim())?;
    Some(normalize(captures.get(1)?.as_str()))
}

/// Lines up to and including the cursor line, the last one cut at the cursor.
///
/// Without a cursor the last non-blank line is taken as the cursor line.
fn prompt_window(lines: &[String], cursor: Option<Cursor>) -> Vec<String> {
    let (row, col) = match cursor {
        Some(_) if lines.is_empty() => return Vec::new(),
        Some(cursor) => (cursor.row.min(lines.len() - 1), Some(cursor.col)),
        None => match lines.iter().rposition(|line| !line.trim().is_empty()) {
            Some(row) => (row, None),
            None => return Vec::new(),
        },
    };

    let start = (row + 1).saturating_sub(PROMPT_WINDOW);
    let mut window = lines[start..row].to_vec();
    window.push(match col {
        Some(col) => lines[row].chars().take(col).collect(),
        None => lines[row].clone(),
    });
    window
}

/// Last path token of the prompt window.
///
/// When the cursor line is a prompt only its own text counts: paths printed
/// above it belong to command output.
fn cwd_from_prompt(window: &[String]) -> Option<String> {
    let (cursor_line, earlier) = window.split_last()?;
    if let Some(prompt) = prompt_prefix(cursor_line) {
        if !prompt.trim().is_empty() {
            return last_path_token(prompt);
        }
        // Bare marker line: the rest of the prompt sits on the line above
        let above = earlier.last()?;
        return last_path_token(prompt_prefix(above).unwrap_or(above));
    }

    std::iter::once(cursor_line)
        .chain(earlier.iter().rev())
        .find_map(|line| last_path_token(prompt_prefix(line).unwrap_or(line)))
}

/// Text before the first prompt terminator, if the line has one
fn prompt_prefix(line: &str) -> Option<&str> {
    let line = line.trim_end();
    line.char_indices().find_map(|(idx, c)| {
        if !PROMPT_TERMINATORS.contains(&c) {
            return None;
        }
        let next = line[idx + c.len_utf8()..].chars().next();
        matches!(next, None | Some(' ')).then(|| &line[..idx])
    })
}

fn last_path_token(text: &str) -> Option<String> {
    PATH_TOKEN
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        // "http://" style fragments are not paths
        .filter(|m| !text[m.end()..].starts_with('/'))
        .last()
        .map(|m| normalize(m.as_str()))
}

fn normalize(path: &str) -> String {
    match path.trim_end_matches('/') {
        "" if path.starts_with('/') => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}
