//! Shell quoting for injected commands
//!
//! Commands typed into a pane are interpreted by a POSIX-ish shell, so
//! arguments with special characters are wrapped in single quotes.

use std::borrow::Cow;

/// Characters that require quoting in POSIX shells
const SHELL_SPECIAL_CHARS: &[char] = &[
    ' ', '\t', '\n', '\r', // Whitespace
    '\'', '"', '`', // Quotes and backticks
    '$', '!', '&', '|', // Expansion and control operators
    ';', '(', ')', '{', '}', '[', ']', // Grouping and subshell
    '<', '>', // Redirection
    '*', '?', // Glob patterns
    '\\', '#', '~', '^', // Escape, comments, home, history
];

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty() || arg.chars().any(|c| SHELL_SPECIAL_CHARS.contains(&c))
}

/// Single-quote `arg` if the shell would otherwise interpret part of it.
///
/// Embedded single quotes become `'\''`.
pub fn quote_arg(arg: &str) -> Cow<'_, str> {
    if !needs_quoting(arg) {
        return Cow::Borrowed(arg);
    }
    Cow::Owned(format!("'{}'", arg.replace('\'', "'\\''")))
}

/// Quote a directory for `cd`, keeping a leading `~` expandable
pub fn quote_path(path: &str) -> Cow<'_, str> {
    if path == "~" {
        return Cow::Borrowed(path);
    }
    match path.strip_prefix("~/") {
        Some(rest) if needs_quoting(rest) => Cow::Owned(format!("~/{}", quote_arg(rest))),
        Some(_) => Cow::Borrowed(path),
        None => quote_arg(path),
    }
}
