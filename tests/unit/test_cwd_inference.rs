//! Unit Tests for Working Directory Inference
//!
//! Prompt shapes from common shells, escape sequence reports and window
//! titles, read both from plain text and through a mock pane.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use remotepane::scraper::cwd::{cwd_from_title, infer_cwd, infer_from_snapshot};
use remotepane::{TextScraper, TextSnapshot};
use test_utils::MockHost;

fn snapshot(lines: &[&str]) -> TextSnapshot {
    TextSnapshot::from_lines(lines.iter().map(|l| l.to_string()).collect())
}

#[test]
fn test_bash_prompt() {
    assert_eq!(infer_cwd("user@host:~/projects$ ").as_deref(), Some("~/projects"));
    assert_eq!(infer_cwd("me@box:/var/log$ ").as_deref(), Some("/var/log"));
}

#[test]
fn test_root_prompts() {
    assert_eq!(infer_cwd("root@db:/# ").as_deref(), Some("/"));
    assert_eq!(
        infer_cwd("[root@web01 /etc/nginx]# ").as_deref(),
        Some("/etc/nginx")
    );
}

#[test]
fn test_zsh_and_fish_prompts() {
    assert_eq!(infer_cwd("me@box /var/www %").as_deref(), Some("/var/www"));
    assert_eq!(infer_cwd("me@box ~/src> ").as_deref(), Some("~/src"));
}

#[test]
fn test_trailing_slash_is_dropped() {
    assert_eq!(infer_cwd("me@box:/srv/app/$ ").as_deref(), Some("/srv/app"));
}

#[test]
fn test_prompt_without_path() {
    assert_eq!(infer_cwd("db=# "), None);
    assert_eq!(infer_cwd("$ "), None);
}

#[test]
fn test_output_above_prompt_is_ignored() {
    let text = "postgres=# \\! ls /etc\n/etc/passwd\ndb=# ";
    assert_eq!(infer_cwd(text), None);
}

#[test]
fn test_two_line_prompt() {
    let text = "build finished\nme@box:/srv/app\n$ ";
    assert_eq!(infer_cwd(text).as_deref(), Some("/srv/app"));
}

#[test]
fn test_latest_prompt_wins() {
    let text = "me@box:/old$ cd /new\nme@box:/new$ ";
    assert_eq!(infer_cwd(text).as_deref(), Some("/new"));
}

#[test]
fn test_blank_lines_below_prompt() {
    let text = "me@box:~/notes$ \n\n\n";
    assert_eq!(infer_cwd(text).as_deref(), Some("~/notes"));
}

#[test]
fn test_urls_are_not_paths() {
    assert_eq!(infer_cwd("see https://example.com/path"), None);
}

#[test]
fn test_prompt_outside_window() {
    let text = "me@box:/far$ ls\nalpha\nbeta\ngamma";
    assert_eq!(infer_cwd(text), None);
}

#[test]
fn test_typed_command_after_cursor_prompt() {
    let snapshot = snapshot(&["me@box:/srv$ cd /tmp"]).with_cursor(0, 19);
    assert_eq!(infer_from_snapshot(&snapshot).as_deref(), Some("/srv"));
}

#[test]
fn test_cursor_above_stale_text() {
    let snapshot = snapshot(&["me@box:/home/me$ ", "me@box:/stale$ "]).with_cursor(0, 17);
    assert_eq!(infer_from_snapshot(&snapshot).as_deref(), Some("/home/me"));
}

#[test]
fn test_osc7_report_wins_over_prompt() {
    let snapshot = snapshot(&[
        "\x1b]7;file://box/home/me/work\x07me@box:/elsewhere$ ",
    ]);
    assert_eq!(
        infer_from_snapshot(&snapshot).as_deref(),
        Some("/home/me/work")
    );
}

#[test]
fn test_last_osc_report_wins() {
    let snapshot = snapshot(&[
        "\x1b]7;file://box/first\x07$ cd /second",
        "\x1b]1337;CurrentDir=/second\x07$ ",
    ]);
    assert_eq!(infer_from_snapshot(&snapshot).as_deref(), Some("/second"));
}

#[test]
fn test_colored_prompt() {
    let text = "\x1b[01;32mme@box\x1b[00m:\x1b[01;34m/opt/tools\x1b[00m$ ";
    assert_eq!(infer_cwd(text).as_deref(), Some("/opt/tools"));
}

#[test]
fn test_title_fallback() {
    let snapshot = snapshot(&["no prompt here"]).with_title("me@box: ~/docs");
    assert_eq!(infer_from_snapshot(&snapshot).as_deref(), Some("~/docs"));

    assert_eq!(cwd_from_title("me@box:/var/tmp").as_deref(), Some("/var/tmp"));
    assert_eq!(cwd_from_title("vim notes.txt"), None);
    assert_eq!(cwd_from_title(""), None);
}

#[test]
fn test_empty_input() {
    assert_eq!(infer_cwd(""), None);
    assert_eq!(infer_from_snapshot(&TextSnapshot::default()), None);
}

#[test]
fn test_snapshot_through_host() {
    let mut host = MockHost::new();
    let pane = host.add_pane(100);
    host.set_text(pane, &["Welcome", "me@box:/srv/data$ "]);
    host.set_title(pane, "me@box: /srv/data");

    let snapshot = TextScraper::snapshot(&host, pane);
    assert_eq!(snapshot.lines.len(), 2);
    assert_eq!(snapshot.title.as_deref(), Some("me@box: /srv/data"));
    assert_eq!(infer_from_snapshot(&snapshot).as_deref(), Some("/srv/data"));
}

#[test]
fn test_gone_pane_reads_empty() {
    let mut host = MockHost::new();
    let pane = host.add_pane(100);
    host.remove_pane(pane);

    assert!(TextScraper::read_visible_text(&host, pane).is_empty());
    assert_eq!(TextScraper::read_title(&host, pane), "");
    assert!(TextScraper::snapshot(&host, pane).is_empty());
}
