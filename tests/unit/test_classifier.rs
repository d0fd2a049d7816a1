//! Unit Tests for Session Classification
//!
//! Drives the classifier chain through a fake process table and mock panes.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use remotepane::session::classifier::Evidence;
use remotepane::{ContainerTool, PaneId, RemoteConfig, SessionClassifier, SessionKind, TextSnapshot};
use test_utils::{context_with, process, FakeProcessTree, MockHost};

const SHELL: u32 = 1000;

fn host_with_shell() -> (MockHost, PaneId, FakeProcessTree) {
    let tree = FakeProcessTree::new();
    tree.spawn(SHELL, 1, 10, "-bash");
    let mut host = MockHost::new();
    let pane = host.add_pane(SHELL);
    (host, pane, tree)
}

#[test]
fn test_ssh_strips_user() {
    let (host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "ssh bob@build.example.com");
    let context = context_with(&tree, RemoteConfig::default());

    let session = context.detect(&host, pane).expect("ssh session");
    assert_eq!(session.kind(), SessionKind::Ssh);
    assert_eq!(session.identity(), "build.example.com");
    assert_eq!(session.source_pane(), pane);
}

#[test]
fn test_docker_and_podman_exec() {
    for (tool, line) in [
        (ContainerTool::Docker, "docker exec -it web bash"),
        (ContainerTool::Podman, "podman exec -it web bash"),
    ] {
        let (host, pane, tree) = host_with_shell();
        tree.spawn(1001, SHELL, 20, line);
        let context = context_with(&tree, RemoteConfig::default());

        let session = context.detect(&host, pane).expect("container session");
        assert_eq!(session.kind(), SessionKind::Container(tool));
        assert_eq!(session.identity(), "web");
    }
}

#[test]
fn test_text_alone_never_makes_a_session() {
    let (mut host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "vim /etc/hosts");
    host.set_text(pane, &["$ ssh prod.example.com", "root@prod:/srv# "]);
    host.set_title(pane, "root@prod: /srv");
    let context = context_with(&tree, RemoteConfig::default());

    assert!(context.detect(&host, pane).is_none());
}

#[test]
fn test_process_evidence_wins_over_prompt_host() {
    let (mut host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "ssh alpha");
    host.set_text(pane, &["me@beta:/opt$ "]);
    let context = context_with(&tree, RemoteConfig::default());

    let session = context.detect(&host, pane).unwrap();
    assert_eq!(session.identity(), "alpha");
    assert_eq!(session.working_directory(), Some("/opt"));
}

#[test]
fn test_nested_session_in_subshell() {
    let (host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "bash");
    tree.spawn(1002, 1001, 30, "tmux-free-zone");
    tree.spawn(1003, 1001, 40, "ssh -p 2222 deploy@edge-1");
    let context = context_with(&tree, RemoteConfig::default());

    assert_eq!(context.detect(&host, pane).unwrap().identity(), "edge-1");
}

#[test]
fn test_latest_session_wins() {
    let (host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "ssh first");
    tree.spawn(1002, SHELL, 50, "podman attach second");
    let context = context_with(&tree, RemoteConfig::default());

    let session = context.detect(&host, pane).unwrap();
    assert_eq!(session.identity(), "second");
    assert_eq!(session.reconnect_command(), "podman attach second");
}

#[test]
fn test_proxy_jump_helper_does_not_hide_target() {
    let (host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "ssh -J bastion app-server");
    tree.spawn(1002, 1001, 21, "ssh -W [app-server]:22 bastion");
    let context = context_with(&tree, RemoteConfig::default());

    assert_eq!(context.detect(&host, pane).unwrap().identity(), "app-server");
}

#[test]
fn test_cwd_only_when_enabled() {
    let (mut host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "ssh example.com");
    host.set_text(pane, &["Last login: Mon", "me@example:/var/log$ "]);

    let with_cwd = context_with(&tree, RemoteConfig::default());
    assert_eq!(
        with_cwd.detect(&host, pane).unwrap().working_directory(),
        Some("/var/log")
    );

    let config = RemoteConfig {
        infer_cwd: false,
        ..Default::default()
    };
    let without = context_with(&tree, config);
    assert_eq!(without.detect(&host, pane).unwrap().working_directory(), None);
}

#[test]
fn test_unknown_cwd_still_classifies() {
    let (mut host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "docker exec -it db psql");
    host.set_text(pane, &["db=# "]);
    let context = context_with(&tree, RemoteConfig::default());

    let session = context.detect(&host, pane).unwrap();
    assert_eq!(session.identity(), "db");
    assert_eq!(session.working_directory(), None);
}

#[test]
fn test_gone_pane_and_unreadable_table() {
    let (mut host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "ssh example.com");
    let context = context_with(&tree, RemoteConfig::default());

    tree.set_unreadable(true);
    assert!(context.detect(&host, pane).is_none());
    tree.set_unreadable(false);

    tree.kill(SHELL);
    assert!(context.detect(&host, pane).is_none());

    host.remove_pane(pane);
    assert!(context.detect(&host, pane).is_none());
}

#[test]
fn test_repeated_detection_is_identical() {
    let (mut host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "ssh example.com");
    host.set_text(pane, &["me@example:~/src$ "]);
    let context = context_with(&tree, RemoteConfig::default());

    let first = context.detect(&host, pane);
    let second = context.detect(&host, pane);
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_session_ends_when_process_exits() {
    let (host, pane, tree) = host_with_shell();
    tree.spawn(1001, SHELL, 20, "ssh example.com");
    let context = context_with(&tree, RemoteConfig::default());
    assert!(context.detect(&host, pane).is_some());

    tree.kill(1001);
    assert!(context.detect(&host, pane).is_none());
}

#[test]
fn test_classifier_directly_from_evidence() {
    let classifier = SessionClassifier::with_defaults();
    assert_eq!(classifier.names(), vec!["ssh", "docker", "podman"]);

    let evidence = Evidence {
        processes: vec![process(7, 1, 3, "/usr/bin/docker exec --interactive --tty api sh")],
        text: Some(TextSnapshot::from_lines(vec!["/app # ".to_string()])),
    };
    let session = classifier.classify(&evidence, PaneId::new(4), true).unwrap();
    assert_eq!(session.identity(), "api");
    assert_eq!(session.working_directory(), Some("/app"));
}
