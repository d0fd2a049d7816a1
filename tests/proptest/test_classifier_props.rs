//! Property-based tests for session classification and cwd inference

#[path = "../test_utils/mod.rs"]
mod test_utils;

use proptest::prelude::*;
use remotepane::scraper::cwd::infer_cwd;
use remotepane::{PaneId, RemoteConfig, SessionClassifier};
use test_utils::{context_with, process, FakeProcessTree, MockHost};

const PANE: PaneId = PaneId::new(1);

proptest! {
    #[test]
    fn test_arbitrary_command_lines_dont_panic(
        lines in prop::collection::vec("(ssh|docker|podman)( [-a-zA-Z0-9@:=./\\[\\]]{0,12}){0,6}", 0..6),
    ) {
        let processes: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| process(100 + i as u32, 1, i as u64, line))
            .collect();
        let _ = SessionClassifier::with_defaults().classify_processes(&processes, PANE);
    }

    #[test]
    fn test_ssh_identity_is_host_part(
        user in "[a-z]{1,8}",
        host in "[a-z][a-z0-9.-]{0,20}",
        port in 1u16..=65535,
    ) {
        let line = format!("ssh -p {} {}@{}", port, user, host);
        let session = SessionClassifier::with_defaults()
            .classify_processes(&[process(10, 1, 1, &line)], PANE);
        prop_assert!(session.is_some());
        let session = session.unwrap();
        prop_assert_eq!(session.identity(), host.as_str());
        prop_assert_eq!(session.reconnect_command(), line);
    }

    #[test]
    fn test_local_processes_never_classify(
        lines in prop::collection::vec("(vim|less|top|bash|python3)( [a-z0-9./]{1,10}){0,3}", 1..6),
    ) {
        let processes: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| process(100 + i as u32, 1, i as u64, line))
            .collect();
        prop_assert!(SessionClassifier::with_defaults()
            .classify_processes(&processes, PANE)
            .is_none());
    }

    #[test]
    fn test_pane_text_never_creates_session(
        text in prop::collection::vec("\\PC{0,40}", 0..6),
    ) {
        let tree = FakeProcessTree::new();
        tree.spawn(500, 1, 1, "bash");
        tree.spawn(501, 500, 2, "sleep 100");
        let mut host = MockHost::new();
        let pane = host.add_pane(500);
        let lines: Vec<&str> = text.iter().map(String::as_str).collect();
        host.set_text(pane, &lines);

        let context = context_with(&tree, RemoteConfig::default());
        prop_assert!(context.detect(&host, pane).is_none());
    }

    #[test]
    fn test_process_order_is_irrelevant(
        starts in prop::collection::vec(0u64..50, 1..6),
    ) {
        let tools = ["ssh host-a", "docker exec -it box sh", "podman attach pod", "vim x"];
        let processes: Vec<_> = starts
            .iter()
            .enumerate()
            .map(|(i, start)| process(100 + i as u32, 1, *start, tools[i % tools.len()]))
            .collect();
        let mut reversed = processes.clone();
        reversed.reverse();

        let classifier = SessionClassifier::with_defaults();
        prop_assert_eq!(
            classifier.classify_processes(&processes, PANE),
            classifier.classify_processes(&reversed, PANE)
        );
    }

    #[test]
    fn test_detection_is_idempotent(
        host_name in "[a-z]{1,10}",
        dir in "(/[a-z0-9_]{1,8}){0,4}",
    ) {
        let tree = FakeProcessTree::new();
        tree.spawn(500, 1, 1, "bash");
        tree.spawn(501, 500, 2, &format!("ssh {}", host_name));
        let mut host = MockHost::new();
        let pane = host.add_pane(500);
        let prompt = format!("me@{}:{}$ ", host_name, dir);
        host.set_text(pane, &[prompt.as_str()]);

        let context = context_with(&tree, RemoteConfig::default());
        let first = context.detect(&host, pane);
        prop_assert!(first.is_some());
        prop_assert_eq!(first, context.detect(&host, pane));
    }

    #[test]
    fn test_infer_cwd_doesnt_panic(text in "\\PC*") {
        if let Some(dir) = infer_cwd(&text) {
            prop_assert!(dir.starts_with('/') || dir.starts_with('~'));
        }
    }

    #[test]
    fn test_prompt_path_is_found(
        user in "[a-z]{1,8}",
        path in "(/[a-zA-Z0-9_.-]{1,8}){1,4}",
        terminator in "[$#%>]",
    ) {
        let prompt = format!("{}@box:{}{} ", user, path, terminator);
        prop_assert_eq!(infer_cwd(&prompt), Some(path));
    }
}
