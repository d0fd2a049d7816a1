//! Unit Tests for Profile Resolution

use remotepane::profile::glob_matches;
use remotepane::{
    ContainerTool, HostRule, PaneId, ProfileResolver, ProfileRule, RemoteConfig, RuleScope,
    Session, SessionKind,
};

const PANE: PaneId = PaneId::new(1);

fn config() -> RemoteConfig {
    RemoteConfig {
        ssh_default_profile: Some("SSH".to_string()),
        container_default_profile: Some("Container".to_string()),
        ..Default::default()
    }
    .with_host_profile("prod-db", "Danger")
    .with_host_profile("prod-*", "Production")
    .with_host_profile("*", "Anything")
}

#[test]
fn test_host_rule_beats_default() {
    let config = RemoteConfig {
        ssh_default_profile: Some("P1".to_string()),
        ..Default::default()
    }
    .with_host_profile("example.com", "P2");

    let session = Session::ssh("example.com", PANE);
    assert_eq!(ProfileResolver::resolve(&session, &config).as_deref(), Some("P2"));

    let other = Session::ssh("other.example.com", PANE);
    assert_eq!(ProfileResolver::resolve(&other, &config).as_deref(), Some("P1"));
}

#[test]
fn test_nothing_configured() {
    let config = RemoteConfig::default();
    assert_eq!(ProfileResolver::resolve(&Session::ssh("h", PANE), &config), None);
    assert_eq!(
        ProfileResolver::resolve(&Session::container(ContainerTool::Docker, "c", PANE), &config),
        None
    );
}

#[test]
fn test_exact_match_beats_patterns() {
    let config = config();
    assert_eq!(
        ProfileResolver::resolve_identity(SessionKind::Ssh, "prod-db", &config).as_deref(),
        Some("Danger")
    );
}

#[test]
fn test_longest_pattern_wins() {
    let config = config();
    assert_eq!(
        ProfileResolver::resolve_identity(SessionKind::Ssh, "prod-web", &config).as_deref(),
        Some("Production")
    );
    assert_eq!(
        ProfileResolver::resolve_identity(SessionKind::Ssh, "staging", &config).as_deref(),
        Some("Anything")
    );
}

#[test]
fn test_identity_match_ignores_case() {
    let config = config();
    assert_eq!(
        ProfileResolver::resolve_identity(SessionKind::Ssh, "PROD-DB", &config).as_deref(),
        Some("Danger")
    );
    assert_eq!(
        ProfileResolver::resolve_identity(SessionKind::Ssh, "Prod-Cache", &config).as_deref(),
        Some("Production")
    );
}

#[test]
fn test_kind_defaults() {
    let config = RemoteConfig {
        ssh_default_profile: Some("SSH".to_string()),
        container_default_profile: Some("Container".to_string()),
        ..Default::default()
    };
    assert_eq!(
        ProfileResolver::resolve(&Session::ssh("box", PANE), &config).as_deref(),
        Some("SSH")
    );
    assert_eq!(
        ProfileResolver::resolve(&Session::container(ContainerTool::Podman, "box", PANE), &config)
            .as_deref(),
        Some("Container")
    );
}

#[test]
fn test_host_rules_apply_to_containers() {
    let config = config();
    let session = Session::container(ContainerTool::Docker, "prod-db", PANE);
    assert_eq!(ProfileResolver::resolve(&session, &config).as_deref(), Some("Danger"));
}

#[test]
fn test_key_with_same_case_beats_case_variant() {
    let config = RemoteConfig::default()
        .with_host_profile("Foo", "Upper")
        .with_host_profile("foo", "Lower");

    let resolve = |id: &str| ProfileResolver::resolve(&Session::ssh(id, PANE), &config);
    assert_eq!(resolve("foo").as_deref(), Some("Lower"));
    assert_eq!(resolve("Foo").as_deref(), Some("Upper"));
    // No key matches exactly, so the first case-insensitive key applies
    assert_eq!(resolve("FOO").as_deref(), Some("Upper"));
}

#[test]
fn test_same_case_key_without_profile_falls_back_to_case_variant() {
    let mut config = RemoteConfig::default().with_host_profile("Build", "Builders");
    config.hosts.insert("build".to_string(), HostRule::default());

    assert_eq!(
        ProfileResolver::resolve_identity(SessionKind::Ssh, "build", &config).as_deref(),
        Some("Builders")
    );
}

#[test]
fn test_unset_and_empty_rules_are_skipped() {
    let mut config = RemoteConfig {
        ssh_default_profile: Some(String::new()),
        ..Default::default()
    };
    config.hosts.insert("web".to_string(), HostRule::default());
    config.hosts.insert("web*".to_string(), HostRule::with_profile(""));
    config.set_host_profile("*", "Fallback");

    assert_eq!(
        ProfileResolver::resolve_identity(SessionKind::Ssh, "web", &config).as_deref(),
        Some("Fallback")
    );

    config.hosts.remove("*");
    assert_eq!(ProfileResolver::resolve_identity(SessionKind::Ssh, "web", &config), None);
}

#[test]
fn test_resolution_is_stable() {
    let config = config();
    let session = Session::ssh("prod-web", PANE);
    let first = ProfileResolver::resolve(&session, &config);
    for _ in 0..10 {
        assert_eq!(ProfileResolver::resolve(&session, &config), first);
    }
}

#[test]
fn test_rules_view() {
    let rules = config().rules();
    assert_eq!(
        rules,
        vec![
            ProfileRule::new(RuleScope::SshDefault, "SSH"),
            ProfileRule::new(RuleScope::ContainerDefault, "Container"),
            ProfileRule::new(RuleScope::Host("*".to_string()), "Anything"),
            ProfileRule::new(RuleScope::Host("prod-*".to_string()), "Production"),
            ProfileRule::new(RuleScope::Host("prod-db".to_string()), "Danger"),
        ]
    );
    assert!(RemoteConfig::default().rules().is_empty());
}

#[test]
fn test_config_survives_toml() {
    let config = config();
    let text = toml::to_string(&config).unwrap();
    let parsed: RemoteConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
    assert_eq!(
        ProfileResolver::resolve_identity(SessionKind::Ssh, "prod-db", &parsed).as_deref(),
        Some("Danger")
    );
}

#[test]
fn test_glob_matches() {
    assert!(glob_matches("db01.example.com", "*.example.com"));
    assert!(glob_matches("web-eu-1", "web-*-1"));
    assert!(glob_matches("anything", "*"));
    assert!(glob_matches("Exact", "exact"));
    assert!(!glob_matches("db01.example.org", "*.example.com"));
    assert!(!glob_matches("web", "web-*"));
}
