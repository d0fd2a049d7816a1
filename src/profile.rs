//! Profile Resolver
//!
//! Maps a session to the name of a host profile. Precedence, first hit wins:
//!
//! 1. A host rule whose key equals the identity, preferring a key with the
//!    same case over one that differs only in case
//! 2. The longest host rule pattern (`*` wildcards) matching the identity
//! 3. The default profile for the session kind
//!
//! Rules with an unset or empty profile name are skipped. `None` means the
//! host's own profile stays in effect.

use crate::config::{profile_name, RemoteConfig};
use crate::session::{Session, SessionKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a profile rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleScope {
    SshDefault,
    ContainerDefault,
    /// A host identity or identity pattern
    Host(String),
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleScope::SshDefault => f.write_str("ssh default"),
            RuleScope::ContainerDefault => f.write_str("container default"),
            RuleScope::Host(identity) => write!(f, "host '{}'", identity),
        }
    }
}

/// A single configured profile assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileRule {
    pub scope: RuleScope,
    pub profile_name: String,
}

impl ProfileRule {
    pub fn new(scope: RuleScope, profile_name: impl Into<String>) -> Self {
        Self {
            scope,
            profile_name: profile_name.into(),
        }
    }
}

/// Stateless profile lookup
pub struct ProfileResolver;

impl ProfileResolver {
    /// Profile for `session`, or `None` to leave the pane unmodified
    pub fn resolve(session: &Session, config: &RemoteConfig) -> Option<String> {
        Self::resolve_identity(session.kind(), session.identity(), config)
    }

    /// Profile for a session of `kind` with `identity`
    pub fn resolve_identity(
        kind: SessionKind,
        identity: &str,
        config: &RemoteConfig,
    ) -> Option<String> {
        let rules: Vec<(&str, &str)> = config
            .hosts
            .iter()
            .filter_map(|(key, rule)| profile_name(&rule.profile).map(|p| (key.as_str(), p)))
            .collect();

        let exact = config
            .hosts
            .get_key_value(identity)
            .and_then(|(key, rule)| profile_name(&rule.profile).map(|p| (key.as_str(), p)))
            .or_else(|| {
                rules
                    .iter()
                    .find(|(key, _)| !key.contains('*') && key.eq_ignore_ascii_case(identity))
                    .copied()
            });
        if let Some((key, profile)) = exact {
            trace!(target: "Remote", "'{}' matched host rule '{}'", identity, key);
            return Some(profile.to_string());
        }

        // max_by_key keeps the last maximum; iterate in reverse so the
        // first key in map order wins a tie
        let pattern = rules
            .iter()
            .rev()
            .filter(|(key, _)| key.contains('*') && glob_matches(identity, key))
            .max_by_key(|(key, _)| key.len());
        if let Some((key, profile)) = pattern {
            trace!(target: "Remote", "'{}' matched host pattern '{}'", identity, key);
            return Some(profile.to_string());
        }

        let default = match kind {
            SessionKind::Ssh => &config.ssh_default_profile,
            SessionKind::Container(_) => &config.container_default_profile,
        };
        let resolved = profile_name(default).map(str::to_string);
        trace!(
            target: "Remote",
            "'{}' uses the {} default profile: {:?}",
            identity,
            kind,
            resolved
        );
        resolved
    }
}

/// Case-insensitive glob match where `*` matches any run of characters
pub fn glob_matches(value: &str, pattern: &str) -> bool {
    let value = value.to_lowercase();
    let pattern = pattern.to_lowercase();

    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();
    let Some(mut rest) = value.strip_prefix(first) else {
        return false;
    };

    let segments: Vec<&str> = parts.collect();
    let Some((last, middle)) = segments.split_last() else {
        // No wildcard at all
        return rest.is_empty();
    };

    for segment in middle {
        match rest.find(segment) {
            Some(idx) => rest = &rest[idx + segment.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}
