//! Configuration for remotepane
//!
//! A small schema: two feature switches, two per-kind default profiles and a
//! table of host rules keyed by identity (hostname or container name, glob
//! patterns allowed). Loaded from TOML or JSON by [`loader::ConfigLoader`].

pub mod loader;

use crate::profile::{ProfileRule, RuleScope};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Host rule with empty identity")]
    EmptyHostIdentity,

    #[error("Invalid boolean value '{0}' (expected true or false)")]
    InvalidBool(String),

    #[error("Blank profile name for {0}")]
    EmptyProfileName(String),

    #[error("No configuration file found")]
    NotFound,

    #[error("Failed to parse {format} configuration: {reason}")]
    ParseFailed { format: String, reason: String },

    #[error("Failed to serialize {format} configuration: {reason}")]
    SerializationFailed { format: String, reason: String },
}

/// Plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Clone the remote session into every pane split off a remote pane
    #[serde(default, deserialize_with = "bool_or_string")]
    pub auto_clone: bool,

    /// Infer and restore the working directory when cloning
    #[serde(default = "default_true", deserialize_with = "bool_or_string")]
    pub infer_cwd: bool,

    /// Profile for ssh sessions without a matching host rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_default_profile: Option<String>,

    /// Profile for container sessions without a matching host rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_default_profile: Option<String>,

    /// Rules keyed by identity or identity pattern
    #[serde(default)]
    pub hosts: BTreeMap<String, HostRule>,
}

/// Per-host settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRule {
    /// Profile to apply; unset falls back to the kind default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl HostRule {
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: Some(profile.into()),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            auto_clone: false,
            infer_cwd: true,
            ssh_default_profile: None,
            container_default_profile: None,
            hosts: BTreeMap::new(),
        }
    }
}

impl RemoteConfig {
    /// Add or replace the rule for `identity`
    pub fn set_host_profile(&mut self, identity: impl Into<String>, profile: impl Into<String>) {
        self.hosts
            .insert(identity.into(), HostRule::with_profile(profile));
    }

    /// Builder form of [`set_host_profile`](Self::set_host_profile)
    pub fn with_host_profile(
        mut self,
        identity: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        self.set_host_profile(identity, profile);
        self
    }

    /// The configuration as profile rules: kind defaults first, then host
    /// rules in identity order. Unset or empty profile names produce no rule.
    pub fn rules(&self) -> Vec<ProfileRule> {
        let defaults = [
            (RuleScope::SshDefault, &self.ssh_default_profile),
            (RuleScope::ContainerDefault, &self.container_default_profile),
        ];
        let hosts = self
            .hosts
            .iter()
            .map(|(identity, rule)| (RuleScope::Host(identity.clone()), &rule.profile));

        defaults
            .into_iter()
            .chain(hosts)
            .filter_map(|(scope, profile)| {
                profile_name(profile).map(|name| ProfileRule::new(scope, name))
            })
            .collect()
    }

    /// Check the configuration for malformed rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("ssh_default_profile", &self.ssh_default_profile),
            ("container_default_profile", &self.container_default_profile),
        ];
        for (key, profile) in named {
            check_profile_name(key, profile)?;
        }

        for (identity, rule) in &self.hosts {
            if identity.trim().is_empty() {
                return Err(ConfigError::EmptyHostIdentity);
            }
            check_profile_name(&format!("host '{}'", identity), &rule.profile)?;
        }

        Ok(())
    }
}

/// A configured profile name; `None` and `""` both mean "not configured"
pub(crate) fn profile_name(profile: &Option<String>) -> Option<&str> {
    profile.as_deref().filter(|name| !name.is_empty())
}

/// `""` is accepted as unset, but a name made of blanks is a typo
fn check_profile_name(scope: &str, profile: &Option<String>) -> Result<(), ConfigError> {
    match profile_name(profile) {
        Some(name) if name.trim().is_empty() => {
            Err(ConfigError::EmptyProfileName(scope.to_string()))
        }
        _ => Ok(()),
    }
}

fn default_true() -> bool {
    true
}

/// Parse a boolean stored as text
pub fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidBool(value.to_string())),
    }
}

/// Accept `true` as well as `"True"`, as older configs store booleans as text
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Text(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(value) => Ok(value),
        BoolOrString::Text(text) => parse_bool(&text).map_err(de::Error::custom),
    }
}
