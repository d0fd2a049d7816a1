//! remotepane - remote session awareness for terminal multiplexers
//!
//! Detects ssh and container (`docker`/`podman`) sessions running inside a
//! terminal pane, clones them into new panes and picks a display profile per
//! remote host.
//!
//! ## Module Organization
//!
//! ### Detection
//!
//! - [`scraper`] - Pane text snapshots and working directory inference
//! - [`process`] - Process tree walking below a pane's shell
//! - [`session`] - Session model and the ssh/container classifier chain
//!
//! ### Actions
//!
//! - [`profile`] - Host rule and default profile resolution
//! - [`clone`] - Re-establishing a session in another pane
//! - [`watch`] - Applying and restoring profiles as sessions come and go
//! - [`bindings`] - Menu and split event glue
//!
//! ### Support
//!
//! - [`host`] - The interface consumed from the multiplexer
//! - [`config`] - Configuration schema and loader
//! - [`platform`] - Process table access per operating system
//! - [`logging`] - Debug class filters
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! // Build the plugin once at startup, then forward host events to it
//! let plugin = remotepane::init();
//! println!("clone on split: {}", plugin.auto_clone());
//! ```
//!
//! ## Threading
//!
//! Everything runs synchronously on the host's event thread. Detection only
//! reads local state (the process table and the pane buffer) and never talks
//! to the network; the reconnect itself runs in the new pane's own process.

#![allow(unexpected_cfgs)]

#[macro_use]
extern crate tracing;

pub mod bindings;
pub mod clone;
pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod logging;
pub mod platform;
pub mod process;
pub mod profile;
pub mod scraper;
pub mod session;
pub mod shell_quote;
pub mod watch;

// Re-exports for core functionality
pub use bindings::Remote;
pub use clone::{CloneError, CloneOrchestrator, CloneRequest, ClonedPane};
pub use config::{HostRule, RemoteConfig};
pub use context::RemoteContext;
pub use error::{DetectionGap, Error, Result};
pub use host::{Host, HostError, HostEvent, MenuAction, MenuItem, PaneId, SplitDirection};
pub use profile::{ProfileResolver, ProfileRule, RuleScope};
pub use session::{ContainerTool, Session, SessionClassifier, SessionKind};
pub use watch::{ProfileChange, ProfileWatcher};

// Convenience re-exports for common types
pub use config::loader::ConfigLoader;
pub use process::ProcessInspector;
pub use scraper::{TextScraper, TextSnapshot};

// Version information
/// The current version of remotepane from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The crate name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The crate description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build the plugin from the default configuration locations.
///
/// A configuration that cannot be read or is invalid is reported and
/// replaced by the defaults, so the host always gets a working plugin. Use
/// [`init_with_config`] to see configuration errors.
pub fn init() -> Remote {
    info!(target: "Remote", "initializing {} v{}", NAME, VERSION);

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(target: "Remote", "failed to load configuration: {}. Using defaults", e);
            RemoteConfig::default()
        }
    };

    Remote::new(RemoteContext::new(config))
}

/// Build the plugin from a specific configuration file
///
/// # Errors
///
/// Fails when the file cannot be read, parsed or validated.
pub fn init_with_config(config_path: &std::path::Path) -> Result<Remote> {
    info!(
        target: "Remote",
        "initializing {} v{} with config: {}",
        NAME,
        VERSION,
        config_path.display()
    );

    let config = ConfigLoader::load_from_path(config_path).map_err(|e| {
        error!(
            target: "Remote",
            "failed to load configuration from {}: {}",
            config_path.display(),
            e
        );
        e
    })?;

    Ok(Remote::new(RemoteContext::new(config)))
}
