//! Logging setup
//!
//! Detection decisions are traced under the debug classes `Remote`,
//! `SSHSession` and `ContainerSession`, which double as tracing targets. A
//! host that installs its own subscriber can enable them with
//! `RUST_LOG=Remote=debug,SSHSession=debug`; hosts without one can call
//! [`init`].

use std::env;
use tracing_subscriber::EnvFilter;

/// All debug classes, in the order they appear in a detection
pub const DEBUG_CLASSES: &[&str] = &["Remote", "SSHSession", "ContainerSession"];

/// Environment variable that turns on debug output for every class
pub const DEBUG_ENV: &str = "REMOTEPANE_DEBUG";

/// Filter directives: `base` for everything, `debug` for each named class.
///
/// `classes` is a comma separated list; `all` names every class.
pub fn directives_for_debug_classes(base: &str, classes: &str) -> String {
    let mut directives = vec![base.to_string()];
    for class in classes.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if class.eq_ignore_ascii_case("all") {
            directives.extend(DEBUG_CLASSES.iter().map(|c| format!("{}=debug", c)));
        } else {
            directives.push(format!("{}=debug", class));
        }
    }
    directives.join(",")
}

/// `EnvFilter` at `info` with `debug` for the named classes
pub fn filter_for_debug_classes(classes: &str) -> EnvFilter {
    EnvFilter::try_new(directives_for_debug_classes("info", classes))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a compact fmt subscriber.
///
/// `RUST_LOG` wins when set. Returns `false` when a global subscriber was
/// already installed, which is left untouched.
pub fn init(debug: bool, classes: &str) -> bool {
    let debug = debug
        || env::var(DEBUG_ENV).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let filter = match env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) if debug => EnvFilter::new(directives_for_debug_classes("info", "all")),
        Err(_) => filter_for_debug_classes(classes),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init()
        .is_ok()
}
