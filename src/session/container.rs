//! Container session classification
//!
//! Recognises interactive `docker`/`podman` invocations (`exec`, `attach`
//! and named `run`) and extracts the container they talk to.

use super::classifier::{matches_by_name, Classifier};
use super::{exec_shell_command, ContainerTool, Session, SessionKind};
use crate::host::PaneId;
use crate::platform::ProcessInfo;

const TRACE: &str = "ContainerSession";

/// Shell started when a `run` session is cloned through `exec`
const DEFAULT_SHELL: &str = "sh";

/// Global options (before the subcommand) that consume a value
const GLOBAL_VALUE_OPTIONS: &[&str] = &[
    "-H",
    "--host",
    "-c",
    "--context",
    "--config",
    "-l",
    "--log-level",
    "--tlscacert",
    "--tlscert",
    "--tlskey",
    "--connection",
    "--url",
    "--identity",
    "--root",
    "--runroot",
    "--storage-driver",
    "--cgroup-manager",
];

/// Option layout of one container subcommand
struct ArgSpec {
    /// Short options taking a value
    short_values: &'static str,
    /// Long options (without `--`) taking a value
    long_values: &'static [&'static str],
}

const EXEC_SPEC: ArgSpec = ArgSpec {
    short_values: "euw",
    long_values: &[
        "detach-keys",
        "env",
        "env-file",
        "user",
        "workdir",
        "preserve-fds",
        "preserve-fd",
    ],
};

const ATTACH_SPEC: ArgSpec = ArgSpec {
    short_values: "",
    long_values: &["detach-keys"],
};

const RUN_SPEC: ArgSpec = ArgSpec {
    short_values: "acehlmpuvw",
    long_values: &[
        "add-host",
        "attach",
        "cap-add",
        "cap-drop",
        "cidfile",
        "cpu-shares",
        "cpus",
        "detach-keys",
        "device",
        "dns",
        "entrypoint",
        "env",
        "env-file",
        "gpus",
        "hostname",
        "ip",
        "label",
        "log-driver",
        "log-opt",
        "memory",
        "mount",
        "name",
        "net",
        "network",
        "platform",
        "pod",
        "publish",
        "pull",
        "restart",
        "runtime",
        "security-opt",
        "shm-size",
        "stop-signal",
        "tmpfs",
        "ulimit",
        "user",
        "userns",
        "volume",
        "volumes-from",
        "workdir",
    ],
};

/// Result of parsing a subcommand's arguments
#[derive(Debug, Default)]
struct SubcommandArgs<'a> {
    interactive: bool,
    detach: bool,
    latest: bool,
    name: Option<&'a str>,
    /// Everything from the first operand on (container/image, then command)
    operands: &'a [String],
}

/// Classifies `docker` or `podman` client processes
#[derive(Debug, Clone, Copy)]
pub struct ContainerClassifier {
    tool: ContainerTool,
}

impl ContainerClassifier {
    pub fn new(tool: ContainerTool) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> ContainerTool {
        self.tool
    }
}

impl Classifier for ContainerClassifier {
    fn name(&self) -> &'static str {
        self.tool.as_str()
    }

    fn claims(&self, process: &ProcessInfo) -> bool {
        matches_by_name(self.tool.as_str(), process)
    }

    fn try_classify(&self, process: &ProcessInfo, pane: PaneId) -> Option<Session> {
        debug!(target: TRACE, "checking cmdline: {:?}", process.argv);

        let args = process.argv.get(1..).unwrap_or_default();
        let Some((subcommand, rest)) = find_subcommand(args) else {
            debug!(target: TRACE, "pid {} is not an interactive {} session", process.pid, self.tool);
            return None;
        };

        let kind = SessionKind::Container(self.tool);
        let session = match subcommand {
            "exec" => {
                let parsed = parse_subcommand(rest, &EXEC_SPEC);
                if !parsed.interactive {
                    debug!(target: TRACE, "{} exec without -i is not a session", self.tool);
                    return None;
                }
                if parsed.detach {
                    debug!(target: TRACE, "{} exec --detach is not a session", self.tool);
                    return None;
                }
                if parsed.latest {
                    debug!(target: TRACE, "{} exec --latest names no container", self.tool);
                    return None;
                }
                let container = parsed.operands.first()?;
                Session::detected(kind, container.clone(), pane, process.argv.clone())
            }
            "attach" => {
                let parsed = parse_subcommand(rest, &ATTACH_SPEC);
                let Some(container) = parsed.operands.first() else {
                    debug!(target: TRACE, "{} attach without container name", self.tool);
                    return None;
                };
                Session::detected(kind, container.clone(), pane, process.argv.clone())
            }
            "run" => {
                let parsed = parse_subcommand(rest, &RUN_SPEC);
                if !parsed.interactive {
                    debug!(target: TRACE, "{} run without -i is not a session", self.tool);
                    return None;
                }
                // An unnamed container gets a random name we cannot know
                let Some(name) = parsed.name.filter(|n| !n.is_empty()) else {
                    debug!(target: TRACE, "{} run without --name, giving up", self.tool);
                    return None;
                };
                let reconnect = exec_shell_command(self.tool, name, DEFAULT_SHELL);
                Session::detected(kind, name.to_string(), pane, reconnect)
            }
            _ => return None,
        };

        debug!(
            target: TRACE,
            "pid {} is a {} {} session for '{}'",
            process.pid,
            self.tool,
            subcommand,
            session.identity()
        );
        Some(session)
    }
}

/// Locate the interactive subcommand, skipping global options and the
/// `container` management command prefix.
fn find_subcommand(args: &[String]) -> Option<(&str, &[String])> {
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg.starts_with('-') {
            if GLOBAL_VALUE_OPTIONS.contains(&arg) {
                i += 1;
            }
            i += 1;
            continue;
        }
        return match arg {
            "container" => find_subcommand(&args[i + 1..]),
            "exec" | "attach" | "run" => Some((arg, &args[i + 1..])),
            _ => None,
        };
    }
    None
}

/// Parse subcommand options up to the first operand
fn parse_subcommand<'a>(args: &'a [String], spec: &ArgSpec) -> SubcommandArgs<'a> {
    let mut parsed = SubcommandArgs::default();
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_str();

        if arg == "--" {
            parsed.operands = &args[i + 1..];
            return parsed;
        }

        if let Some(long) = arg.strip_prefix("--") {
            let (key, inline) = match long.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (long, None),
            };
            if spec.long_values.contains(&key) {
                let value = match inline {
                    Some(value) => Some(value),
                    None => {
                        i += 1;
                        args.get(i).map(String::as_str)
                    }
                };
                if key == "name" {
                    parsed.name = value;
                }
            } else {
                match key {
                    "interactive" => parsed.interactive = inline != Some("false"),
                    "detach" => parsed.detach = inline != Some("false"),
                    "latest" => parsed.latest = true,
                    _ => {}
                }
            }
        } else if let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.is_empty()) {
            for (pos, flag) in cluster.char_indices() {
                if spec.short_values.contains(flag) {
                    if pos + flag.len_utf8() == cluster.len() {
                        i += 1;
                    }
                    break;
                }
                match flag {
                    'i' => parsed.interactive = true,
                    'd' => parsed.detach = true,
                    'l' => parsed.latest = true,
                    _ => {}
                }
            }
        } else {
            parsed.operands = &args[i..];
            return parsed;
        }

        i += 1;
    }

    parsed
}
