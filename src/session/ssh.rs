//! SSH session classification
//!
//! Finds the destination of an `ssh` client process by parsing its argument
//! vector the way OpenSSH's `getopt` does.

use super::classifier::{matches_by_name, Classifier};
use super::{Session, SessionKind};
use crate::host::PaneId;
use crate::platform::ProcessInfo;

const TRACE: &str = "SSHSession";

/// OpenSSH short options; a trailing `:` marks options that take a value
const SSH_OPTIONS: &str = "1246ab:c:e:fgi:kl:m:no:p:qstvxAB:CD:E:F:GI:J:KL:MNO:P:Q:R:S:TVw:W:XYy";

/// Classifies `ssh` client processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SshClassifier;

impl SshClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for SshClassifier {
    fn name(&self) -> &'static str {
        "ssh"
    }

    fn claims(&self, process: &ProcessInfo) -> bool {
        matches_by_name("ssh", process)
    }

    fn try_classify(&self, process: &ProcessInfo, pane: PaneId) -> Option<Session> {
        let args = process.argv.get(1..).unwrap_or_default();
        let Some(destination) = ssh_destination(args) else {
            debug!(target: TRACE, "no destination in ssh command line {:?}", process.argv);
            return None;
        };

        let Some(host) = host_from_destination(destination) else {
            debug!(target: TRACE, "cannot extract host from '{}'", destination);
            return None;
        };

        debug!(target: TRACE, "pid {} is an ssh session to '{}'", process.pid, host);
        Some(Session::detected(
            SessionKind::Ssh,
            host,
            pane,
            process.argv.clone(),
        ))
    }
}

/// Whether a short option takes a value, or `None` if ssh does not know it
fn option_takes_value(flag: char) -> Option<bool> {
    let idx = SSH_OPTIONS.find(flag).filter(|_| flag != ':')?;
    Some(SSH_OPTIONS[idx + flag.len_utf8()..].starts_with(':'))
}

/// First operand of an ssh command line (the destination).
///
/// Follows POSIX getopt: option parsing stops at the first operand or `--`;
/// an unknown option aborts, as ssh itself would refuse to start.
pub fn ssh_destination(args: &[String]) -> Option<&str> {
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "--" {
            return args.get(i + 1).map(String::as_str);
        }
        let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.is_empty()) else {
            return Some(arg);
        };

        for (pos, flag) in cluster.char_indices() {
            match option_takes_value(flag)? {
                true => {
                    // Value is either the rest of this cluster or the next argument
                    if pos + flag.len_utf8() == cluster.len() {
                        i += 1;
                    }
                    break;
                }
                false => continue,
            }
        }
        i += 1;
    }
    None
}

/// Host part of an ssh destination: `[user@]host` or `ssh://[user@]host[:port]`
pub fn host_from_destination(destination: &str) -> Option<String> {
    let host = match destination.strip_prefix("ssh://") {
        Some(uri) => {
            let authority = uri.split('/').next().unwrap_or(uri);
            let host_port = strip_user(authority);
            if let Some(bracketed) = host_port.strip_prefix('[') {
                bracketed.split(']').next().unwrap_or(bracketed)
            } else {
                host_port.split(':').next().unwrap_or(host_port)
            }
        }
        None => strip_user(destination),
    };

    (!host.is_empty()).then(|| host.to_string())
}

fn strip_user(target: &str) -> &str {
    target.rsplit_once('@').map_or(target, |(_, host)| host)
}
