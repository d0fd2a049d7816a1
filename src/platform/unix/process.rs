//! Unix process tree operations

use crate::error::{Error, Result};
use crate::platform::traits::{ProcessInfo, ProcessTreeOps};
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
#[cfg(not(target_os = "macos"))]
use std::fs;
use std::io;

pub struct UnixProcessTree;

impl UnixProcessTree {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTreeOps for UnixProcessTree {
    fn get_child_pids(&self, parent_pid: u32) -> Result<Vec<u32>> {
        #[cfg(target_os = "macos")]
        {
            self.get_child_pids_macos(parent_pid)
        }

        #[cfg(not(target_os = "macos"))]
        {
            self.get_child_pids_linux(parent_pid)
        }
    }

    fn process_info(&self, pid: u32) -> Result<ProcessInfo> {
        #[cfg(target_os = "macos")]
        {
            self.process_info_macos(pid)
        }

        #[cfg(not(target_os = "macos"))]
        {
            self.process_info_linux(pid)
        }
    }

    fn is_process_running(&self, pid: u32) -> bool {
        // kill() reads 0 and negative pids as process groups
        let Some(pid) = i32::try_from(pid).ok().filter(|pid| *pid > 0) else {
            return false;
        };
        // Signal 0 only checks for existence; EPERM still means "exists"
        matches!(kill(Pid::from_raw(pid), None), Ok(()) | Err(Errno::EPERM))
    }
}

impl UnixProcessTree {
    /// Get child PIDs on Linux using /proc filesystem
    #[cfg(not(target_os = "macos"))]
    fn get_child_pids_linux(&self, parent_pid: u32) -> Result<Vec<u32>> {
        let mut children = Vec::new();

        let proc_dir = fs::read_dir("/proc").map_err(Error::Io)?;

        for entry in proc_dir.flatten() {
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            let Ok(pid) = file_name.parse::<u32>() else {
                continue;
            };
            // Processes may exit while we scan; skip unreadable entries
            if let Ok(stat_content) = fs::read_to_string(format!("/proc/{}/stat", pid)) {
                if let Some(stat) = parse_stat(&stat_content) {
                    if stat.ppid == parent_pid {
                        children.push(pid);
                    }
                }
            }
        }

        Ok(children)
    }

    #[cfg(not(target_os = "macos"))]
    fn process_info_linux(&self, pid: u32) -> Result<ProcessInfo> {
        let stat_content = fs::read_to_string(format!("/proc/{}/stat", pid))?;
        let stat = parse_stat(&stat_content).ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed /proc/{}/stat", pid),
            ))
        })?;

        // cmdline is empty for zombies and kernel threads
        let argv = fs::read(format!("/proc/{}/cmdline", pid))
            .map(|raw| split_cmdline(&raw))
            .unwrap_or_default();

        // exe is unreadable for other users' processes
        let executable = fs::read_link(format!("/proc/{}/exe", pid)).ok();

        Ok(ProcessInfo {
            pid,
            ppid: stat.ppid,
            name: stat.comm,
            executable,
            argv,
            start_time: stat.start_time,
        })
    }

    /// Get child PIDs on macOS using ps command
    #[cfg(target_os = "macos")]
    fn get_child_pids_macos(&self, parent_pid: u32) -> Result<Vec<u32>> {
        let output = run_ps(&["-axo", "pid=,ppid="])?;

        let mut children = Vec::new();
        for line in output.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 2 {
                if let (Ok(pid), Ok(ppid)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                    if ppid == parent_pid {
                        children.push(pid);
                    }
                }
            }
        }

        Ok(children)
    }

    #[cfg(target_os = "macos")]
    fn process_info_macos(&self, pid: u32) -> Result<ProcessInfo> {
        use std::path::PathBuf;
        use std::time::{SystemTime, UNIX_EPOCH};

        let pid_arg = pid.to_string();
        let summary = run_ps(&["-o", "ppid=,etime=,comm=", "-p", &pid_arg])?;
        let mut fields = summary.split_whitespace();
        let ppid = fields
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| no_such_process(pid))?;
        let elapsed = fields.next().and_then(parse_etime).unwrap_or(0);
        let comm = fields.collect::<Vec<_>>().join(" ");

        // ps cannot recover the original argv boundaries; whitespace split is
        // good enough for option parsing of ssh/docker/podman
        let args = run_ps(&["-ww", "-o", "args=", "-p", &pid_arg])?;
        let argv = args.split_whitespace().map(str::to_string).collect();

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let name = comm.rsplit('/').next().unwrap_or(&comm).to_string();
        let executable = comm.starts_with('/').then(|| PathBuf::from(&comm));

        Ok(ProcessInfo {
            pid,
            ppid,
            name,
            executable,
            argv,
            start_time: now.saturating_sub(elapsed),
        })
    }
}

impl Default for UnixProcessTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "macos")]
fn run_ps(args: &[&str]) -> Result<String> {
    use std::process::Command;

    let output = Command::new("ps").args(args).output().map_err(|e| {
        Error::Io(io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to run ps: {}", e),
        ))
    })?;

    if !output.status.success() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "ps command failed",
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(target_os = "macos")]
fn no_such_process(pid: u32) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such process {}", pid),
    ))
}

/// Parse `ps` elapsed time (`[[dd-]hh:]mm:ss`) into seconds
#[cfg(any(target_os = "macos", test))]
fn parse_etime(etime: &str) -> Option<u64> {
    let (days, clock) = match etime.split_once('-') {
        Some((d, rest)) => (d.parse::<u64>().ok()?, rest),
        None => (0, etime),
    };

    let mut seconds = 0u64;
    for part in clock.split(':') {
        seconds = seconds * 60 + part.parse::<u64>().ok()?;
    }

    Some(days * 86_400 + seconds)
}

/// Fields of interest from /proc/[pid]/stat
#[cfg(not(target_os = "macos"))]
#[derive(Debug, PartialEq, Eq)]
struct ProcStat {
    comm: String,
    ppid: u32,
    start_time: u64,
}

/// Parse /proc/[pid]/stat content
///
/// The format is `pid (comm) state ppid ...` where comm can contain spaces
/// and parentheses, so fields are counted from the last `)`.
#[cfg(not(target_os = "macos"))]
fn parse_stat(stat_content: &str) -> Option<ProcStat> {
    let open_paren = stat_content.find('(')?;
    let close_paren = stat_content.rfind(')')?;
    if close_paren < open_paren {
        return None;
    }

    let comm = stat_content[open_paren + 1..close_paren].to_string();
    let parts: Vec<&str> = stat_content[close_paren + 1..].split_whitespace().collect();

    // parts[0] is field 3 (state); ppid is field 4, starttime field 22
    let ppid = parts.get(1)?.parse::<u32>().ok()?;
    let start_time = parts.get(19).and_then(|s| s.parse::<u64>().ok()).unwrap_or(0);

    Some(ProcStat {
        comm,
        ppid,
        start_time,
    })
}

/// Split NUL-separated /proc/[pid]/cmdline content into arguments
#[cfg(not(target_os = "macos"))]
fn split_cmdline(raw: &[u8]) -> Vec<String> {
    raw.split(|b| *b == 0)
        .filter(|arg| !arg.is_empty())
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect()
}
