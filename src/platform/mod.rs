//! Platform abstraction layer
//!
//! Process table access differs between Linux (`/proc`) and macOS (`ps`).
//! Platforms without an implementation get a process tree that always
//! reports an error, which detection treats as "no evidence".

mod traits;
#[cfg(unix)]
mod unix;

pub use traits::*;

/// Platform implementation factory
pub struct Platform;

impl Platform {
    /// Get the platform-specific process tree operations
    pub fn process_tree() -> Box<dyn ProcessTreeOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixProcessTree::new())
        }

        #[cfg(not(unix))]
        {
            Box::new(UnsupportedProcessTree)
        }
    }
}

#[cfg(not(unix))]
struct UnsupportedProcessTree;

#[cfg(not(unix))]
impl ProcessTreeOps for UnsupportedProcessTree {
    fn get_child_pids(&self, _parent_pid: u32) -> crate::error::Result<Vec<u32>> {
        Err(unsupported())
    }

    fn process_info(&self, _pid: u32) -> crate::error::Result<ProcessInfo> {
        Err(unsupported())
    }

    fn is_process_running(&self, _pid: u32) -> bool {
        false
    }
}

#[cfg(not(unix))]
fn unsupported() -> crate::error::Error {
    std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "process inspection is not supported on this platform",
    )
    .into()
}
