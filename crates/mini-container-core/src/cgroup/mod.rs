//! Cgroups v2 resource management.
//!
//! Each launch gets its own node under [`CGROUP_ROOT`], named after the
//! child PID. The root itself must exist beforehand with the memory
//! controller enabled; the launcher only manages the per-container layer.
//!
//! The child is migrated into the node while it is still blocked on the
//! readiness channel, so the limits are in force before its first
//! instruction of user code.

pub mod memory;

use std::path::{Path, PathBuf};

use mini_container_common::constants::CGROUP_ROOT;
use mini_container_common::error::{ContainerError, Result};
use nix::unistd::Pid;

/// Path of the cgroup node for a container, `<root>/<pid>`.
#[must_use]
pub fn node_path(pid: Pid) -> PathBuf {
    PathBuf::from(CGROUP_ROOT).join(pid.as_raw().to_string())
}

/// Agent-side handle to a container's cgroup node.
///
/// Acts as a scoped guard: dropping an un-removed node attempts the rmdir
/// and logs instead of failing, so error exits after a successful create
/// still clean up.
#[derive(Debug)]
pub struct CgroupNode {
    path: PathBuf,
    removed: bool,
}

impl CgroupNode {
    /// Creates the cgroup directory for the given container.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, which includes
    /// the pre-created root being absent.
    pub fn create(pid: Pid) -> Result<Self> {
        use std::os::unix::fs::DirBuilderExt;

        let path = node_path(pid);
        std::fs::DirBuilder::new()
            .mode(0o755)
            .create(&path)
            .map_err(|e| ContainerError::Io {
                path: path.clone(),
                source: e,
            })?;
        tracing::debug!(path = %path.display(), "cgroup created");
        Ok(Self {
            path,
            removed: false,
        })
    }

    /// Applies the hard memory limit and its 75% low watermark.
    ///
    /// # Errors
    ///
    /// Returns an error if writing a control file fails.
    pub fn apply_memory_limit(&self, max_ram_bytes: u64) -> Result<()> {
        memory::set_memory_low(&self.path, memory::low_watermark(max_ram_bytes))?;
        memory::set_memory_max(&self.path, max_ram_bytes)
    }

    /// Migrates a process into this cgroup by writing its PID.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `cgroup.procs` fails.
    pub fn add_process(&self, pid: Pid) -> Result<()> {
        let procs = self.path.join("cgroup.procs");
        std::fs::write(&procs, pid.as_raw().to_string()).map_err(|e| ContainerError::Io {
            path: procs,
            source: e,
        })?;
        tracing::debug!(pid = pid.as_raw(), "process migrated into cgroup");
        Ok(())
    }

    /// Removes the node. Call after the container has been reaped; a cgroup
    /// directory can only be removed once it has no member processes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rmdir fails.
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        std::fs::remove_dir(&self.path).map_err(|e| ContainerError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), "cgroup removed");
        Ok(())
    }

    /// The node's directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CgroupNode {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(err) = std::fs::remove_dir(&self.path) {
            tracing::warn!(path = %self.path.display(), %err, "cgroup left behind");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_path_is_keyed_by_pid() {
        assert_eq!(
            node_path(Pid::from_raw(1234)),
            PathBuf::from("/sys/fs/cgroup/mini_container/1234")
        );
    }
}
