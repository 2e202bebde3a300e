//! The mount sequence that turns a host path into the container's root.
//!
//! Runs in the container branch, inside the mount namespace created by the
//! clone. The sequence is ordered; reordering silently breaks isolation.
//! The two propagation changes bracket the pivot: `/` goes slave first so
//! nothing leaks back to the host, and the new root goes shared last so
//! mounts inside the container still propagate to its own children.

use std::path::Path;

use mini_container_common::error::{ContainerError, Result};
use nix::mount::{mount, MsFlags};
use nix::sched::{unshare, CloneFlags};

/// Makes `rootfs` the root of the calling process.
///
/// 1. Enter a new mount namespace (redundant when the clone already created
///    one, but harmless).
/// 2. Remount `/` recursively as `MS_SLAVE`.
/// 3. Bind-mount `rootfs` onto itself so it becomes a mount point, as
///    `MS_MOVE` requires of its source.
/// 4. `chdir` into `rootfs`.
/// 5. Move-mount `rootfs` onto `/`.
/// 6. `chroot(".")`.
/// 7. `chdir("/")`.
/// 8. Remount the new `/` recursively as `MS_SHARED`.
/// 9. Mount a fresh `proc` at `/proc` (nosuid, noexec, nodev).
///
/// # Errors
///
/// Returns an error on the first failing syscall; the caller must treat that
/// as fatal, since the mount table is then in an intermediate state.
pub fn into_rootfs(rootfs: &Path) -> Result<()> {
    tracing::debug!(rootfs = %rootfs.display(), "pivoting into rootfs");

    unshare(CloneFlags::CLONE_NEWNS).map_err(|e| ContainerError::Syscall {
        call: "unshare(CLONE_NEWNS)",
        source: e,
    })?;

    mount(
        None::<&str>,
        "/",
        None::<&str>,
        MsFlags::MS_SLAVE | MsFlags::MS_REC,
        None::<&str>,
    )
    .map_err(|e| ContainerError::Syscall {
        call: "mount(/, MS_SLAVE | MS_REC)",
        source: e,
    })?;

    mount(
        Some(rootfs),
        rootfs,
        None::<&str>,
        MsFlags::MS_BIND | MsFlags::MS_REC,
        None::<&str>,
    )
    .map_err(|e| ContainerError::Syscall {
        call: "mount(rootfs, rootfs, MS_BIND | MS_REC)",
        source: e,
    })?;

    nix::unistd::chdir(rootfs).map_err(|e| ContainerError::Syscall {
        call: "chdir(rootfs)",
        source: e,
    })?;

    mount(
        Some(rootfs),
        "/",
        None::<&str>,
        MsFlags::MS_MOVE,
        None::<&str>,
    )
    .map_err(|e| ContainerError::Syscall {
        call: "mount(rootfs, /, MS_MOVE)",
        source: e,
    })?;

    nix::unistd::chroot(".").map_err(|e| ContainerError::Syscall {
        call: "chroot(.)",
        source: e,
    })?;

    nix::unistd::chdir("/").map_err(|e| ContainerError::Syscall {
        call: "chdir(/)",
        source: e,
    })?;

    mount(
        None::<&str>,
        "/",
        None::<&str>,
        MsFlags::MS_SHARED | MsFlags::MS_REC,
        None::<&str>,
    )
    .map_err(|e| ContainerError::Syscall {
        call: "mount(/, MS_SHARED | MS_REC)",
        source: e,
    })?;

    mount(
        Some("proc"),
        "/proc",
        Some("proc"),
        MsFlags::MS_NOSUID | MsFlags::MS_NOEXEC | MsFlags::MS_NODEV,
        None::<&str>,
    )
    .map_err(|e| ContainerError::Syscall {
        call: "mount(proc, /proc)",
        source: e,
    })?;

    tracing::debug!("rootfs pivot complete");
    Ok(())
}
