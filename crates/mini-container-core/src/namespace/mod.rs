//! Namespace selection for the container clone.
//!
//! This is the only place operator intent becomes kernel flags; everything
//! downstream consults the [`LaunchConfig`] itself, not the bitmask.

pub mod uts;

use mini_container_common::config::LaunchConfig;
use nix::sched::CloneFlags;

/// Derives the set of new namespaces the clone must create.
///
/// - a mount namespace iff a rootfs is configured,
/// - a PID namespace iff PID isolation is enabled,
/// - a UTS namespace iff a hostname or domain name is configured,
/// - an IPC namespace iff IPC isolation is enabled,
/// - a network namespace iff a container address is configured.
#[must_use]
pub fn clone_flags(config: &LaunchConfig) -> CloneFlags {
    let mut flags = CloneFlags::empty();
    if config.rootfs.is_some() {
        flags |= CloneFlags::CLONE_NEWNS;
    }
    if config.enable_pid {
        flags |= CloneFlags::CLONE_NEWPID;
    }
    if config.hostname.is_some() || config.domain.is_some() {
        flags |= CloneFlags::CLONE_NEWUTS;
    }
    if config.enable_ipc {
        flags |= CloneFlags::CLONE_NEWIPC;
    }
    if config.ip.is_some() {
        flags |= CloneFlags::CLONE_NEWNET;
    }
    flags
}

/// The full argument for the raw `clone(2)` call: the namespace flags plus
/// `SIGCHLD` so the child's termination is delivered to the agent.
#[must_use]
pub fn raw_clone_arg(config: &LaunchConfig) -> libc::c_ulong {
    clone_flags(config).bits() as libc::c_ulong | libc::SIGCHLD as libc::c_ulong
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_shape(
        rootfs: bool,
        pid: bool,
        hostname: bool,
        domain: bool,
        ipc: bool,
        ip: bool,
    ) -> LaunchConfig {
        LaunchConfig {
            rootfs: rootfs.then(|| PathBuf::from("/srv/rootfs")),
            hostname: hostname.then(|| "ctr".into()),
            domain: domain.then(|| "lan".into()),
            enable_pid: pid,
            enable_ipc: ipc,
            ip: ip.then(|| "10.0.0.2".parse().unwrap()),
            max_ram_bytes: None,
            verbose: false,
            command: "/bin/true".into(),
        }
    }

    // Every combination of intent maps to exactly the expected flag union.
    #[test]
    fn clone_flags_match_intent_exhaustively() {
        for bits in 0u8..64 {
            let rootfs = bits & 1 != 0;
            let pid = bits & 2 != 0;
            let hostname = bits & 4 != 0;
            let domain = bits & 8 != 0;
            let ipc = bits & 16 != 0;
            let ip = bits & 32 != 0;

            let config = config_shape(rootfs, pid, hostname, domain, ipc, ip);
            let flags = clone_flags(&config);

            assert_eq!(flags.contains(CloneFlags::CLONE_NEWNS), rootfs);
            assert_eq!(flags.contains(CloneFlags::CLONE_NEWPID), pid);
            assert_eq!(flags.contains(CloneFlags::CLONE_NEWUTS), hostname || domain);
            assert_eq!(flags.contains(CloneFlags::CLONE_NEWIPC), ipc);
            assert_eq!(flags.contains(CloneFlags::CLONE_NEWNET), ip);

            let mut expected = CloneFlags::empty();
            if rootfs {
                expected |= CloneFlags::CLONE_NEWNS;
            }
            if pid {
                expected |= CloneFlags::CLONE_NEWPID;
            }
            if hostname || domain {
                expected |= CloneFlags::CLONE_NEWUTS;
            }
            if ipc {
                expected |= CloneFlags::CLONE_NEWIPC;
            }
            if ip {
                expected |= CloneFlags::CLONE_NEWNET;
            }
            assert_eq!(flags, expected);
        }
    }

    #[test]
    fn raw_clone_arg_always_carries_sigchld() {
        let config = config_shape(false, false, false, false, false, false);
        assert_eq!(raw_clone_arg(&config), libc::SIGCHLD as libc::c_ulong);

        let config = config_shape(true, true, true, true, true, true);
        let arg = raw_clone_arg(&config);
        assert_eq!(
            arg & libc::SIGCHLD as libc::c_ulong,
            libc::SIGCHLD as libc::c_ulong
        );
        assert_eq!(
            arg & !(libc::SIGCHLD as libc::c_ulong),
            clone_flags(&config).bits() as libc::c_ulong
        );
    }
}
