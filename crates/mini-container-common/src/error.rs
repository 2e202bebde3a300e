//! Unified error types for the mini-container workspace.
//!
//! Every fallible operation in the launch pipeline reports through
//! [`ContainerError`]; the CLI binary converts it at the process boundary.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A system call failed.
    #[error("{call}: {source}")]
    Syscall {
        /// The call and arguments, `perror`-style.
        call: &'static str,
        /// Errno reported by the kernel.
        source: nix::errno::Errno,
    },

    /// A host utility (`ip`, `sysctl`, `iptables`) reported failure.
    #[error("host command `{command}` failed with {status}")]
    HostCommand {
        /// The full command line that was run.
        command: String,
        /// Exit status of the utility.
        status: ExitStatus,
    },

    /// The agent/container readiness handshake broke down.
    #[error("sync channel: {message}")]
    Sync {
        /// What went wrong on the channel.
        message: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ContainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_message() {
        let err = ContainerError::Config {
            message: "empty command".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("empty command"));
    }

    #[test]
    fn syscall_error_display_call_and_errno() {
        let err = ContainerError::Syscall {
            call: "mount(/, MS_SLAVE | MS_REC)",
            source: nix::errno::Errno::EPERM,
        };
        let msg = format!("{err}");
        assert!(msg.contains("mount(/, MS_SLAVE | MS_REC)"));
        assert!(msg.contains("Operation not permitted"));
    }

    #[test]
    fn io_error_display_path() {
        let err = ContainerError::Io {
            path: "/sys/fs/cgroup/mini_container/42".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let msg = format!("{err}");
        assert!(msg.contains("/sys/fs/cgroup/mini_container/42"));
    }

    #[test]
    fn sync_error_display_message() {
        let err = ContainerError::Sync {
            message: "agent closed the channel before signaling".into(),
        };
        assert!(format!("{err}").contains("sync channel"));
    }
}
