//! The launch configuration model.
//!
//! A [`LaunchConfig`] is the normalized view of operator intent, immutable
//! once parsed. Downstream components consult it directly; only the
//! namespace flag derivation turns it into kernel flags.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use crate::constants::{HOST_NAME_MAX, NIS_DOMAIN_NAME_MAX};
use crate::error::{ContainerError, Result};

/// Operator intent for a single container launch.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Host path that becomes the container's root, if filesystem isolation
    /// is requested. Implies a mount namespace.
    pub rootfs: Option<PathBuf>,
    /// Hostname inside the container. Implies a UTS namespace.
    pub hostname: Option<String>,
    /// NIS domain name inside the container. Implies a UTS namespace.
    pub domain: Option<String>,
    /// Whether to create a PID namespace.
    pub enable_pid: bool,
    /// Whether to create an IPC namespace.
    pub enable_ipc: bool,
    /// Address assigned to the container on the bridge network.
    /// Implies a network namespace.
    pub ip: Option<Ipv4Addr>,
    /// Hard memory limit in bytes. Zero means unlimited.
    pub max_ram_bytes: Option<u64>,
    /// Whether verbose logging was requested.
    pub verbose: bool,
    /// The command to exec inside the container, whitespace-separated.
    /// The first token must be an absolute path, resolved *after* the
    /// rootfs pivot.
    pub command: String,
}

impl LaunchConfig {
    /// Checks the invariants the rest of the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Config`] if the command is empty, its first
    /// token is not an absolute path, or a UTS name exceeds its kernel limit.
    pub fn validate(&self) -> Result<()> {
        let mut tokens = self.command.split_ascii_whitespace();
        match tokens.next() {
            None => {
                return Err(ContainerError::Config {
                    message: "command must not be empty".into(),
                });
            }
            Some(argv0) if !argv0.starts_with('/') => {
                return Err(ContainerError::Config {
                    message: format!("command `{argv0}` must be an absolute path"),
                });
            }
            Some(_) => {}
        }

        if let Some(hostname) = &self.hostname {
            if hostname.is_empty() || hostname.len() > HOST_NAME_MAX {
                return Err(ContainerError::Config {
                    message: format!("hostname must be 1..={HOST_NAME_MAX} bytes"),
                });
            }
        }
        if let Some(domain) = &self.domain {
            if domain.is_empty() || domain.len() > NIS_DOMAIN_NAME_MAX {
                return Err(ContainerError::Config {
                    message: format!("domain name must be 1..={NIS_DOMAIN_NAME_MAX} bytes"),
                });
            }
        }
        Ok(())
    }
}
