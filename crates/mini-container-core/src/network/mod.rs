//! Bridge/veth network plumbing.
//!
//! Implemented by shelling out to `ip`, `sysctl`, and `iptables`, the same
//! commands an operator would type. [`host`] runs in the agent before the
//! readiness signal; [`container`] runs in the container after it.

pub mod container;
pub mod host;

use std::process::Command;

use mini_container_common::constants::{BRIDGE_IP, BRIDGE_PREFIX_LEN};
use mini_container_common::error::{ContainerError, Result};
use nix::unistd::Pid;

/// Host-side veth interface name for a container, keyed by its PID.
#[must_use]
pub fn veth_name(pid: Pid) -> String {
    format!("veth{}", pid.as_raw())
}

/// The bridge address in CIDR form, `10.0.0.1/16`.
#[must_use]
pub fn bridge_cidr() -> String {
    format!("{BRIDGE_IP}/{BRIDGE_PREFIX_LEN}")
}

fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Runs a host utility, treating a non-zero exit as an error.
pub(crate) fn run_checked(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| ContainerError::Io {
            path: program.into(),
            source: e,
        })?;
    if !status.success() {
        return Err(ContainerError::HostCommand {
            command: command_line(program, args),
            status,
        });
    }
    Ok(())
}

/// Runs a host utility whose failure means the state already exists.
///
/// Used for bridge creation and bridge address assignment, which are not
/// errors when an earlier launch set them up.
pub(crate) fn run_unchecked(program: &str, args: &[&str]) {
    match Command::new(program).args(args).status() {
        Ok(status) if status.success() => {}
        Ok(status) => {
            tracing::debug!(
                command = %command_line(program, args),
                %status,
                "ignoring failure of idempotent command"
            );
        }
        Err(err) => {
            tracing::debug!(
                command = %command_line(program, args),
                %err,
                "ignoring spawn failure of idempotent command"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn veth_name_is_keyed_by_pid() {
        assert_eq!(veth_name(Pid::from_raw(4321)), "veth4321");
    }

    #[test]
    fn bridge_cidr_uses_the_fixed_constants() {
        assert_eq!(bridge_cidr(), "10.0.0.1/16");
    }

    #[test]
    fn run_checked_reports_nonzero_exit() {
        let err = run_checked("false", &[]).unwrap_err();
        assert!(format!("{err}").contains("`false`"));
    }

    #[test]
    fn run_checked_accepts_zero_exit() {
        assert!(run_checked("true", &[]).is_ok());
    }
}
