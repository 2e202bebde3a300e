//! Container-side network setup.
//!
//! Runs after the readiness signal, while still in the host mount namespace
//! (the `ip` binary must still be resolvable), but inside the new network
//! namespace where the agent has already placed `eth0`.

use std::net::Ipv4Addr;

use mini_container_common::constants::{BRIDGE_IP, BRIDGE_PREFIX_LEN, CONTAINER_IFNAME};
use mini_container_common::error::Result;

use super::run_checked;

/// Brings up the container's interfaces and installs the default route.
///
/// Address assignment and link-up precede the route: the kernel rejects a
/// gateway route while the link carrying it is down.
///
/// # Errors
///
/// Returns an error if any step fails.
pub fn configure(ip: Ipv4Addr) -> Result<()> {
    let addr = format!("{ip}/{BRIDGE_PREFIX_LEN}");

    run_checked("ip", &["link", "set", "dev", "lo", "up"])?;
    run_checked("ip", &["addr", "add", &addr, "dev", CONTAINER_IFNAME])?;
    run_checked("ip", &["link", "set", "dev", CONTAINER_IFNAME, "up"])?;
    run_checked("ip", &["route", "add", "default", "via", BRIDGE_IP])?;

    tracing::debug!(%ip, "container network configured");
    Ok(())
}
