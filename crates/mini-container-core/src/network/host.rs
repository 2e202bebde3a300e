//! Agent-side network preparation.
//!
//! Mutates global host state: the bridge, the forwarding sysctl, and the NAT
//! rule are shared by all launches; only the veth pair is per-container.
//! Runs before the readiness signal so the container finds its `eth0`
//! already present when it starts its own setup.

use mini_container_common::constants::{BRIDGE_NAME, CONTAINER_IFNAME};
use mini_container_common::error::Result;
use nix::unistd::Pid;

use super::{bridge_cidr, run_checked, run_unchecked, veth_name};

/// Wires the host side of the container network.
///
/// Creates the bridge (tolerating pre-existence), brings it up, assigns its
/// address (tolerating pre-existence), creates the veth pair with the peer
/// end placed directly into the child's network namespace, enslaves the host
/// end to the bridge, enables IPv4 forwarding, and installs the MASQUERADE
/// rule for the bridge network.
///
/// # Errors
///
/// Returns an error if any non-idempotent step fails.
pub fn prepare(child: Pid) -> Result<()> {
    let pid = child.as_raw().to_string();
    let veth = veth_name(child);
    let cidr = bridge_cidr();

    run_unchecked("ip", &["link", "add", "name", BRIDGE_NAME, "type", "bridge"]);
    run_checked("ip", &["link", "set", BRIDGE_NAME, "up"])?;
    run_unchecked("ip", &["addr", "add", &cidr, "brd", "+", "dev", BRIDGE_NAME]);

    run_checked(
        "ip",
        &[
            "link", "add", &veth, "type", "veth", "peer", "name", CONTAINER_IFNAME, "netns", &pid,
        ],
    )?;
    run_checked("ip", &["link", "set", &veth, "up"])?;
    run_checked("ip", &["link", "set", &veth, "master", BRIDGE_NAME])?;

    run_checked("sysctl", &["-w", "net.ipv4.ip_forward=1"])?;
    run_checked(
        "iptables",
        &["-t", "nat", "-A", "POSTROUTING", "-s", &cidr, "-j", "MASQUERADE"],
    )?;

    tracing::debug!(veth, "host network prepared");
    Ok(())
}
