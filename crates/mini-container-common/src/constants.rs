//! Fixed network and cgroup parameters.
//!
//! These are deliberately constants rather than configuration: the launcher
//! manages exactly one bridge network and one cgroup subtree, and every
//! invocation shares them. The only per-invocation key is the child PID.

/// Name of the bridge all containers attach to.
pub const BRIDGE_NAME: &str = "br0";

/// Host-side address of the bridge, also the containers' default gateway.
pub const BRIDGE_IP: &str = "10.0.0.1";

/// Prefix length of the bridge network.
pub const BRIDGE_PREFIX_LEN: u8 = 16;

/// Interface name given to the container end of the veth pair.
pub const CONTAINER_IFNAME: &str = "eth0";

/// Cgroup v2 subtree the launcher creates per-container nodes under.
///
/// Must exist before launch, with the memory controller enabled.
pub const CGROUP_ROOT: &str = "/sys/fs/cgroup/mini_container";

/// Maximum hostname length accepted, matching Linux `HOST_NAME_MAX`.
pub const HOST_NAME_MAX: usize = 64;

/// Maximum NIS domain name length accepted.
pub const NIS_DOMAIN_NAME_MAX: usize = 64;
