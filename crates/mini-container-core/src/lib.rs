//! # mini-container-core
//!
//! The isolation-construction pipeline behind the `mini_container` binary:
//!
//! - **Namespaces**: deriving `clone(2)` flags from operator intent and
//!   applying UTS names inside the new namespace.
//! - **Launch protocol**: the namespace-creating clone, the agent/container
//!   branches, and the one-shot readiness handshake between them.
//! - **Filesystem**: the mount sequence that turns a host path into the
//!   container's root.
//! - **Network**: bridge/veth plumbing on the host side, interface and route
//!   setup inside the container.
//! - **Cgroups v2**: per-container memory limits and process placement.
//!
//! All unsafe system calls are encapsulated in safe wrappers with proper
//! error handling and `// SAFETY:` documentation.

pub mod cgroup;
pub mod exec;
pub mod filesystem;
pub mod launch;
pub mod namespace;
pub mod network;
pub mod sync;

pub use launch::launch;
