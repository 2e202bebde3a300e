//! # mini-container-common
//!
//! Types shared across the mini-container workspace:
//! - **Errors**: the workspace-wide [`error::ContainerError`] enum.
//! - **Configuration**: the [`config::LaunchConfig`] model of operator intent.
//! - **Constants**: fixed network and cgroup parameters.

pub mod config;
pub mod constants;
pub mod error;
