//! The two-process launch protocol.
//!
//! One namespace-creating `clone(2)` splits the launcher into the **agent**
//! (parent) and the **container** (child). The agent wires host networking,
//! creates the cgroup, and migrates the still-blocked child into it before
//! releasing the child through the readiness channel. The container waits on
//! that channel, then builds its in-namespace environment and execs the user
//! command. The agent reaps the child and tears the cgroup down.
//!
//! ```text
//! agent:     clone ─ network(host) ─ cgroup ─ signal ─ waitpid ─ teardown
//! container: clone ─ wait ─ network(ns) ─ pivot ─ uts ─ execv
//! ```

use std::convert::Infallible;

use mini_container_common::config::LaunchConfig;
use mini_container_common::error::{ContainerError, Result};
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::Pid;

use crate::cgroup::CgroupNode;
use crate::sync::{AgentSignal, ContainerGate};
use crate::{exec, filesystem, namespace, network, sync};

/// Which side of the clone the current process is.
enum Branch {
    Agent { child: Pid },
    Container,
}

/// Forks the launcher into agent and container with all requested
/// namespaces created atomically with the child.
///
/// The raw syscall is used because the libc wrapper demands a fresh stack
/// for the child, while the fork-like form (child continuing at the next
/// instruction on a copy of the current stack) has no wrapper. No stack,
/// TID, or TLS arguments are passed.
fn clone_into_namespaces(config: &LaunchConfig) -> Result<Branch> {
    let flags = namespace::raw_clone_arg(config);
    // SAFETY: with a null stack pointer the child runs on a copy-on-write
    // copy of the parent's stack, exactly like fork(2); no CLONE_VM, no
    // CLONE_SETTLS, and no TID pointers are requested, so the remaining
    // arguments may be null. The x86-64 argument order is
    // (flags, stack, parent_tid, child_tid, tls).
    let rc = unsafe { libc::syscall(libc::SYS_clone, flags, 0usize, 0usize, 0usize, 0usize) };
    match rc {
        -1 => Err(ContainerError::Syscall {
            call: "clone",
            source: Errno::last(),
        }),
        0 => Ok(Branch::Container),
        pid => Ok(Branch::Agent {
            child: Pid::from_raw(pid as libc::pid_t),
        }),
    }
}

/// Runs the full launch protocol and returns the exit code to propagate.
///
/// Returns only in the agent: the container branch either becomes the user
/// command via `execv` or exits the process with a non-zero status.
///
/// # Errors
///
/// Returns an error if validation, the clone, host-side preparation, the
/// readiness write, or the wait fails.
pub fn launch(config: &LaunchConfig) -> Result<i32> {
    config.validate()?;

    // Both processes inherit both ends; each branch drops the one it
    // does not use.
    let (signal, gate) = sync::channel()?;

    match clone_into_namespaces(config)? {
        Branch::Container => {
            drop(signal);
            container_branch(config, gate)
        }
        Branch::Agent { child } => {
            drop(gate);
            agent_branch(config, child, signal)
        }
    }
}

/// Container side: wait for the agent, then network, filesystem, UTS, exec.
///
/// Never returns. Each stage depends on its predecessors: the route needs
/// the link the agent created, the `/proc` mount needs the pivot, and the
/// exec resolves `argv[0]` in the pivoted root.
fn container_branch(config: &LaunchConfig, gate: ContainerGate) -> ! {
    match run_container(config, gate) {
        Err(err) => {
            tracing::error!(%err, "container setup failed");
            std::process::exit(1);
        }
        Ok(never) => match never {},
    }
}

fn run_container(config: &LaunchConfig, gate: ContainerGate) -> Result<Infallible> {
    tracing::debug!("waiting for agent to finish host-side preparation");
    gate.wait()?;

    if let Some(ip) = config.ip {
        network::container::configure(ip)?;
    }
    if let Some(rootfs) = &config.rootfs {
        filesystem::pivot::into_rootfs(rootfs)?;
    }
    namespace::uts::apply(config.hostname.as_deref(), config.domain.as_deref())?;

    tracing::debug!(
        hostname = %namespace::uts::hostname()?,
        domain = %namespace::uts::domain_name()?,
        command = %config.command,
        "container identity"
    );
    exec::run(&config.command)
}

/// Agent side: host preparation, readiness signal, supervision, teardown.
///
/// The wait is unconditional: once the clone has happened the agent owns the
/// child, and a host-side preparation failure only changes the token it
/// sends. The child reads `false`, aborts, and is still reaped here; the
/// preparation error becomes the agent's return value after that.
fn agent_branch(config: &LaunchConfig, child: Pid, signal: AgentSignal) -> Result<i32> {
    tracing::debug!(
        child = child.as_raw(),
        agent = nix::unistd::getpid().as_raw(),
        hostname = %namespace::uts::hostname()?,
        domain = %namespace::uts::domain_name()?,
        "agent identity"
    );

    let prepared = prepare_host(config, child);
    match &prepared {
        Ok(_) => signal.signal(true)?,
        Err(_) => {
            // Best effort: EOF carries the same abort semantics to the child.
            if let Err(sync_err) = signal.signal(false) {
                tracing::warn!(%sync_err, "failed to signal preparation failure");
            }
        }
    }

    let code = supervise(child)?;
    tracing::info!(code, "container exited");

    let cgroup = prepared?;
    if let Err(err) = cgroup.remove() {
        tracing::warn!(%err, "cgroup teardown failed");
    }
    Ok(code)
}

/// Host-side preparation, all of it before the child runs a single
/// instruction of its own setup: network wiring keyed by the child PID, then
/// the cgroup node the still-blocked child is migrated into.
fn prepare_host(config: &LaunchConfig, child: Pid) -> Result<CgroupNode> {
    if config.ip.is_some() {
        tracing::debug!("preparing container network");
        network::host::prepare(child)?;
    }

    let cgroup = CgroupNode::create(child)?;
    if let Some(max_ram_bytes) = config.max_ram_bytes {
        if max_ram_bytes > 0 {
            cgroup.apply_memory_limit(max_ram_bytes)?;
        }
    }
    cgroup.add_process(child)?;
    Ok(cgroup)
}

/// Blocks until the container terminates and maps its wait status to the
/// tool's exit code. Interrupted waits are retried.
fn supervise(child: Pid) -> Result<i32> {
    loop {
        match waitpid(child, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(128 + signal as i32),
            Ok(_) => {}
            Err(Errno::EINTR) => {}
            Err(e) => {
                return Err(ContainerError::Syscall {
                    call: "waitpid",
                    source: e,
                })
            }
        }
    }
}
