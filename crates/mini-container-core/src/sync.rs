//! The one-shot readiness channel between agent and container.
//!
//! A pipe is created before the clone so both processes inherit both ends;
//! each side then keeps only the end it uses. The agent writes a single
//! ready-or-failed token once host-side preparation (network wiring, cgroup
//! placement) is done. The container blocks on that token before any
//! in-namespace work.
//!
//! The pipe doubles as a failure detector: if the agent dies before writing,
//! the container reads EOF and aborts instead of running in a half-prepared
//! environment.

use std::fs::File;
use std::io::{Read, Write};

use mini_container_common::error::{ContainerError, Result};

const READY: u8 = 1;
const FAILED: u8 = 0;

/// Creates the channel. Call once, before the clone.
///
/// After the clone, the agent drops the [`ContainerGate`] and the container
/// drops the [`AgentSignal`], closing the unused pipe ends.
///
/// # Errors
///
/// Returns an error if `pipe(2)` fails.
pub fn channel() -> Result<(AgentSignal, ContainerGate)> {
    let (read_end, write_end) = nix::unistd::pipe().map_err(|e| ContainerError::Syscall {
        call: "pipe",
        source: e,
    })?;
    Ok((
        AgentSignal {
            fd: File::from(write_end),
        },
        ContainerGate {
            fd: File::from(read_end),
        },
    ))
}

/// Agent-held write end of the channel.
#[derive(Debug)]
pub struct AgentSignal {
    fd: File,
}

impl AgentSignal {
    /// Sends the readiness token and closes the write end.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn signal(mut self, ready: bool) -> Result<()> {
        let token = if ready { READY } else { FAILED };
        self.fd
            .write_all(&[token])
            .map_err(|e| ContainerError::Sync {
                message: format!("writing readiness token failed: {e}"),
            })
    }
}

/// Container-held read end of the channel.
#[derive(Debug)]
pub struct ContainerGate {
    fd: File,
}

impl ContainerGate {
    /// Blocks until the agent's token arrives, then closes the read end.
    ///
    /// Interrupted reads are retried.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Sync`] if the agent reported failure, closed
    /// the channel without writing (EOF), or the read failed outright.
    pub fn wait(mut self) -> Result<()> {
        let mut token = [0u8; 1];
        // read_exact retries on EINTR and reports a closed pipe as UnexpectedEof.
        self.fd
            .read_exact(&mut token)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => ContainerError::Sync {
                    message: "agent closed the channel before signaling readiness".into(),
                },
                _ => ContainerError::Sync {
                    message: format!("reading readiness token failed: {e}"),
                },
            })?;
        if token[0] != READY {
            return Err(ContainerError::Sync {
                message: "host-side preparation failed".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ready_token_unblocks_the_gate() {
        let (signal, gate) = channel().unwrap();
        signal.signal(true).unwrap();
        assert!(gate.wait().is_ok());
    }

    #[test]
    fn failure_token_aborts_the_gate() {
        let (signal, gate) = channel().unwrap();
        signal.signal(false).unwrap();
        let err = gate.wait().unwrap_err();
        assert!(format!("{err}").contains("preparation failed"));
    }

    #[test]
    fn eof_reads_as_failure() {
        let (signal, gate) = channel().unwrap();
        drop(signal);
        let err = gate.wait().unwrap_err();
        assert!(format!("{err}").contains("before signaling"));
    }

    #[test]
    fn gate_blocks_until_the_signal_arrives() {
        let (signal, gate) = channel().unwrap();
        let sender = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            signal.signal(true).unwrap();
        });
        assert!(gate.wait().is_ok());
        sender.join().unwrap();
    }
}
