//! # mini_container: minimal Linux container launcher
//!
//! Runs a command inside a freshly constructed isolation envelope built from
//! namespaces, a rootfs pivot, cgroup v2 limits, and a veth-bridge network.
//! Expects root (or `CAP_SYS_ADMIN` + `CAP_NET_ADMIN`) and a pre-created
//! cgroup subtree; see `mini-container-common::constants`.

#![allow(clippy::print_stderr)]

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use mini_container_common::config::LaunchConfig;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Run a command inside namespaces, a cgroup, and its own bridge network.
#[derive(Parser, Debug)]
#[command(name = "mini_container", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Root filesystem path of the container.
    #[arg(short, long, value_name = "PATH")]
    rootfs: Option<PathBuf>,

    /// Enable PID isolation.
    #[arg(short, long)]
    pid: bool,

    /// Hostname of the container. Long-only: `-h` belongs to help.
    #[arg(long, value_name = "NAME")]
    hostname: Option<String>,

    /// NIS domain name of the container.
    #[arg(short, long, value_name = "NAME")]
    domain: Option<String>,

    /// Enable IPC isolation.
    #[arg(short, long)]
    ipc: bool,

    /// IP of the container on the 10.0.0.0/16 bridge network.
    #[arg(long, value_name = "IPV4")]
    ip: Option<Ipv4Addr>,

    /// The max amount of RAM (in bytes) the container can use.
    #[arg(short = 'R', long = "max-ram", value_name = "BYTES")]
    max_ram: Option<u64>,

    /// Command to run inside the container, with its arguments.
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

impl Cli {
    fn into_config(self) -> LaunchConfig {
        LaunchConfig {
            rootfs: self.rootfs,
            hostname: self.hostname,
            domain: self.domain,
            enable_pid: self.pid,
            enable_ipc: self.ipc,
            ip: self.ip,
            max_ram_bytes: self.max_ram,
            verbose: self.verbose,
            command: self.command.join(" "),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(default_level.into());

    // Logs go to stderr; stdout belongs to the contained command.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = cli.into_config();
    Ok(mini_container_core::launch(&config)?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.command.is_empty() {
        // Same contract as --help: print usage, exit 0.
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn parses_the_full_flag_surface() {
        let cli = Cli::try_parse_from([
            "mini_container",
            "-v",
            "-r",
            "/srv/rootfs",
            "-p",
            "--hostname",
            "ctr",
            "-d",
            "lan",
            "-i",
            "--ip",
            "10.0.0.2",
            "-R",
            "67108864",
            "/bin/echo",
            "hi",
        ])
        .unwrap();

        let config = cli.into_config();
        assert_eq!(config.rootfs.as_deref(), Some(std::path::Path::new("/srv/rootfs")));
        assert_eq!(config.hostname.as_deref(), Some("ctr"));
        assert_eq!(config.domain.as_deref(), Some("lan"));
        assert!(config.enable_pid);
        assert!(config.enable_ipc);
        assert!(config.verbose);
        assert_eq!(config.ip, Some("10.0.0.2".parse().unwrap()));
        assert_eq!(config.max_ram_bytes, Some(67_108_864));
        assert_eq!(config.command, "/bin/echo hi");
    }

    #[test]
    fn short_h_is_help_not_hostname() {
        let err = Cli::try_parse_from(["mini_container", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn command_keeps_its_own_hyphenated_arguments() {
        let cli = Cli::try_parse_from(["mini_container", "/bin/sh", "-c", "echo hi"]).unwrap();
        assert_eq!(cli.into_config().command, "/bin/sh -c echo hi");
    }

    #[test]
    fn rejects_malformed_ip() {
        assert!(Cli::try_parse_from(["mini_container", "--ip", "10.0.0", "/bin/true"]).is_err());
    }
}
