//! UTS names: hostname and NIS domain name.
//!
//! The setters run in the container branch after the clone, so they only
//! touch the new UTS namespace. The getters exist for identity logging on
//! both sides.

use mini_container_common::constants::NIS_DOMAIN_NAME_MAX;
use mini_container_common::error::{ContainerError, Result};
use nix::errno::Errno;

/// Applies the configured UTS names inside the container.
///
/// Either name may be absent independently; an absent name leaves the value
/// inherited from the host namespace untouched.
///
/// # Errors
///
/// Returns an error if `sethostname(2)` or `setdomainname(2)` fails.
pub fn apply(hostname: Option<&str>, domain: Option<&str>) -> Result<()> {
    if let Some(hostname) = hostname {
        set_hostname(hostname)?;
    }
    if let Some(domain) = domain {
        set_domain_name(domain)?;
    }
    Ok(())
}

/// Sets the hostname of the current UTS namespace.
///
/// # Errors
///
/// Returns an error if `sethostname(2)` fails.
pub fn set_hostname(hostname: &str) -> Result<()> {
    nix::unistd::sethostname(hostname).map_err(|e| ContainerError::Syscall {
        call: "sethostname",
        source: e,
    })?;
    tracing::debug!(hostname, "hostname set");
    Ok(())
}

/// Sets the NIS domain name of the current UTS namespace.
///
/// `nix` has no wrapper for `setdomainname(2)`, so this goes through `libc`.
///
/// # Errors
///
/// Returns an error if `setdomainname(2)` fails.
pub fn set_domain_name(domain: &str) -> Result<()> {
    // SAFETY: the pointer and length describe a live, initialized buffer for
    // the duration of the call; the kernel copies the bytes out.
    let res = unsafe { libc::setdomainname(domain.as_ptr().cast(), domain.len()) };
    Errno::result(res).map_err(|e| ContainerError::Syscall {
        call: "setdomainname",
        source: e,
    })?;
    tracing::debug!(domain, "NIS domain name set");
    Ok(())
}

/// Reads the hostname of the current UTS namespace.
///
/// # Errors
///
/// Returns an error if `gethostname(2)` fails.
pub fn hostname() -> Result<String> {
    let name = nix::unistd::gethostname().map_err(|e| ContainerError::Syscall {
        call: "gethostname",
        source: e,
    })?;
    Ok(name.to_string_lossy().into_owned())
}

/// Reads the NIS domain name of the current UTS namespace.
///
/// # Errors
///
/// Returns an error if `getdomainname(2)` fails.
pub fn domain_name() -> Result<String> {
    let mut buf = [0u8; NIS_DOMAIN_NAME_MAX];
    // SAFETY: the pointer and length describe a live, writable buffer; the
    // kernel nul-terminates names shorter than the buffer.
    let res = unsafe { libc::getdomainname(buf.as_mut_ptr().cast(), buf.len()) };
    Errno::result(res).map_err(|e| ContainerError::Syscall {
        call: "getdomainname",
        source: e,
    })?;
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hostname_is_readable() {
        // The getter must work unprivileged; the value is whatever the host has.
        let name = hostname().unwrap();
        assert!(!name.is_empty());
    }

    #[test]
    fn domain_name_is_readable() {
        // Often "(none)" on hosts without NIS; only the call itself is under test.
        let _ = domain_name().unwrap();
    }
}
