//! Tokenizing the user command and replacing the container image.

use std::convert::Infallible;
use std::ffi::CString;

use mini_container_common::error::{ContainerError, Result};

/// Splits a command line into argv tokens on ASCII whitespace.
///
/// No quoting or escaping: `"a  b\tc"` is exactly `["a", "b", "c"]`.
#[must_use]
pub fn tokenize(command: &str) -> Vec<String> {
    command.split_ascii_whitespace().map(String::from).collect()
}

/// Replaces the current process image with the user command via `execv(2)`.
///
/// The program path is `argv[0]`, resolved in the container's own root; no
/// `PATH` lookup is performed.
///
/// # Errors
///
/// Only returns on failure: an empty command, a token containing a NUL
/// byte, or a failed `execv`.
pub fn run(command: &str) -> Result<Infallible> {
    let tokens = tokenize(command);
    if tokens.is_empty() {
        return Err(ContainerError::Config {
            message: "command must not be empty".into(),
        });
    }

    let argv = tokens
        .into_iter()
        .map(CString::new)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| ContainerError::Config {
            message: "command contains a NUL byte".into(),
        })?;

    tracing::debug!(command, "replacing process image");
    nix::unistd::execv(&argv[0], &argv).map_err(|e| ContainerError::Syscall {
        call: "execv",
        source: e,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_any_ascii_whitespace() {
        assert_eq!(tokenize("a  b\tc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn tokenize_handles_leading_and_trailing_whitespace() {
        assert_eq!(tokenize("  /bin/echo hi "), vec!["/bin/echo", "hi"]);
    }

    #[test]
    fn tokenize_of_blank_input_is_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t ").is_empty());
    }

    #[test]
    fn run_rejects_empty_command() {
        assert!(run("   ").is_err());
    }

    #[test]
    fn run_reports_exec_failure() {
        let err = run("/nonexistent-program-for-test").unwrap_err();
        assert!(format!("{err}").contains("execv"));
    }
}
