//! Blocking subprocess execution with captured output.

use std::io::ErrorKind;
use std::process::Command;

use crate::error::{Result, ToolchainError};

/// Run `program` with `args` and return its standard output.
///
/// Any output on standard error fails the call, whatever the exit status.
/// A missing program, or stderr mentioning "not found", is reported as
/// [`ToolchainError::NotInstalled`].
pub fn run_captured(program: &str, args: &[&str]) -> Result<String> {
    log::debug!("running {program} {}", args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => ToolchainError::NotInstalled {
                program: program.to_string(),
            },
            _ => ToolchainError::Spawn {
                program: program.to_string(),
                source,
            },
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if stderr.contains("not found") {
            return Err(ToolchainError::NotInstalled {
                program: program.to_string(),
            });
        }
        return Err(ToolchainError::Stderr {
            program: program.to_string(),
            stderr: stderr.into_owned(),
        });
    }

    if !output.status.success() {
        log::warn!("{program} exited with {}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let out = run_captured("sh", &["-c", "printf 'linux/amd64\\n'"]).unwrap();
        assert_eq!(out, "linux/amd64\n");
    }

    #[test]
    fn stderr_is_fatal_even_on_success() {
        let err = run_captured("sh", &["-c", "printf oops >&2; exit 0"]).unwrap_err();
        assert!(matches!(&err, ToolchainError::Stderr { stderr, .. } if stderr == "oops"));
        assert_eq!(err.to_string(), "oops");
    }

    #[test]
    fn not_found_in_stderr_is_not_installed() {
        let err = run_captured("sh", &["-c", "echo 'go: command not found' >&2"]).unwrap_err();
        assert!(matches!(err, ToolchainError::NotInstalled { .. }));
    }

    #[test]
    fn missing_program_is_not_installed() {
        let err = run_captured("distra-definitely-missing-binary", &[]).unwrap_err();
        assert!(matches!(
            &err,
            ToolchainError::NotInstalled { program } if program == "distra-definitely-missing-binary"
        ));
        assert!(err.to_string().contains("not installed or not on your path"));
    }

    #[test]
    fn silent_failure_still_returns_stdout() {
        let out = run_captured("sh", &["-c", "printf partial; exit 3"]).unwrap();
        assert_eq!(out, "partial");
    }
}
