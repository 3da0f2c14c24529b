//! Bounded-deadline wrapper for external tool invocations.
//!
//! Every external process the pipeline spawns (pdftoppm, tesseract) goes
//! through [`run_with_deadline`] so a hung tool becomes a typed error
//! instead of blocking the request forever. On expiry the child is
//! killed and reaped.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{program} not found")]
    NotFound { program: String },
    #[error("{program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },
    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn stderr_line(&self) -> String {
        let s = String::from_utf8_lossy(&self.stderr);
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Run `cmd` to completion, killing it if it exceeds `deadline`.
///
/// stdout/stderr are drained on separate threads while the exit status
/// is polled, so a chatty child cannot deadlock on a full pipe.
pub fn run_with_deadline(mut cmd: Command, deadline: Duration) -> Result<CommandOutput, CommandError> {
    let program = cmd.get_program().to_string_lossy().into_owned();

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CommandError::NotFound {
                program: program.clone(),
            }
        } else {
            CommandError::Io {
                program: program.clone(),
                source: e,
            }
        }
    })?;

    let stdout_handle = child.stdout.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });
    let stderr_handle = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CommandError::TimedOut {
                        program,
                        secs: deadline.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(e) => {
                let _ = child.kill();
                return Err(CommandError::Io { program, source: e });
            }
        }
    };

    let stdout = stdout_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_of_quick_command() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("printf hello");
        let out = run_with_deadline(cmd, Duration::from_secs(10)).unwrap();
        assert!(out.status.success());
        assert_eq!(out.stdout, b"hello");
    }

    #[test]
    fn reports_nonzero_exit_with_stderr() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo boom >&2; exit 3");
        let out = run_with_deadline(cmd, Duration::from_secs(10)).unwrap();
        assert!(!out.status.success());
        assert_eq!(out.stderr_line(), "boom");
    }

    #[test]
    fn kills_child_on_deadline() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let start = Instant::now();
        let err = run_with_deadline(cmd, Duration::from_millis(200)).unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(matches!(err, CommandError::TimedOut { .. }));
    }

    #[test]
    fn missing_program_is_not_found() {
        let cmd = Command::new("doctext-no-such-binary");
        let err = run_with_deadline(cmd, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, CommandError::NotFound { .. }));
    }
}
