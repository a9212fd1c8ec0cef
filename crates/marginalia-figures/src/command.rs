//! External program execution with a time limit.
//!
//! Output pipes are drained on background threads so a chatty program
//! (`pdflatex` writes its whole log to stdout) cannot block on a full pipe
//! while the caller polls for exit.

use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Interval between exit status checks.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Number of trailing output lines kept in failure messages.
const DETAIL_LINES: usize = 20;

/// Error running an external program.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The program could not be started (usually not installed).
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The program exited unsuccessfully.
    #[error("{program} exited with {status}: {detail}")]
    Failed {
        program: String,
        status: ExitStatus,
        detail: String,
    },
    /// The program did not finish in time and was killed.
    #[error("{program} timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
    /// Communicating with the running program failed.
    #[error("I/O error talking to {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Run `command` to completion and return its stdout.
///
/// `input` is written to the program's stdin when given; otherwise stdin is
/// closed. The program is killed once `timeout` elapses.
pub fn run(
    command: &mut Command,
    input: Option<&[u8]>,
    timeout: Duration,
) -> Result<Vec<u8>, CommandError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let stdin = if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    };

    tracing::debug!(program = %program, "Running external program");
    let start = Instant::now();
    let mut child = command
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CommandError::Spawn {
            program: program.clone(),
            source,
        })?;

    if let Some(input) = input
        && let Some(mut pipe) = child.stdin.take()
    {
        let input = input.to_vec();
        // A program that exits without reading all input is reported by its status.
        thread::spawn(move || {
            let _ = pipe.write_all(&input);
        });
    }
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    tracing::warn!(program = %program, "External program timed out, terminating");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CommandError::Timeout { program, timeout });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => return Err(CommandError::Io { program, source }),
        }
    };

    let io_error = |source| CommandError::Io {
        program: program.clone(),
        source,
    };
    let stdout = collect(stdout).map_err(io_error)?;
    let stderr = collect(stderr).map_err(io_error)?;

    tracing::debug!(
        program = %program,
        elapsed_ms = start.elapsed().as_millis(),
        %status,
        "External program finished"
    );

    if !status.success() {
        let detail = if stderr.iter().all(u8::is_ascii_whitespace) {
            tail(&stdout)
        } else {
            tail(&stderr)
        };
        return Err(CommandError::Failed {
            program,
            status,
            detail,
        });
    }

    Ok(stdout)
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(handle: Option<JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("output reader panicked"))),
        None => Ok(Vec::new()),
    }
}

/// Last few lines of program output, for error messages.
fn tail(output: &[u8]) -> String {
    let text = String::from_utf8_lossy(output);
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(DETAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script);
        command
    }

    #[test]
    fn test_run_returns_stdout() {
        let output = run(&mut sh("printf hello"), None, Duration::from_secs(10)).unwrap();

        assert_eq!(output, b"hello");
    }

    #[test]
    fn test_run_feeds_stdin() {
        let output = run(&mut Command::new("cat"), Some(b"piped"), Duration::from_secs(10)).unwrap();

        assert_eq!(output, b"piped");
    }

    #[test]
    fn test_run_failure_reports_stderr() {
        let err = run(&mut sh("echo broken >&2; exit 3"), None, Duration::from_secs(10))
            .unwrap_err();

        match err {
            CommandError::Failed { program, detail, .. } => {
                assert_eq!(program, "sh");
                assert_eq!(detail, "broken");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_run_failure_falls_back_to_stdout() {
        let err = run(&mut sh("echo '! Undefined control sequence.'; exit 1"), None, Duration::from_secs(10))
            .unwrap_err();

        assert!(err.to_string().contains("Undefined control sequence"));
    }

    #[test]
    fn test_run_timeout_kills_program() {
        let start = Instant::now();

        let err = run(&mut sh("sleep 5"), None, Duration::from_millis(100)).unwrap_err();

        assert!(matches!(err, CommandError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_run_missing_program() {
        let err = run(
            &mut Command::new("marginalia-no-such-program"),
            None,
            Duration::from_secs(1),
        )
        .unwrap_err();

        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[test]
    fn test_tail_keeps_last_lines() {
        let output: String = (1..=30).map(|i| format!("line {i}\n")).collect();

        let detail = tail(output.as_bytes());

        assert!(detail.starts_with("line 11\n"));
        assert!(detail.ends_with("line 30"));
    }
}
