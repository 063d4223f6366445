//! Child-process runner backed by `tokio::process`.
//!
//! The child gets a null stdin and piped stdout/stderr, so a compiler that
//! would otherwise prompt for input fails fast instead of hanging. The child
//! is spawned with `kill_on_drop`, which means both a deadline expiry and a
//! dropped caller future terminate it.

use folio_traits::{ProcessError, ProcessOutput, ProcessRequest, ProcessRunner};
use log::{debug, warn};
use std::process::Stdio;
use tokio::process::Command;

/// Runs requests as real child processes on the tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError> {
        let program = request.program_name();

        let mut command = Command::new(&request.program);
        command
            .args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &request.current_dir {
            command.current_dir(dir);
        }

        debug!("Spawning '{}' with args {:?}", program, request.args);
        let child = command.spawn().map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

        let wait = child.wait_with_output();
        let output = match request.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result,
                Err(_) => {
                    // The elapsed future owned the child; dropping it kills the process.
                    warn!("'{}' exceeded {:?}, killing it", program, limit);
                    return Err(ProcessError::TimedOut {
                        program,
                        after: limit,
                    });
                }
            },
            None => wait.await,
        }
        .map_err(|source| ProcessError::Io {
            program: program.clone(),
            source,
        })?;

        debug!("'{}' exited with {:?}", program, output.status.code());
        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn name(&self) -> &'static str {
        "TokioProcessRunner"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn shell(script: &str) -> ProcessRequest {
        ProcessRequest::new("sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let runner = TokioProcessRunner::new();
        let output = runner
            .run(shell("echo out; echo err 1>&2"))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let runner = TokioProcessRunner::new();
        let output = runner.run(shell("exit 3")).await.unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_runs_in_requested_directory() {
        let dir = std::env::temp_dir();
        let runner = TokioProcessRunner::new();
        let output = runner
            .run(shell("pwd").current_dir(&dir))
            .await
            .unwrap();

        let reported = std::path::PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_timeout_kills_hung_process() {
        let runner = TokioProcessRunner::new();
        let started = Instant::now();
        let result = runner
            .run(shell("sleep 30").timeout(Duration::from_millis(200)))
            .await;

        assert!(matches!(result, Err(ProcessError::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = TokioProcessRunner::new();
        let result = runner
            .run(ProcessRequest::new("folio-definitely-not-a-real-binary"))
            .await;

        match result {
            Err(ProcessError::Spawn { program, .. }) => {
                assert_eq!(program, "folio-definitely-not-a-real-binary")
            }
            other => panic!("expected spawn error, got {:?}", other),
        }
    }

    #[test]
    fn test_runner_name() {
        assert_eq!(TokioProcessRunner::new().name(), "TokioProcessRunner");
    }
}
