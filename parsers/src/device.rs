//! Device-execution seam.
//!
//! Parsers never talk to devices themselves. A [`Device`] turns a fully
//! rendered command string into the raw output the device printed; failures
//! are returned unchanged and never retried.

use std::collections::HashMap;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use wait_timeout::ChildExt;

/// Errors raised by a [`Device`].
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`{command}` timed out after {timeout_ms} ms")]
    Timeout { command: String, timeout_ms: u64 },

    #[error("`{command}` exited with {}: {stderr}", describe_exit(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("device rejected `{command}`")]
    CommandRejected { command: String },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Something that can run a show command and return its output.
pub trait Device: Send + Sync {
    fn execute(&self, command: &str) -> Result<String, DeviceError>;
}

/// Serves canned outputs keyed by command string.
#[derive(Debug, Clone, Default)]
pub struct StaticDevice {
    outputs: HashMap<String, String>,
}

impl StaticDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }
}

impl Device for StaticDevice {
    fn execute(&self, command: &str) -> Result<String, DeviceError> {
        debug!(command, "Serving canned output");
        self.outputs
            .get(command)
            .cloned()
            .ok_or_else(|| DeviceError::CommandRejected {
                command: command.to_string(),
            })
    }
}

/// Runs a local program (typically an SSH wrapper) with the show command as
/// its last argument and returns its stdout.
#[derive(Debug, Clone)]
pub struct ProcessDevice {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessDevice {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

impl Device for ProcessDevice {
    fn execute(&self, command: &str) -> Result<String, DeviceError> {
        debug!(program = %self.program, args = ?self.args, command, "Running device command");
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                debug!(program = %self.program, error = %e, "Failed to spawn device program");
                return Err(DeviceError::Spawn {
                    program: self.program.clone(),
                    source: e,
                });
            }
        };

        // Drain both pipes while waiting so a chatty child cannot block on a
        // full pipe buffer.
        let stdout_thread = child.stdout.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let result = pipe.read_to_end(&mut buf);
                (buf, result)
            })
        });
        let stderr_thread = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let result = pipe.read_to_end(&mut buf);
                (buf, result)
            })
        });

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                debug!(command, timeout_ms, "Device command timed out, killing process");
                let _ = child.kill();
                let _ = child.wait();
                return Err(DeviceError::Timeout {
                    command: command.to_string(),
                    timeout_ms,
                });
            }
            Err(e) => {
                debug!(command, error = %e, "Failed to wait on device command");
                let _ = child.kill();
                let _ = child.wait();
                return Err(DeviceError::Io(e));
            }
        };

        let stdout = join_pipe(stdout_thread)?;
        let stderr = join_pipe(stderr_thread)?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            debug!(command, code = ?status.code(), stderr = %stderr, "Device command failed");
            return Err(DeviceError::Failed {
                command: command.to_string(),
                code: status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

type PipeThread = std::thread::JoinHandle<(Vec<u8>, std::io::Result<usize>)>;

fn join_pipe(thread: Option<PipeThread>) -> Result<Vec<u8>, DeviceError> {
    let Some(thread) = thread else {
        return Ok(Vec::new());
    };
    let (buf, result) = thread
        .join()
        .map_err(|_| std::io::Error::other("pipe reader panicked"))?;
    result?;
    Ok(buf)
}
