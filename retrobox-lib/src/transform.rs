//! External media transform (video/audio conversion) runner.
//!
//! The external tool is opaque: it receives an option string with `{input}`
//! and `{output}` placeholders. Success is the appearance of the output
//! file, not the exit code.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::files::FileOps;
use crate::LibError;

/// Default time allowed for one transform.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Interval between two checks for the output file and the cancel token.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub options: String,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl TransformRequest {
    pub fn new(
        options: impl Into<String>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            options: options.into(),
            input: input.into(),
            output: output.into(),
        }
    }

    /// Command-line arguments with the placeholders substituted.
    pub fn args(&self) -> Vec<String> {
        let input = self.input.to_string_lossy();
        let output = self.output.to_string_lossy();
        self.options
            .split_whitespace()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct TransformRunner {
    program: PathBuf,
    timeout: Duration,
}

impl TransformRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one transform and wait for its output file.
    ///
    /// Returns `Ok(false)` when the tool exits without producing the output.
    /// In simulation mode nothing runs and the result is `Ok(true)`.
    pub fn run(
        &self,
        request: &TransformRequest,
        files: &FileOps,
        cancel: &CancelToken,
    ) -> Result<bool, LibError> {
        if files.is_simulated() {
            log::info!(
                "[SIMULATION] Transform {} to {} with '{}'",
                request.input.display(),
                request.output.display(),
                request.options
            );
            return Ok(true);
        }
        cancel.check()?;

        log::info!(
            "Transforming {} to {}",
            request.input.display(),
            request.output.display()
        );
        if let Some(parent) = request.output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut child = Command::new(&self.program)
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let started = Instant::now();
        loop {
            if cancel.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                return Err(LibError::Cancelled);
            }
            let exited = child.try_wait()?.is_some();
            if request.output.exists() && exited {
                return Ok(true);
            }
            if exited {
                log::warn!(
                    "Transform exited without producing {}",
                    request.output.display()
                );
                return Ok(false);
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(LibError::TransformTimeout {
                    output: request.output.clone(),
                    seconds: self.timeout.as_secs(),
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}
