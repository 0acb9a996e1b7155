//! External formatter interface.
//!
//! The beautifier is a pure function `format(text, options) -> text` from the
//! caller's point of view. [`FormatEngine`] is the seam: production code uses
//! [`ProcessEngine`] (a piped subprocess with a kill-on-timeout guard), tests
//! substitute their own implementation.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::error::StyleError;

pub trait FormatEngine {
    /// Format `source` with the resolved option string.
    fn format(&self, source: &str, options: &str) -> Result<String, StyleError>;

    /// Engine version string, for debug output and status messages.
    fn version(&self) -> Result<String, StyleError>;
}

/// Formatter run as an external process, fed on stdin and read on stdout.
/// An unresponsive process is killed once the timeout expires; expiry is a
/// recoverable [`StyleError::Engine`], never a hang.
pub struct ProcessEngine {
    command: String,
    timeout: Duration,
}

impl ProcessEngine {
    pub fn new(config: &EngineConfig) -> Self {
        ProcessEngine {
            command: config.command.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn spawn(&self, options: &str) -> Result<Child, StyleError> {
        Command::new(&self.command)
            .args(options.split_whitespace())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| StyleError::Engine(format!("failed to start '{}': {}", self.command, e)))
    }

    fn wait_with_timeout(&self, child: &mut Child) -> Result<std::process::ExitStatus, StyleError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(StyleError::Engine(format!(
                            "'{}' did not finish within {}s and was killed",
                            self.command,
                            self.timeout.as_secs()
                        )));
                    }
                    std::thread::sleep(Duration::from_millis(20));
                }
                Err(e) => {
                    return Err(StyleError::Engine(format!(
                        "waiting for '{}' failed: {}",
                        self.command, e
                    )))
                }
            }
        }
    }
}

impl FormatEngine for ProcessEngine {
    fn format(&self, source: &str, options: &str) -> Result<String, StyleError> {
        let mut child = self.spawn(options)?;

        // Writer runs on its own thread: a full stdin pipe must not deadlock
        // against an engine that is still producing output.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| StyleError::Engine("engine stdin unavailable".to_string()))?;
        let input = source.to_string();
        let writer = std::thread::spawn(move || {
            use std::io::Write;
            let _ = stdin.write_all(input.as_bytes());
        });

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| StyleError::Engine("engine stdout unavailable".to_string()))?;
        let reader = std::thread::spawn(move || {
            let mut out = Vec::new();
            let mut stdout = stdout;
            let _ = stdout.read_to_end(&mut out);
            out
        });

        let status = self.wait_with_timeout(&mut child)?;
        let _ = writer.join();
        let out = reader
            .join()
            .map_err(|_| StyleError::Engine("engine output reader panicked".to_string()))?;

        if !status.success() {
            let mut err_text = String::new();
            if let Some(mut stderr) = child.stderr.take() {
                let _ = stderr.read_to_string(&mut err_text);
            }
            let err_text = err_text.trim();
            return Err(StyleError::Engine(if err_text.is_empty() {
                format!("'{}' exited with {}", self.command, status)
            } else {
                format!("'{}' failed: {}", self.command, err_text)
            }));
        }

        String::from_utf8(out)
            .map_err(|_| StyleError::Engine("engine produced non-UTF-8 output".to_string()))
    }

    fn version(&self) -> Result<String, StyleError> {
        let output = Command::new(&self.command)
            .arg("--version")
            .output()
            .map_err(|e| StyleError::Engine(format!("failed to start '{}': {}", self.command, e)))?;
        // astyle historically prints its version banner on stderr.
        let text = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&text).trim().to_string())
    }
}
