//! Native program provider
//!
//! Runs an executable as a child process with piped stdout/stderr. An
//! optional argument prefix lets one executable stand in for several
//! tools (`java -jar tool.jar`, `java @java.args`).

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use modbuild_domain::{ToolOutput, ToolProvider};
use tracing::{debug, warn};

/// Exit code reported when the process could not be started or was killed
pub const SPAWN_FAILURE_CODE: i32 = -1;

#[derive(Debug, Clone)]
pub struct NativeProgram {
    executable: PathBuf,
    prefix: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl NativeProgram {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            prefix: Vec::new(),
            working_dir: None,
            timeout: None,
        }
    }

    /// Arguments passed before the caller's arguments
    pub fn with_prefix<I, S>(mut self, prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix.extend(prefix.into_iter().map(Into::into));
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn prefix(&self) -> &[String] {
        &self.prefix
    }

    fn command(&self, arguments: &[String]) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.prefix)
            .args(arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl ToolProvider for NativeProgram {
    fn run(&self, arguments: &[String]) -> ToolOutput {
        debug!(executable = %self.executable.display(), "Spawning native program");
        let child = match self.command(arguments).spawn() {
            Ok(child) => child,
            Err(e) => {
                return ToolOutput::failure(
                    SPAWN_FAILURE_CODE,
                    format!("Failed to start {}: {}", self.executable.display(), e),
                );
            }
        };

        match self.timeout {
            Some(timeout) => wait_with_timeout(child, timeout),
            None => match child.wait_with_output() {
                Ok(output) => ToolOutput {
                    code: output.status.code().unwrap_or(SPAWN_FAILURE_CODE),
                    out: String::from_utf8_lossy(&output.stdout).into_owned(),
                    err: String::from_utf8_lossy(&output.stderr).into_owned(),
                },
                Err(e) => ToolOutput::failure(SPAWN_FAILURE_CODE, format!("Failed to wait: {e}")),
            },
        }
    }
}

/// Poll the child until it exits or the timeout elapses.
///
/// Output pipes are drained on reader threads so a chatty child cannot
/// block on a full pipe while we poll.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> ToolOutput {
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);
    let collect = |handle: Option<std::thread::JoinHandle<String>>| {
        handle.and_then(|h| h.join().ok()).unwrap_or_default()
    };

    let start = Instant::now();
    let poll_interval = Duration::from_millis(20);
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return ToolOutput {
                    code: status.code().unwrap_or(SPAWN_FAILURE_CODE),
                    out: collect(stdout),
                    err: collect(stderr),
                };
            }
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(timeout_ms = timeout.as_millis() as u64, "Native program timed out");
                    let mut err = collect(stderr);
                    err.push_str(&format!("Timed out after {}ms\n", timeout.as_millis()));
                    return ToolOutput {
                        code: SPAWN_FAILURE_CODE,
                        out: collect(stdout),
                        err,
                    };
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => {
                return ToolOutput::failure(SPAWN_FAILURE_CODE, format!("Failed to wait: {e}"));
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    })
}
