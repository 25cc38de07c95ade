//! Engine subprocess plumbing: spawning, line-oriented stdio, teardown.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::error::{GtpError, Result};

/// Binary name looked up when no explicit engine path is configured.
pub const DEFAULT_ENGINE_BINARY: &str = "leelaz";

/// Locate the engine binary.
///
/// Checks the user's dot-directory install first, then falls back to PATH.
pub fn find_engine_binary() -> Option<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        let candidate = home
            .join(".autoplay")
            .join("bin")
            .join(DEFAULT_ENGINE_BINARY);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    which::which(DEFAULT_ENGINE_BINARY).ok()
}

/// One spawned engine process with buffered line access to its stdio.
pub(crate) struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
}

impl EngineProcess {
    /// Spawn the engine from a whitespace-separated command line.
    pub fn spawn(command_line: &str) -> Result<Self> {
        debug!(command = %command_line, "spawning engine");

        let mut parts = command_line.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            GtpError::LaunchFailure(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "empty engine command line",
            ))
        })?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(GtpError::LaunchFailure)?;

        let stdin = child.stdin.take().ok_or_else(|| {
            GtpError::LaunchFailure(std::io::Error::other("engine stdin not captured"))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            GtpError::LaunchFailure(std::io::Error::other("engine stdout not captured"))
        })?;

        Ok(Self {
            child,
            stdin,
            reader: BufReader::new(stdout),
        })
    }

    /// Write one protocol line and flush it to the engine.
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|_| GtpError::ProcessDied)?;
        self.stdin
            .write_all(b"\n")
            .await
            .map_err(|_| GtpError::ProcessDied)?;
        self.stdin.flush().await.map_err(|_| GtpError::ProcessDied)
    }

    /// Block until a full response line is available. End of stream means
    /// the engine exited under us.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|_| GtpError::ProcessDied)?;
        if read == 0 {
            return Err(GtpError::ProcessDied);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Forcibly terminate the engine.
    pub async fn kill(&mut self) {
        let _ = self.child.kill().await;
    }

    /// Wait for the engine to exit on its own.
    pub async fn wait(&mut self) {
        let _ = self.child.wait().await;
    }
}
