//! External engine subprocess
//!
//! Spawns the command engine (midish by default) with a piped stdin. The
//! pipe is handed to the dispatcher and owned there for the life of the
//! process; dropping it is what tells the engine to exit.

use std::process::Stdio;

use tokio::process::{Child, ChildStdin, Command};
use tracing::info;

use crate::error::{Error, Result};

/// Handle to the spawned engine process.
#[derive(Debug)]
pub struct Engine {
    child: Child,
}

impl Engine {
    /// Spawn `command` (whitespace-split into program and arguments) with
    /// stdin piped. Returns the handle and the stdin pipe for the
    /// dispatcher.
    pub fn spawn(command: &str) -> Result<(Self, ChildStdin)> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Config("empty engine command".to_string()))?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Sink(std::io::Error::other("engine stdin not captured")))?;

        info!("engine started: {}", command);
        Ok((Self { child }, stdin))
    }

    /// Wait for the engine to exit. The stdin pipe must already be
    /// dropped, otherwise the engine never sees EOF.
    pub async fn shutdown(mut self) -> Result<()> {
        let status = self.child.wait().await?;
        info!("engine exited: {}", status);
        Ok(())
    }
}
