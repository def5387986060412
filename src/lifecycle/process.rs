//! Invoker process supervision.
//!
//! When configured with a command, the adapter owns the invoker process: it
//! starts it before connecting, shuts down when it exits, and stops it on the
//! way out.

use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};

use crate::error::{AdapterError, AdapterResult};

/// A running invoker process. Killed if dropped while still running.
#[derive(Debug)]
pub struct InvokerProcess {
    child: Child,
    program: String,
}

impl InvokerProcess {
    /// Spawn `command` (program followed by its arguments) with inherited stdio.
    pub fn spawn(command: &[String]) -> AdapterResult<Self> {
        let (program, args) = command.split_first().ok_or(AdapterError::EmptyCommand)?;

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AdapterError::Launch {
                program: program.clone(),
                source,
            })?;

        tracing::info!(program = %program, pid = ?child.id(), "Invoker process started");
        Ok(Self {
            child,
            program: program.clone(),
        })
    }

    /// Wait for the process to exit.
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Stop the process if it is still running and reap it.
    pub async fn stop(mut self) -> std::io::Result<()> {
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }
        tracing::info!(program = %self.program, "Stopping invoker process");
        self.child.kill().await
    }
}

/// Wait for an optional process; never resolves when there is none.
pub async fn exited(process: Option<&mut InvokerProcess>) -> std::io::Result<ExitStatus> {
    match process {
        Some(process) => process.wait().await,
        None => std::future::pending().await,
    }
}
