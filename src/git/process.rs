use crate::error::{GitLogError, Result};
use crate::git::commands::display_command;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// A running git process with its output pipes taken out.
///
/// The orchestrator owns this exclusively; stdout, stderr and the exit
/// status can be moved into separate tasks.
pub struct GitProcess {
    pub command: String,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
    child: Child,
}

impl GitProcess {
    /// Spawns `program args` in `cwd` with no stdin and piped output.
    pub fn spawn(program: &Path, args: &[String], cwd: &Path) -> Result<Self> {
        let command = display_command(program, args);
        log::debug!("Spawning `{}` in {}", command, cwd.display());

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GitLogError::Spawn {
                command: command.clone(),
                source: e,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(GitLogError::MissingPipe("stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(GitLogError::MissingPipe("stderr"))?;

        Ok(Self {
            command,
            stdout,
            stderr,
            child,
        })
    }

    /// Splits the handle so output and exit status can be awaited apart.
    pub fn into_parts(self) -> (ChildStdout, ChildStderr, ExitWaiter) {
        (
            self.stdout,
            self.stderr,
            ExitWaiter {
                command: self.command,
                child: self.child,
            },
        )
    }
}

/// Exit-status half of a [`GitProcess`].
pub struct ExitWaiter {
    pub command: String,
    child: Child,
}

impl ExitWaiter {
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait().await?;
        log::debug!("`{}` exited with {}", self.command, status);
        Ok(status)
    }

    /// Kills the process and reaps it.
    pub async fn kill(&mut self) -> Result<()> {
        log::debug!("Killing `{}`", self.command);
        self.child.kill().await?;
        Ok(())
    }
}
