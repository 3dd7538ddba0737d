use std::path::PathBuf;
use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::remote::{CommandOutput, CommandRunner, RemoteError, Request};

const SSH_FAILURE: i32 = 255;

/// Runs commands through the system `ssh` client.
///
/// Connection details come from an OpenSSH config file, so `host` is an alias
/// from that file rather than an address.
#[derive(Debug, Clone)]
pub struct SshRunner {
    host: String,
    ssh_config: PathBuf,
}

impl SshRunner {
    pub fn new(host: impl Into<String>, ssh_config: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            ssh_config: ssh_config.into(),
        }
    }

    fn command(&self, remote: &str, with_stdin: bool) -> Command {
        let mut command = Command::new("ssh");
        command
            .arg("-F")
            .arg(&self.ssh_config)
            .arg(&self.host)
            .arg("--")
            .arg(remote)
            .stdin(if with_stdin { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    fn io_error(&self, source: std::io::Error) -> RemoteError {
        RemoteError::Io {
            host: self.host.clone(),
            source,
        }
    }
}

#[async_trait]
impl CommandRunner for SshRunner {
    fn host(&self) -> &str {
        &self.host
    }

    async fn execute(&self, request: Request) -> Result<CommandOutput, RemoteError> {
        let remote = request.render();
        debug!(host = %self.host, "$ {remote}");
        let Request { stdin, quiet, .. } = request;

        let mut child = self
            .command(&remote, stdin.is_some())
            .spawn()
            .map_err(|source| RemoteError::Spawn {
                host: self.host.clone(),
                source,
            })?;

        // Input is written while output is collected, so a remote command that
        // exits early cannot leave ssh blocked on a full pipe.
        let pipe = child.stdin.take();
        let feed = async move {
            match (stdin, pipe) {
                (Some(input), Some(mut pipe)) => pipe.write_all(&input).await,
                _ => Ok(()),
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| self.io_error(e))?;
        match fed {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(host = %self.host, "remote command closed its input early");
            }
            Err(e) => return Err(self.io_error(e)),
            Ok(()) => {}
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        // ssh reserves 255 for its own failures; no code means it was killed.
        let status = match output.status.code() {
            Some(SSH_FAILURE) | None => {
                return Err(RemoteError::Connection {
                    host: self.host.clone(),
                    stderr: stderr.trim().to_string(),
                });
            }
            Some(status) => status,
        };
        let output = CommandOutput {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        };

        if output.success() {
            trace!(host = %self.host, stdout = %output.stdout.trim_end());
        } else if quiet {
            trace!(host = %self.host, status, "check came back negative");
        } else {
            debug!(host = %self.host, status, "command exited non-zero");
        }

        Ok(output)
    }
}
