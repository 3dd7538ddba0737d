//! The **abstraction** over running commands on a provisioned host.
//!
//! Tasks only ever talk to a [`CommandRunner`]. The production
//! [`ssh::SshRunner`] hands commands to the system `ssh` client; the
//! [`recording::RecordingRunner`] answers from a script and remembers what it
//! was asked, which backs both dry runs and tests.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub mod recording;
pub mod shell;
pub mod ssh;

pub use shell::{Shell, quote};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to launch ssh for host {host}")]
    Spawn {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error talking to host {host}")]
    Io {
        host: String,
        #[source]
        source: std::io::Error,
    },
    /// ssh never got the command to the host, or lost it midway.
    #[error("could not reach host {host}: {stderr}")]
    Connection { host: String, stderr: String },
    #[error("`{command}` failed on {host} with exit code {status}: {stderr}")]
    CommandFailed {
        host: String,
        command: String,
        status: i32,
        stderr: String,
    },
}

/// Who the command runs as on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Privilege {
    User,
    Root,
    As(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub shell: Shell,
    pub privilege: Privilege,
    pub stdin: Option<Vec<u8>>,
    /// Expected to fail sometimes; runners log it at a lower level.
    pub quiet: bool,
}

impl Request {
    pub fn user(shell: impl Into<Shell>) -> Self {
        Self {
            shell: shell.into(),
            privilege: Privilege::User,
            stdin: None,
            quiet: false,
        }
    }

    pub fn root(shell: impl Into<Shell>) -> Self {
        Self {
            privilege: Privilege::Root,
            ..Self::user(shell)
        }
    }

    pub fn as_user(user: &str, shell: impl Into<Shell>) -> Self {
        Self {
            privilege: Privilege::As(user.to_string()),
            ..Self::user(shell)
        }
    }

    pub fn with_stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// The full command line as the remote login shell receives it.
    pub fn render(&self) -> String {
        let inner = self.shell.render();
        match &self.privilege {
            Privilege::User => inner,
            Privilege::Root => format!("sudo -H sh -c {}", quote(&inner)),
            Privilege::As(user) => {
                format!("sudo -H -u {} sh -c {}", quote(user), quote(&inner))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Standard output without surrounding whitespace, for one-value queries
    /// like `whoami`.
    pub fn value(&self) -> &str {
        self.stdout.trim()
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Name of the host commands are sent to.
    fn host(&self) -> &str;

    /// Runs a request and reports its exit status without judging it.
    async fn execute(&self, request: Request) -> Result<CommandOutput, RemoteError>;

    /// Runs a request and turns a non-zero exit status into an error.
    async fn checked(&self, request: Request) -> Result<CommandOutput, RemoteError> {
        let command = request.render();
        let output = self.execute(request).await?;
        if output.success() {
            return Ok(output);
        }
        Err(RemoteError::CommandFailed {
            host: self.host().to_string(),
            command,
            status: output.status,
            stderr: output.stderr.trim().to_string(),
        })
    }

    async fn run(&self, shell: Shell) -> Result<CommandOutput, RemoteError> {
        self.checked(Request::user(shell)).await
    }

    async fn sudo(&self, shell: Shell) -> Result<CommandOutput, RemoteError> {
        self.checked(Request::root(shell)).await
    }

    async fn sudo_as(&self, user: &str, shell: Shell) -> Result<CommandOutput, RemoteError> {
        self.checked(Request::as_user(user, shell)).await
    }

    /// Runs `shell` with `input` on its standard input.
    async fn feed(&self, shell: Shell, input: Vec<u8>) -> Result<CommandOutput, RemoteError> {
        self.checked(Request::user(shell).with_stdin(input)).await
    }

    /// Whether a command succeeds. Only transport problems are errors.
    async fn probe(&self, shell: Shell) -> Result<bool, RemoteError> {
        let output = self.execute(Request::user(shell).quiet()).await?;
        Ok(output.success())
    }

    async fn exists(&self, path: &str) -> Result<bool, RemoteError> {
        self.probe(Shell::new(format!("test -e {}", quote(path))))
            .await
    }

    /// Writes `contents` to `path`, replacing whatever was there.
    async fn put(&self, contents: Vec<u8>, path: &str) -> Result<(), RemoteError> {
        self.feed(Shell::new(format!("cat > {}", quote(path))), contents)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<T: CommandRunner + ?Sized> CommandRunner for Arc<T> {
    fn host(&self) -> &str {
        (**self).host()
    }

    async fn execute(&self, request: Request) -> Result<CommandOutput, RemoteError> {
        (**self).execute(request).await
    }
}
