use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;

use crate::remote::{CommandOutput, CommandRunner, RemoteError, Request};

/// A request as it would have been sent to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub command: String,
    pub stdin: Option<Vec<u8>>,
}

/// A runner that never leaves the machine.
///
/// Each request is matched against scripted responses in the order they were
/// added; the first response whose pattern occurs in the rendered command
/// wins. Unmatched requests succeed with empty output.
#[derive(Debug)]
pub struct RecordingRunner {
    host: String,
    responses: Vec<(String, CommandOutput)>,
    echo: bool,
    log: Mutex<Vec<RecordedCommand>>,
}

impl RecordingRunner {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            responses: Vec::new(),
            echo: false,
            log: Mutex::new(Vec::new()),
        }
    }

    /// A runner for previewing a task: it prints every command and pretends
    /// the host is a fresh VM with a single private address.
    pub fn dry_run(host: impl Into<String>) -> Self {
        let mut runner = Self::new(host)
            .respond("hostname -I", CommandOutput::ok("10.0.2.15\n"))
            .respond("whoami", CommandOutput::ok("vagrant\n"))
            .respond("lsb_release -sc", CommandOutput::ok("bionic\n"))
            .respond("which ", CommandOutput::failed(1, ""))
            .respond("test -e ", CommandOutput::failed(1, ""));
        runner.echo = true;
        runner
    }

    pub fn respond(mut self, pattern: impl Into<String>, output: CommandOutput) -> Self {
        self.responses.push((pattern.into(), output));
        self
    }

    pub fn recorded(&self) -> Vec<RecordedCommand> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.recorded().into_iter().map(|c| c.command).collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    fn host(&self) -> &str {
        &self.host
    }

    async fn execute(&self, request: Request) -> Result<CommandOutput, RemoteError> {
        let command = request.render();
        if self.echo {
            info!(target: "authbench::print", "{}$ {command}", self.host);
        }

        let output = self
            .responses
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default();

        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCommand {
                command,
                stdin: request.stdin,
            });

        Ok(output)
    }
}
