//! # Provisioning Tasks
//!
//! Each task is a fixed sequence of remote commands. Tasks that install
//! something check first and skip when the work is already done, so running a
//! task twice is safe.
//!
//! Tasks depend on each other by calling each other directly: installing pm2
//! installs Node.js if needed, provisioning the server runs the install,
//! configure and extension steps in turn.

use std::fmt;

use authbench_common::config::Config;
use authbench_common::network::classify::PublicIp;
use tracing::info;

use crate::Result;
use crate::discovery;
use crate::remote::{CommandRunner, Shell};

mod node;
mod server;
mod service;
mod system;

/// Everything the command line can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Prepare,
    InstallNodejs,
    InstallPm2,
    ProvisionService,
    UpdateService,
    ConfigureApt,
    ProvisionP4d,
    InstallP4d,
    ConfigureP4d,
    InstallExtension,
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::Prepare => "prepare",
            Task::InstallNodejs => "install nodejs",
            Task::InstallPm2 => "install pm2",
            Task::ProvisionService => "provision service",
            Task::UpdateService => "update service",
            Task::ConfigureApt => "configure apt",
            Task::ProvisionP4d => "provision p4d",
            Task::InstallP4d => "install p4d",
            Task::ConfigureP4d => "configure p4d",
            Task::InstallExtension => "install extension",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The thing to install was already there.
    Skipped,
    /// The host is shutting down to finish applying updates.
    RebootScheduled,
}

type StepCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Runs tasks against one host.
pub struct Provisioner {
    runner: Box<dyn CommandRunner>,
    config: Config,
    on_step: Option<StepCallback>,
}

impl Provisioner {
    pub fn new(runner: Box<dyn CommandRunner>, config: Config) -> Self {
        Self {
            runner,
            config,
            on_step: None,
        }
    }

    /// Registers a callback invoked with a short description of each step.
    pub fn on_step(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_step = Some(Box::new(callback));
        self
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub async fn run_task(&self, task: Task) -> Result<Outcome> {
        match task {
            Task::Prepare => self.prepare().await,
            Task::InstallNodejs => self.install_nodejs().await,
            Task::InstallPm2 => self.install_pm2().await,
            Task::ProvisionService => self.provision_service().await,
            Task::UpdateService => self.update_service().await,
            Task::ConfigureApt => self.configure_apt().await,
            Task::ProvisionP4d => self.provision_p4d().await,
            Task::InstallP4d => self.install_p4d().await,
            Task::ConfigureP4d => self.configure_p4d().await,
            Task::InstallExtension => self.install_extension().await,
        }
    }

    pub async fn public_ip(&self) -> Result<PublicIp> {
        self.step("discovering public address");
        discovery::discover_public_ip(self.runner()).await
    }

    fn step(&self, description: &str) {
        info!(host = self.runner.host(), "{description}");
        if let Some(callback) = &self.on_step {
            callback(description);
        }
    }

    async fn apt_install(&self, package: &str) -> Result<()> {
        self.step(&format!("installing {package}"));
        self.runner
            .sudo(Shell::new(format!("apt-get install -q -y {package}")))
            .await?;
        Ok(())
    }

    async fn run(&self, shell: impl Into<Shell>) -> Result<String> {
        let output = self.runner.run(shell.into()).await?;
        Ok(output.value().to_string())
    }

    async fn sudo(&self, shell: impl Into<Shell>) -> Result<()> {
        self.runner.sudo(shell.into()).await?;
        Ok(())
    }
}
