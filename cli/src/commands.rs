pub mod classify;
pub mod provision;
pub mod render;

use std::net::Ipv4Addr;
use std::path::PathBuf;

use anyhow::Context;
use authbench_common::config::Config;
use authbench_core::tasks::Task;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "authbench")]
#[command(version)]
#[command(about = "Provisions test VMs for an authentication service and the server behind it.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Host alias from the SSH config
    #[arg(long, global = true, default_value = "default")]
    pub host: String,

    /// OpenSSH config file, generated by Vagrant if missing
    #[arg(long, global = true, default_value = "ssh_config")]
    pub ssh_config: PathBuf,

    /// TOML file overriding the built-in settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the commands a task would run instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Less output; repeat for even less
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// More output; repeat for even more
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Task(TaskCommand),
    /// Show the address a host would advertise
    #[command(alias = "ip")]
    PublicIp,
    /// Classify addresses locally and pick the public one
    #[command(alias = "c")]
    Classify {
        /// Dotted-quad IPv4 addresses, in preference order
        addrs: Vec<String>,
        /// Use this machine's interface addresses
        #[arg(long, conflicts_with = "addrs")]
        local: bool,
    },
    /// List the address ranges treated as private
    Ranges,
    /// Generate the SSH config from Vagrant if it is missing
    SshConfig,
    /// Print a generated file without touching any host
    Render {
        #[arg(value_enum)]
        file: RenderTarget,
        /// Address the file is generated for
        #[arg(long, default_value_t = Ipv4Addr::LOCALHOST)]
        ip: Ipv4Addr,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum TaskCommand {
    /// Update packages and install the basics
    Prepare,
    /// Install Node.js unless present
    InstallNodejs,
    /// Install pm2 unless present
    InstallPm2,
    /// Install the authentication service and start it under pm2
    ProvisionService,
    /// Replace the service with the latest archive
    UpdateService,
    /// Add the server's package repository
    ConfigureApt,
    /// Install, configure and hook up the server
    ProvisionP4d,
    /// Install the server packages and create the instance
    InstallP4d,
    /// Create test groups and settings on the server
    ConfigureP4d,
    /// Install the login extension into the server
    InstallExtension,
}

impl From<TaskCommand> for Task {
    fn from(command: TaskCommand) -> Self {
        match command {
            TaskCommand::Prepare => Task::Prepare,
            TaskCommand::InstallNodejs => Task::InstallNodejs,
            TaskCommand::InstallPm2 => Task::InstallPm2,
            TaskCommand::ProvisionService => Task::ProvisionService,
            TaskCommand::UpdateService => Task::UpdateService,
            TaskCommand::ConfigureApt => Task::ConfigureApt,
            TaskCommand::ProvisionP4d => Task::ProvisionP4d,
            TaskCommand::InstallP4d => Task::InstallP4d,
            TaskCommand::ConfigureP4d => Task::ConfigureP4d,
            TaskCommand::InstallExtension => Task::InstallExtension,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RenderTarget {
    /// pm2 ecosystem file for the service
    Ecosystem,
    /// Group spec giving the super user unlimited tickets
    Group,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("could not load {}", path.display()))?,
            None => Config::default(),
        };
        cfg.quiet = self.quiet;
        Ok(cfg)
    }
}
