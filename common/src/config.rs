//! Provisioning configuration.
//!
//! Every field has a default, so an empty (or missing) TOML file yields a
//! working setup for the stock test VMs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Reduces terminal output; set from the command line only.
    #[serde(skip)]
    pub quiet: u8,

    pub node: NodeConfig,
    pub service: ServiceConfig,
    pub server: ServerConfig,
}

/// Node.js runtime installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// Vendor setup script piped into a root shell.
    pub setup_url: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            setup_url: "https://deb.nodesource.com/setup_10.x".to_string(),
        }
    }
}

/// The authentication service managed by pm2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub archive_url: String,
    /// Directory the archive unpacks into, relative to the login user's home.
    pub directory: String,
    /// pm2 application name.
    pub app_name: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            archive_url: "https://swarm.perforce.com/archives/depot/main/p4-auth-integ-svc.zip"
                .to_string(),
            directory: "p4-auth-integ-svc".to_string(),
            app_name: "auth-svc".to_string(),
            port: 3000,
        }
    }
}

impl ServiceConfig {
    /// File name the archive is saved under, taken from the last URL segment.
    pub fn archive_name(&self) -> &str {
        self.archive_url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("service.zip")
    }

    pub fn ecosystem_path(&self) -> String {
        format!("{}/ecosystem.config.js", self.directory)
    }

    pub fn backup_directory(&self) -> String {
        format!("{}.old", self.directory)
    }
}

/// The version-control server and its package source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
    /// Name of the server instance created by the package's configure script.
    pub instance: String,
    pub super_user: String,
    pub super_password: String,
    /// OS account that owns the server process.
    pub os_user: String,
    pub pubkey_url: String,
    pub apt_url: String,
    pub sources_list: String,
    pub configure_script: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 1666,
            instance: "despot".to_string(),
            super_user: "super".to_string(),
            super_password: "Rebar123".to_string(),
            os_user: "perforce".to_string(),
            pubkey_url: "http://pkg-ondemand.bnr.perforce.com/perforce/r19.1/perforce.pubkey"
                .to_string(),
            apt_url: "http://pkg-ondemand.bnr.perforce.com/perforce/r19.1/apt/ubuntu".to_string(),
            sources_list: "/etc/apt/sources.list.d/perforce.sources.list".to_string(),
            configure_script: "/opt/perforce/sbin/configure-helix-p4d.sh".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn pubkey_name(&self) -> &str {
        self.pubkey_url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("package.pubkey")
    }
}

impl Config {
    /// Reads a TOML file. Missing sections and keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
