//! One-time setup of the OpenSSH config file the runner connects with.
//!
//! Vagrant knows how to reach its VMs; `vagrant ssh-config` prints that as an
//! OpenSSH config with absolute paths to the per-VM private keys. Those paths
//! are made relative so the file keeps working when the checkout moves.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SshConfigError {
    #[error("failed to run `vagrant ssh-config` in {dir}")]
    Spawn {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`vagrant ssh-config` exited with code {status}: {stderr}")]
    Vagrant { status: i32, stderr: String },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const VAGRANT: &str = "vagrant";

/// Returns `path`, generating it from Vagrant first if it does not exist.
///
/// A relative `path` is resolved against `workdir`.
pub async fn ensure_ssh_config(path: &Path, workdir: &Path) -> Result<PathBuf, SshConfigError> {
    generate_with(VAGRANT, path, workdir).await
}

async fn generate_with(
    vagrant: &str,
    path: &Path,
    workdir: &Path,
) -> Result<PathBuf, SshConfigError> {
    let target = workdir.join(path);
    if target.exists() {
        debug!(path = %target.display(), "using existing ssh config");
        return Ok(target);
    }

    let output = Command::new(vagrant)
        .arg("ssh-config")
        .current_dir(workdir)
        .output()
        .await
        .map_err(|source| SshConfigError::Spawn {
            dir: workdir.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(SshConfigError::Vagrant {
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let config = relativize(&String::from_utf8_lossy(&output.stdout), workdir);
    tokio::fs::write(&target, config)
        .await
        .map_err(|source| SshConfigError::Write {
            path: target.clone(),
            source,
        })?;

    info!("Generated {}", target.display());
    Ok(target)
}

/// Strips the `workdir/` prefix from every path in `config`.
pub fn relativize(config: &str, workdir: &Path) -> String {
    let prefix = format!("{}/", workdir.display());
    config.replace(&prefix, "")
}
