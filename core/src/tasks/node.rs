use authbench_common::success;

use crate::Result;
use crate::remote::{Shell, quote};
use crate::tasks::{Outcome, Provisioner};

impl Provisioner {
    /// Installs Node.js and npm from the vendor's package repository.
    pub async fn install_nodejs(&self) -> Result<Outcome> {
        if self.runner.probe(Shell::new("which node")).await? {
            return Ok(Outcome::Skipped);
        }

        // Native modules need a compiler.
        self.apt_install("build-essential").await?;
        self.apt_install("curl").await?;

        // The distribution package is far behind; the vendor script adds
        // their repository and includes npm.
        self.step("adding the Node.js repository");
        self.run(format!(
            "curl -sL {} | sudo -E bash -",
            quote(&self.config.node.setup_url)
        ))
        .await?;
        self.apt_install("nodejs").await?;

        // Running npm once as the login user makes ~/.config owned by that
        // user rather than by root.
        self.run("npm version").await?;

        success!("Node.js installed on {}", self.runner.host());
        Ok(Outcome::Done)
    }

    /// Installs the pm2 process manager, and Node.js first if missing.
    pub async fn install_pm2(&self) -> Result<Outcome> {
        if self.runner.probe(Shell::new("which pm2")).await? {
            return Ok(Outcome::Skipped);
        }
        self.install_nodejs().await?;

        self.step("installing pm2");
        self.sudo("npm install -q -g pm2").await?;
        Ok(Outcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::CommandOutput;
    use crate::remote::recording::RecordingRunner;
    use crate::tasks::test_support::provisioner;

    #[tokio::test]
    async fn nodejs_already_present_is_skipped() {
        let (prov, runner) = provisioner(RecordingRunner::new("vm"));

        assert_eq!(prov.install_nodejs().await.unwrap(), Outcome::Skipped);
        assert_eq!(runner.commands(), ["which node"]);
    }

    #[tokio::test]
    async fn nodejs_installs_from_vendor_script() {
        let (prov, runner) = provisioner(RecordingRunner::new("vm").respond("which", CommandOutput::failed(1, "")));

        assert_eq!(prov.install_nodejs().await.unwrap(), Outcome::Done);
        assert_eq!(
            runner.commands(),
            [
                "which node",
                "sudo -H sh -c 'apt-get install -q -y build-essential'",
                "sudo -H sh -c 'apt-get install -q -y curl'",
                "curl -sL https://deb.nodesource.com/setup_10.x | sudo -E bash -",
                "sudo -H sh -c 'apt-get install -q -y nodejs'",
                "npm version",
            ]
        );
    }

    #[tokio::test]
    async fn pm2_pulls_in_nodejs() {
        let (prov, runner) = provisioner(RecordingRunner::new("vm").respond("which", CommandOutput::failed(1, "")));

        assert_eq!(prov.install_pm2().await.unwrap(), Outcome::Done);
        let commands = runner.commands();
        assert_eq!(commands[0], "which pm2");
        assert_eq!(commands[1], "which node");
        assert_eq!(
            commands.last().map(String::as_str),
            Some("sudo -H sh -c 'npm install -q -g pm2'")
        );
    }

    #[tokio::test]
    async fn pm2_already_present_is_skipped() {
        let (prov, runner) = provisioner(RecordingRunner::new("vm"));

        assert_eq!(prov.install_pm2().await.unwrap(), Outcome::Skipped);
        assert_eq!(runner.commands(), ["which pm2"]);
    }
}
