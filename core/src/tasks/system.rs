use authbench_common::success;

use crate::Result;
use crate::remote::{Shell, quote};
use crate::tasks::{Outcome, Provisioner};

const REBOOT_MARKER: &str = "/var/run/reboot-required";

impl Provisioner {
    /// Brings a fresh VM up to date and installs the basics.
    pub async fn prepare(&self) -> Result<Outcome> {
        // Without the locale, later package scripts complain on every run.
        self.sudo("locale-gen en_US.UTF-8").await?;

        self.step("upgrading system packages");
        self.sudo("apt-get update -q -y").await?;
        self.sudo(Shell::new("apt-get upgrade -q -y").env("DEBIAN_FRONTEND", "noninteractive"))
            .await?;
        self.sudo("apt-get clean -q -y").await?;
        self.sudo("apt-get autoremove -q -y").await?;

        self.apt_install("emacs-nox").await?;
        // Ubuntu cloud images ship without it.
        self.apt_install("unzip").await?;

        if self.runner.exists(REBOOT_MARKER).await? {
            self.step("rebooting to finish the upgrade");
            self.sudo("shutdown -h now").await?;
            return Ok(Outcome::RebootScheduled);
        }

        success!("{} is prepared", self.runner.host());
        Ok(Outcome::Done)
    }

    /// Adds the server's package repository and refreshes the package index.
    pub async fn configure_apt(&self) -> Result<Outcome> {
        let server = &self.config.server;
        let mut outcome = Outcome::Skipped;

        if !self.runner.exists(&server.sources_list).await? {
            self.step("adding package repository");
            let key = quote(server.pubkey_name());
            self.run(format!("wget -q {}", quote(&server.pubkey_url)))
                .await?;
            self.sudo(format!("apt-key add {key}")).await?;
            self.run(format!("rm -f {key}")).await?;

            let codename = self.run("lsb_release -sc").await?;
            let entry = format!("deb {} {} release", server.apt_url, codename);
            self.sudo(format!(
                "printf '%s\\n' {} >> {}",
                quote(&entry),
                quote(&server.sources_list)
            ))
            .await?;
            outcome = Outcome::Done;
        }

        self.sudo("apt-get -q -y update").await?;
        Ok(outcome)
    }
}
