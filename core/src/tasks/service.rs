use authbench_common::render::ecosystem::EcosystemConfig;
use authbench_common::success;

use crate::Result;
use crate::remote::{Shell, quote};
use crate::tasks::{Outcome, Provisioner};

impl Provisioner {
    /// Installs the authentication service from its release archive and
    /// registers it with pm2 so it survives reboots.
    pub async fn provision_service(&self) -> Result<Outcome> {
        let service = &self.config.service;
        self.install_pm2().await?;
        // npm needs git for some dependencies.
        self.apt_install("git").await?;
        self.fetch_archive().await?;

        let ip = self.public_ip().await?;
        let ecosystem = EcosystemConfig::for_service(service, ip.addr).render()?;

        self.step("installing service dependencies");
        self.run(Shell::new("npm ci -q").cwd(&service.directory))
            .await?;
        self.runner
            .put(ecosystem.into_bytes(), &service.ecosystem_path())
            .await?;

        self.step("starting the service");
        self.run(Shell::new("pm2 start ecosystem.config.js").cwd(&service.directory))
            .await?;

        let user = self.run("whoami").await?;
        let user = quote(&user);
        self.sudo(format!("pm2 startup systemd -u {user} --hp /home/{user}"))
            .await?;
        self.run("pm2 save").await?;

        success!("{} running at {}", service.app_name, ip);
        Ok(Outcome::Done)
    }

    /// Replaces a running installation with the latest archive, keeping its
    /// ecosystem file.
    pub async fn update_service(&self) -> Result<Outcome> {
        let service = &self.config.service;
        let dir = quote(&service.directory);
        let old = quote(&service.backup_directory());

        self.step("stopping the service");
        self.run(format!("pm2 stop {}", quote(&service.app_name)))
            .await?;
        self.run(format!("rm -rf {old}")).await?;
        self.run(format!("mv {dir} {old}")).await?;
        self.fetch_archive().await?;
        self.run(format!("cp {old}/ecosystem.config.js {dir}"))
            .await?;

        self.step("restarting the service");
        self.run(Shell::new("npm ci -q").cwd(&service.directory))
            .await?;
        self.run(Shell::new("pm2 start ecosystem.config.js").cwd(&service.directory))
            .await?;

        success!("{} updated", service.app_name);
        Ok(Outcome::Done)
    }

    async fn fetch_archive(&self) -> Result<()> {
        let service = &self.config.service;
        let archive = quote(service.archive_name());

        self.step("downloading the service archive");
        self.run(format!("wget -q {}", quote(&service.archive_url)))
            .await?;
        self.run(format!("unzip -q {archive}")).await?;
        self.run(format!("rm {archive}")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::CommandOutput;
    use crate::remote::recording::RecordingRunner;
    use crate::tasks::test_support::provisioner;

    fn position(commands: &[String], needle: &str) -> usize {
        commands
            .iter()
            .position(|c| c.contains(needle))
            .unwrap_or_else(|| panic!("no command containing {needle:?} in {commands:#?}"))
    }

    #[tokio::test]
    async fn provision_service_writes_ecosystem_for_public_ip() {
        let (prov, runner) = provisioner(
            RecordingRunner::new("vm")
                .respond("hostname -I", CommandOutput::ok("10.0.2.15 198.51.100.4\n"))
                .respond("whoami", CommandOutput::ok("vagrant\n")),
        );

        assert_eq!(prov.provision_service().await.unwrap(), Outcome::Done);

        let recorded = runner.recorded();
        let put = recorded
            .iter()
            .find(|c| c.command == "cat > p4-auth-integ-svc/ecosystem.config.js")
            .unwrap();
        let file = String::from_utf8(put.stdin.clone().unwrap()).unwrap();
        assert!(file.contains(r#""SVC_BASE_URI": "https://198.51.100.4:3000""#));

        let commands = runner.commands();
        assert!(position(&commands, "wget -q") < position(&commands, "unzip -q p4-auth-integ-svc.zip"));
        assert!(position(&commands, "rm p4-auth-integ-svc.zip") < position(&commands, "hostname -I"));
        assert!(position(&commands, "npm ci -q") < position(&commands, "cat > "));
        assert!(position(&commands, "cat > ") < position(&commands, "pm2 start"));
        assert!(commands.contains(&"cd p4-auth-integ-svc && pm2 start ecosystem.config.js".to_string()));
        assert!(commands.contains(
            &"sudo -H sh -c 'pm2 startup systemd -u vagrant --hp /home/vagrant'".to_string()
        ));
        assert_eq!(commands.last().map(String::as_str), Some("pm2 save"));
    }

    #[tokio::test]
    async fn update_service_keeps_old_ecosystem() {
        let (prov, runner) = provisioner(RecordingRunner::new("vm"));

        assert_eq!(prov.update_service().await.unwrap(), Outcome::Done);
        assert_eq!(
            runner.commands(),
            [
                "pm2 stop auth-svc",
                "rm -rf p4-auth-integ-svc.old",
                "mv p4-auth-integ-svc p4-auth-integ-svc.old",
                "wget -q https://swarm.perforce.com/archives/depot/main/p4-auth-integ-svc.zip",
                "unzip -q p4-auth-integ-svc.zip",
                "rm p4-auth-integ-svc.zip",
                "cp p4-auth-integ-svc.old/ecosystem.config.js p4-auth-integ-svc",
                "cd p4-auth-integ-svc && npm ci -q",
                "cd p4-auth-integ-svc && pm2 start ecosystem.config.js",
            ]
        );
    }

    #[tokio::test]
    async fn update_service_stops_on_failure() {
        let (prov, runner) = provisioner(RecordingRunner::new("vm").respond("pm2 stop", CommandOutput::failed(1, "")));

        assert!(prov.update_service().await.is_err());
        assert_eq!(runner.commands(), ["pm2 stop auth-svc"]);
    }
}
