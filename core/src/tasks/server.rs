use std::net::{Ipv4Addr, SocketAddrV4};

use authbench_common::render::group::GroupSpec;
use authbench_common::render::hook::HookEnv;
use authbench_common::success;

use crate::Result;
use crate::remote::{Shell, quote};
use crate::tasks::{Outcome, Provisioner};

impl Provisioner {
    /// Installs and configures the server, then hooks it up to the service.
    pub async fn provision_p4d(&self) -> Result<Outcome> {
        self.install_p4d().await?;
        self.configure_p4d().await?;
        self.install_extension().await?;
        Ok(Outcome::Done)
    }

    /// Installs the server packages and creates the server instance.
    pub async fn install_p4d(&self) -> Result<Outcome> {
        let server = &self.config.server;
        self.configure_apt().await?;
        self.apt_install("helix-cli").await?;
        self.apt_install("helix-p4d").await?;

        let ip = self.public_ip().await?;
        self.step("creating the server instance");
        self.sudo(format!(
            "{} -n -p {} -u {} -P {} {}",
            quote(&server.configure_script),
            self.p4port(ip.addr),
            quote(&server.super_user),
            quote(&server.super_password),
            quote(&server.instance),
        ))
        .await?;

        success!("server {} listening on {}", server.instance, self.p4port(ip.addr));
        Ok(Outcome::Done)
    }

    /// Sets up the test accounts: the super user gets a ticket that never
    /// expires, and password logins stay allowed next to SSO.
    pub async fn configure_p4d(&self) -> Result<Outcome> {
        let server = &self.config.server;
        let ip = self.public_ip().await?;

        self.step("configuring users and groups");
        let group = GroupSpec::no_timeout(&server.super_user).render()?;
        self.runner
            .feed(Shell::new(self.p4(ip.addr, "group -i")), group.into_bytes())
            .await?;

        // Log in again so the new ticket picks up the unlimited timeout.
        self.run(self.p4(ip.addr, "logout")).await?;
        self.runner
            .feed(
                Shell::new(self.p4(ip.addr, "login")),
                format!("{}\n", server.super_password).into_bytes(),
            )
            .await?;
        self.run(self.p4(ip.addr, "configure set auth.sso.allow.passwd=1"))
            .await?;

        self.step("restarting the server");
        let instance = quote(&server.instance);
        self.runner
            .sudo_as(&server.os_user, Shell::new(format!("p4dctl stop {instance}")))
            .await?;
        self.runner
            .sudo_as(&server.os_user, Shell::new(format!("p4dctl start {instance}")))
            .await?;
        Ok(Outcome::Done)
    }

    /// Installs the login extension that sends users to the service.
    pub async fn install_extension(&self) -> Result<Outcome> {
        let config = &self.config;
        let ip = self.public_ip().await?;
        let hook = HookEnv::for_host(ip.addr, config.server.port, config.service.port);

        self.step("installing the login extension");
        self.run(
            Shell::new("node hook.js")
                .cwd(&config.service.directory)
                .envs(hook.vars()),
        )
        .await?;

        success!("extension installed, logins go to {}", hook.auth_url);
        Ok(Outcome::Done)
    }

    fn p4port(&self, ip: Ipv4Addr) -> SocketAddrV4 {
        SocketAddrV4::new(ip, self.config.server.port)
    }

    fn p4(&self, ip: Ipv4Addr, args: &str) -> String {
        format!(
            "p4 -p {} -u {} {args}",
            self.p4port(ip),
            quote(&self.config.server.super_user)
        )
    }
}
