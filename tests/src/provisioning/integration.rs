#![cfg(test)]
use std::net::Ipv4Addr;
use std::sync::Arc;

use authbench_common::config::Config;
use authbench_common::network::classify::{self, AddressError};
use authbench_core::ProvisionError;
use authbench_core::discovery;
use authbench_core::remote::CommandOutput;
use authbench_core::remote::recording::RecordingRunner;
use authbench_core::tasks::{Outcome, Provisioner, Task};

fn provisioner(runner: RecordingRunner, cfg: Config) -> (Provisioner, Arc<RecordingRunner>) {
    let runner = Arc::new(runner);
    (Provisioner::new(Box::new(runner.clone()), cfg), runner)
}

/// A freshly booted Vagrant box with a NAT address and a host-only address.
fn fresh_vm(host: &str) -> RecordingRunner {
    RecordingRunner::new(host)
        .respond("which ", CommandOutput::failed(1, ""))
        .respond("test -e ", CommandOutput::failed(1, ""))
        .respond("hostname -I", CommandOutput::ok("10.0.2.15 203.0.113.7 \n"))
        .respond("whoami", CommandOutput::ok("vagrant\n"))
        .respond("lsb_release -sc", CommandOutput::ok("bionic\n"))
}

fn index_of(commands: &[String], needle: &str) -> usize {
    commands
        .iter()
        .position(|c| c.contains(needle))
        .unwrap_or_else(|| panic!("no command containing {needle:?}"))
}

/// Service provisioning on a fresh host installs the whole toolchain before
/// touching the service, and advertises the public address.
#[tokio::test]
async fn provision_service_on_fresh_host() -> anyhow::Result<()> {
    let (prov, runner) = provisioner(fresh_vm("svc"), Config::default());

    let outcome = prov.run_task(Task::ProvisionService).await?;
    assert_eq!(outcome, Outcome::Done);

    let commands = runner.commands();
    assert!(index_of(&commands, "which pm2") < index_of(&commands, "which node"));
    assert!(index_of(&commands, "apt-get install -q -y nodejs") < index_of(&commands, "npm install -q -g pm2"));
    assert!(index_of(&commands, "npm install -q -g pm2") < index_of(&commands, "apt-get install -q -y git"));
    assert!(index_of(&commands, "unzip -q") < index_of(&commands, "npm ci -q"));

    let ecosystem = runner
        .recorded()
        .into_iter()
        .find(|c| c.command.starts_with("cat > "))
        .and_then(|c| c.stdin)
        .map(String::from_utf8)
        .transpose()?
        .unwrap_or_default();
    assert!(ecosystem.starts_with("// auth-svc configuration for pm2\n"));
    assert!(ecosystem.contains("https://203.0.113.7:3000"));
    assert!(!ecosystem.contains("10.0.2.15"));
    Ok(())
}

/// With only private addresses the server is bound to the first one.
#[tokio::test]
async fn provision_p4d_on_private_network() -> anyhow::Result<()> {
    let runner = RecordingRunner::new("p4d")
        .respond("test -e ", CommandOutput::failed(1, ""))
        .respond("lsb_release -sc", CommandOutput::ok("xenial\n"))
        .respond("hostname -I", CommandOutput::ok("192.168.56.20 10.0.2.15\n"));
    let (prov, runner) = provisioner(runner, Config::default());

    assert_eq!(prov.run_task(Task::ProvisionP4d).await?, Outcome::Done);

    let commands = runner.commands();
    assert!(commands.iter().any(|c| c.contains("ubuntu xenial release")));
    assert!(commands.iter().any(|c| c.contains("-p 192.168.56.20:1666")));
    assert!(
        commands
            .iter()
            .any(|c| c.contains("AUTH_URL=https://192.168.56.20:3000"))
    );
    assert!(index_of(&commands, "helix-p4d") < index_of(&commands, "group -i"));
    Ok(())
}

#[tokio::test]
async fn configured_names_flow_into_commands() -> anyhow::Result<()> {
    let mut cfg = Config::default();
    cfg.server.instance = "bench".to_string();
    cfg.server.super_user = "admin".to_string();
    cfg.server.port = 1777;
    let (prov, runner) = provisioner(fresh_vm("p4d"), cfg);

    prov.run_task(Task::ConfigureP4d).await?;

    let recorded = runner.recorded();
    let group = recorded
        .iter()
        .find(|c| c.command.ends_with("group -i"))
        .map(|c| c.command.clone());
    assert_eq!(group.as_deref(), Some("p4 -p 203.0.113.7:1777 -u admin group -i"));
    assert!(
        recorded
            .iter()
            .any(|c| c.command == "sudo -H -u perforce sh -c 'p4dctl start bench'")
    );
    Ok(())
}

#[tokio::test]
async fn failing_step_aborts_the_task() {
    let runner = fresh_vm("svc").respond("apt-get install -q -y curl", CommandOutput::failed(100, "E: broken\n"));
    let (prov, runner) = provisioner(runner, Config::default());

    let err = prov.run_task(Task::InstallNodejs).await.unwrap_err();
    assert!(matches!(err, ProvisionError::Remote(_)));
    assert!(err.to_string().contains("E: broken"));
    assert!(!runner.commands().iter().any(|c| c.contains("curl -sL")));
}

#[tokio::test]
async fn host_without_addresses_is_an_error() {
    let runner = RecordingRunner::new("vm").respond("hostname -I", CommandOutput::ok("\n"));

    let err = discovery::discover_public_ip(&runner).await.unwrap_err();
    assert!(matches!(err, ProvisionError::Address(AddressError::EmptyInput)));
}

#[tokio::test]
async fn dry_run_previews_a_full_provision() -> anyhow::Result<()> {
    let (prov, runner) = provisioner(RecordingRunner::dry_run("default"), Config::default());

    assert_eq!(prov.run_task(Task::ProvisionService).await?, Outcome::Done);
    let ip = prov.public_ip().await?;
    assert_eq!(ip.addr, Ipv4Addr::new(10, 0, 2, 15));
    assert!(ip.fallback);
    assert!(!runner.commands().is_empty());
    Ok(())
}

#[test]
fn classifier_agrees_with_discovery_parsing() -> anyhow::Result<()> {
    let output = "172.17.0.1 10.0.2.15 8.8.4.4 192.168.1.5\n";
    let candidates = classify::parse_candidates(output);

    let chosen = classify::select_public_ip(candidates.as_slice())?;
    assert_eq!(chosen.addr, Ipv4Addr::new(8, 8, 4, 4));
    assert!(!chosen.fallback);
    assert!(classify::is_private(candidates[0])?);
    assert!(!classify::is_private("172.32.0.1")?);
    Ok(())
}
