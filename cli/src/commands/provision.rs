use std::time::{Duration, Instant};

use anyhow::Context;
use authbench_common::config::Config;
use authbench_common::success;
use authbench_core::discovery;
use authbench_core::remote::CommandRunner;
use authbench_core::remote::recording::RecordingRunner;
use authbench_core::remote::ssh::SshRunner;
use authbench_core::ssh_config;
use authbench_core::tasks::{Outcome, Provisioner, Task};
use colored::*;

use crate::commands::CommandLine;
use crate::terminal::{colors, format, print, spinner};

pub async fn provision(task: Task, args: &CommandLine, cfg: Config) -> anyhow::Result<()> {
    let quiet = cfg.quiet;
    let runner = connect(args).await?;
    let provisioner = Provisioner::new(runner, cfg).on_step(spinner::report_step);

    spinner::start(format!("{task} on {}", args.host));
    let start_time = Instant::now();
    let result = provisioner.run_task(task).await;
    spinner::finish();

    let outcome = result.with_context(|| format!("{task} failed on {}", args.host))?;
    print_summary(task, outcome, start_time.elapsed(), quiet);
    Ok(())
}

pub async fn public_ip(args: &CommandLine, cfg: &Config) -> anyhow::Result<()> {
    let runner = connect(args).await?;
    let chosen = discovery::discover_public_ip(runner.as_ref())
        .await
        .with_context(|| format!("could not determine the address of {}", args.host))?;

    print::set_key_width(&["Host", "Address", "Fallback"]);
    print::aligned_line("Host", args.host.normal());
    print::aligned_line("Address", chosen.addr.to_string().color(colors::PUBLIC_ADDR));
    print::aligned_line("Fallback", if chosen.fallback { "yes" } else { "no" }.normal());
    print::end_of_program(cfg.quiet);
    Ok(())
}

pub async fn ssh_config(args: &CommandLine) -> anyhow::Result<()> {
    let workdir = std::env::current_dir().context("cannot read the working directory")?;
    let path = ssh_config::ensure_ssh_config(&args.ssh_config, &workdir).await?;
    success!("SSH config ready at {}", path.display());
    Ok(())
}

/// The SSH config is generated here, once, before any command is sent.
async fn connect(args: &CommandLine) -> anyhow::Result<Box<dyn CommandRunner>> {
    if args.dry_run {
        return Ok(Box::new(RecordingRunner::dry_run(&args.host)));
    }
    let workdir = std::env::current_dir().context("cannot read the working directory")?;
    let path = ssh_config::ensure_ssh_config(&args.ssh_config, &workdir).await?;
    Ok(Box::new(SshRunner::new(&args.host, path)))
}

fn print_summary(task: Task, outcome: Outcome, total_time: Duration, quiet: u8) {
    let output: String = format!(
        "{} {}: {} in {}",
        task.name().bold(),
        "finished".color(colors::TEXT_DEFAULT),
        format::outcome_to_str(outcome),
        format::elapsed_to_str(total_time)
    );

    match quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => success!("{}", output),
    }
}
