mod commands;
mod terminal;

use commands::{CommandLine, Commands, classify, provision, render};
use authbench_core::tasks::Task;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    let cfg = commands.load_config()?;
    print::banner(cfg.quiet);

    match &commands.command {
        Commands::Task(task) => {
            let task: Task = (*task).into();
            print::header(&format!("{task} on {}", commands.host), cfg.quiet);
            provision::provision(task, &commands, cfg).await
        }
        Commands::PublicIp => {
            print::header("public address", cfg.quiet);
            provision::public_ip(&commands, &cfg).await
        }
        Commands::Classify { addrs, local } => classify::classify(addrs, *local, &cfg),
        Commands::Ranges => {
            classify::ranges(&cfg);
            Ok(())
        }
        Commands::SshConfig => provision::ssh_config(&commands).await,
        Commands::Render { file, ip } => render::render(*file, *ip, &cfg),
    }
}
