use anyhow::Context;
use clap::Parser;

use surebet::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use surebet::adapter::inbound::cli::output::{self, OutputMode};
use surebet::adapter::inbound::cli::{config, detect, matches, normalize, run};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(
        OutputMode {
            json: cli.json,
            quiet: cli.quiet,
            verbose: cli.verbose,
        },
        &cli.color,
    );

    if let Err(error) = dispatch(cli.command).await {
        output::error(&format!("{error:#}"));
        std::process::exit(1);
    }
}

async fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Detect(args) => detect::execute(&args).await.context("detection failed")?,
        Commands::Run(args) => run::execute(&args).await.context("run failed")?,
        Commands::Match(args) => matches::execute(&args).await.context("matching failed")?,
        Commands::Normalize(args) => normalize::execute(&args)?,
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force)?,
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(args.config.as_deref())?,
        Commands::Config(ConfigCommand::Validate(args)) => {
            config::execute_validate(args.config.as_deref()).context("invalid configuration")?;
        }
    }
    Ok(())
}
