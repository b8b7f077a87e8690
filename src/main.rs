use clap::Parser;

use changekit::{cli, command, result::Result};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("changekit")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    match cli_args.command {
        cli::Command::ReleaseNotes(args) => {
            command::release_notes::execute(&args).await
        }
        cli::Command::ConsolidateRequirements(args) => {
            command::consolidate::execute(&args)
        }
        cli::Command::ValidateDependencies(args) => {
            command::validate::execute(&args)
        }
    }
}
