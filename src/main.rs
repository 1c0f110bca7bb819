use clap::Parser;
use log::LevelFilter;
use miette::Result;
use ta_sync::cli::{Cli, Commands};
use ta_sync::config::SyncConfig;
use ta_sync::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();

    let printer = Printer::new();

    match cli.command {
        Commands::Export(args) => {
            let config = SyncConfig::load_or_default(&cli.config)?;
            ta_sync::cli::export::run(args, &config, &printer)?
        }
        Commands::Import(args) => {
            let config = SyncConfig::load_or_default(&cli.config)?;
            ta_sync::cli::import::run(args, &config, &printer)?
        }
        Commands::Completions(args) => ta_sync::cli::completions::run(args)?,
    }

    Ok(())
}
