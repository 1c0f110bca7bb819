pub mod completions;
pub mod export;
pub mod import;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CONFIG_FILENAME;

/// ta-sync - move translationAcademy pages between Etherpad and JSON
#[derive(Parser, Debug)]
#[command(name = "ta-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (optional)
    #[arg(long, global = true, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the pads listed in the index pad to a JSON corpus
    Export(export::ExportArgs),

    /// Import a translated JSON corpus into a language's pads
    Import(import::ImportArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from(["ta-sync", "export", "--volume", "2", "--pretty"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("ta-sync.yaml"));
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.volume, Some(2));
                assert!(args.pretty);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_import_with_global_flags() {
        let cli = Cli::try_parse_from([
            "ta-sync", "import", "-l", "fr", "-f", "corpus.json", "--recreate", "-v", "--config",
            "other.yaml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("other.yaml"));
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.lang.as_deref(), Some("fr"));
                assert_eq!(args.file, Some(PathBuf::from("corpus.json")));
                assert!(args.recreate);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
