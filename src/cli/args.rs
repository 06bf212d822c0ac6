use crate::utils::constants::{DEFAULT_CONFIG_FILE, DEFAULT_DATA_DIR};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netatmo-importer")]
#[command(about = "Import Netatmo CSV exports into InfluxDB")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        default_value = DEFAULT_CONFIG_FILE,
        help = "YAML/TOML config file with InfluxDB credentials"
    )]
    pub config: PathBuf,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only print warnings and errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import every *.csv export in a directory
    Import {
        #[arg(
            short = 'd',
            long,
            default_value = DEFAULT_DATA_DIR,
            help = "Directory containing Netatmo CSV exports"
        )]
        folder: PathBuf,

        #[arg(
            long,
            value_name = "PATH",
            help = "Write line protocol to PATH ('-' for stdout) instead of InfluxDB"
        )]
        dry_run: Option<PathBuf>,
    },

    /// Show what a single export contains without writing anything
    Inspect {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_defaults() {
        let cli = Cli::try_parse_from(["netatmo-importer", "import"]).unwrap();

        assert_eq!(cli.config, PathBuf::from("config.yml"));
        assert_eq!(cli.log_level(), "info");
        match cli.command {
            Commands::Import { folder, dry_run } => {
                assert_eq!(folder, PathBuf::from("./data"));
                assert!(dry_run.is_none());
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_import_options() {
        let cli = Cli::try_parse_from([
            "netatmo-importer",
            "import",
            "-d",
            "exports",
            "--dry-run",
            "-",
            "-c",
            "influx.toml",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("influx.toml"));
        assert_eq!(cli.log_level(), "debug");
        match cli.command {
            Commands::Import { folder, dry_run } => {
                assert_eq!(folder, PathBuf::from("exports"));
                assert_eq!(dry_run, Some(PathBuf::from("-")));
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["netatmo-importer", "-v", "-q", "import"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inspect_requires_file() {
        assert!(Cli::try_parse_from(["netatmo-importer", "inspect"]).is_err());

        let cli =
            Cli::try_parse_from(["netatmo-importer", "inspect", "-f", "a.csv", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Inspect { json: true, .. }));
    }
}
