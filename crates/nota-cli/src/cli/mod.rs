use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, LedgerCommands, RunArgs};

/// Top-level CLI parser for the `nota` binary.
#[derive(Debug, Parser)]
#[command(
    name = "nota",
    version,
    about = "Deliver marketplace invoice exports to the accounting SFTP drop"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging, rejection details)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file used instead of ./nota.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, LedgerCommands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_expected_count() {
        let cli = Cli::try_parse_from(["nota", "run", "--expected", "42"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Run(ref args) if args.expected == 42));
    }

    #[test]
    fn expected_defaults_to_zero() {
        let cli = Cli::try_parse_from(["nota", "run"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Run(ref args) if args.expected == 0));
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "nota",
            "--config",
            "/etc/nota/nota.toml",
            "--format",
            "raw",
            "--verbose",
            "otp",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/nota/nota.toml")));
        assert!(matches!(cli.command, Commands::Otp));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["nota", "ledger", "list", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Ledger {
                action: LedgerCommands::List
            }
        ));
    }

    #[test]
    fn ledger_check_requires_a_file() {
        assert!(Cli::try_parse_from(["nota", "ledger", "check"]).is_err());

        let cli = Cli::try_parse_from(["nota", "ledger", "check", "35240001.xml"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Ledger {
                action: LedgerCommands::Check { ref file }
            } if file == "35240001.xml"
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["nota", "--format", "xml", "otp"]).is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["nota", "-q", "-c", "alt.toml", "otp"]).expect("cli should parse");
        let flags = cli.global_flags();
        assert!(flags.quiet);
        assert_eq!(flags.config.as_deref(), Some(Path::new("alt.toml")));
    }
}
