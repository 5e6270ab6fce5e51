use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Wait for the export archive, unpack, filter and deliver it.
    Run(RunArgs),
    /// Print the current one-time code for the portal login.
    Otp,
    /// Inspect the record of delivered documents.
    Ledger {
        #[command(subcommand)]
        action: LedgerCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Document count announced by the export, echoed in the report.
    #[arg(long, default_value_t = 0)]
    pub expected: u64,
}

#[derive(Clone, Debug, Subcommand)]
pub enum LedgerCommands {
    /// List every delivered filename.
    List,
    /// Report whether a filename has been delivered.
    Check {
        /// Document filename, e.g. 35240001.xml
        file: String,
    },
}
