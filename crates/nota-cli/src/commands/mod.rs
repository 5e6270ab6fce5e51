use nota_config::NotaConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod ledger;
pub mod otp;
pub mod run;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    flags: &GlobalFlags,
    config: &NotaConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => run::handle(&args, flags, config).await,
        Commands::Otp => otp::handle(flags, config),
        Commands::Ledger { action } => ledger::handle(&action, flags, config),
    }
}
