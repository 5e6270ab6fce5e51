use anyhow::Context;
use nota_config::NotaConfig;
use nota_ledger::{DeliveryLedger, JsonFileStore};
use serde::Serialize;

use crate::cli::{GlobalFlags, LedgerCommands};
use crate::output::output;

#[derive(Debug, Serialize)]
struct LedgerListResponse {
    path: String,
    count: usize,
    sent: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LedgerCheckResponse {
    file: String,
    delivered: bool,
}

/// Handle `nota ledger`.
pub fn handle(action: &LedgerCommands, flags: &GlobalFlags, config: &NotaConfig) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.ledger.path);
    let ledger = DeliveryLedger::open(store)
        .with_context(|| format!("cannot open ledger at {}", config.ledger.path.display()))?;

    match action {
        LedgerCommands::List => output(
            &LedgerListResponse {
                path: config.ledger.path.display().to_string(),
                count: ledger.len(),
                sent: ledger.entries().map(str::to_owned).collect(),
            },
            flags.format,
        ),
        LedgerCommands::Check { file } => output(
            &LedgerCheckResponse {
                file: file.clone(),
                delivered: ledger.was_delivered(file),
            },
            flags.format,
        ),
    }
}
