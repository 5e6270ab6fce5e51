use anyhow::Context;
use nota_config::NotaConfig;
use nota_core::RunReport;
use nota_delivery::AnyRemote;
use nota_ledger::JsonFileStore;
use serde::Serialize;

use crate::cli::{GlobalFlags, RunArgs};
use crate::output::output;
use crate::pipeline::{RunOutcome, RunPipeline};

#[derive(Debug, Serialize)]
struct RejectionView {
    file: String,
    reason: String,
}

#[derive(Debug, Serialize)]
struct RunResponse {
    #[serde(flatten)]
    report: RunReport,
    ignored: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rejections: Vec<RejectionView>,
}

impl RunResponse {
    fn new(outcome: RunOutcome, with_rejections: bool) -> Self {
        let rejections = if with_rejections {
            outcome
                .rejections
                .into_iter()
                .map(|rejection| RejectionView {
                    file: rejection.file,
                    reason: rejection.reason.to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            ignored: outcome.report.ignored(),
            report: outcome.report,
            rejections,
        }
    }
}

/// Handle `nota run`.
pub async fn handle(args: &RunArgs, flags: &GlobalFlags, config: &NotaConfig) -> anyhow::Result<()> {
    let remote = AnyRemote::from_config(&config.remote).context("remote store unavailable")?;
    let ledger_store = JsonFileStore::new(&config.ledger.path);

    let outcome = RunPipeline::new(config.clone(), remote, ledger_store)
        .run(args.expected)
        .await
        .context("delivery run failed")?;
    tracing::debug!(archive = %outcome.archive.display(), "archive consumed");

    output(&RunResponse::new(outcome, flags.verbose), flags.format)
}
