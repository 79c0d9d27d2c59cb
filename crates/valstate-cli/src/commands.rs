use std::io::Write;

use anyhow::Context;
use tracing::info;
use valstate_ledger::{InMemoryLedger, LedgerSource, ReadLedgerCommand, ReplayEngine};
use valstate_report::render_report;

use crate::config::Settings;

/// Replay the ledger and write the report to `out`.
///
/// The report is rendered in memory first; on any error nothing is written.
pub fn run_report<W: Write>(settings: &Settings, mut out: W) -> anyhow::Result<()> {
    let source = open_source(settings)?;
    let result = ReplayEngine::replay(source.as_ref(), settings.protocol)
        .context("failed to replay ledger")?;

    let report = render_report(result.validators.iter(), settings.format)
        .context("failed to render report")?;
    out.write_all(&report).context("failed to write report")?;
    out.flush().context("failed to write report")?;

    info!(
        protocol = %result.protocol,
        records = result.evaluated_records,
        skipped = result.skipped_records,
        validators = result.validators.len(),
        format = settings.format.as_str(),
        "report written"
    );
    Ok(())
}

fn open_source(settings: &Settings) -> anyhow::Result<Box<dyn LedgerSource>> {
    match &settings.input {
        Some(path) => {
            info!(path = %path.display(), "reading ledger lines from file");
            let ledger = InMemoryLedger::open(path)
                .with_context(|| format!("failed to read ledger from {}", path.display()))?;
            Ok(Box::new(ledger))
        }
        None => {
            info!(
                program = %settings.source.program.display(),
                ledger_type = %settings.source.ledger_type,
                "reading ledger with read_ledger"
            );
            Ok(Box::new(ReadLedgerCommand::new(settings.source.clone())))
        }
    }
}
