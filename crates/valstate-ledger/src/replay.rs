use tracing::{debug, info};
use valstate_types::ProtocolVersion;

use crate::error::Result;
use crate::projection::ValidatorSet;
use crate::records::RecordDecoder;
use crate::traits::LedgerSource;

/// Result of replaying a ledger into validator snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub protocol: ProtocolVersion,
    pub evaluated_records: u64,
    /// Records dropped because they carry no target identity.
    pub skipped_records: u64,
    pub validators: ValidatorSet,
}

/// Deterministic, single-pass replay of a ledger.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Read every record from `source` and project it.
    pub fn replay<S: LedgerSource + ?Sized>(
        source: &S,
        protocol: ProtocolVersion,
    ) -> Result<ReplayResult> {
        let lines = source.read_all()?;
        Self::replay_lines(ValidatorSet::new(), &lines, protocol)
    }

    /// Decode and apply `lines` on top of `validators`.
    ///
    /// Each line is decoded before anything is applied, so a malformed line
    /// aborts the replay without touching the set. There is no partial
    /// result on error.
    pub fn replay_lines<I, L>(
        mut validators: ValidatorSet,
        lines: I,
        protocol: ProtocolVersion,
    ) -> Result<ReplayResult>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        info!(%protocol, "parsing ledger transactions");
        let decoder = RecordDecoder::new(protocol);
        let mut evaluated_records = 0u64;
        let mut skipped_records = 0u64;

        for (index, line) in lines.into_iter().enumerate() {
            let line_no = index as u64 + 1;
            evaluated_records += 1;
            match decoder.decode(line_no, line.as_ref())? {
                Some(record) => {
                    validators.apply(record);
                }
                None => {
                    debug!(line = line_no, "skipping transaction without dest");
                    skipped_records += 1;
                }
            }
        }

        info!(
            records = evaluated_records,
            skipped = skipped_records,
            validators = validators.len(),
            "ledger replay complete"
        );
        Ok(ReplayResult {
            protocol,
            evaluated_records,
            skipped_records,
            validators,
        })
    }
}
