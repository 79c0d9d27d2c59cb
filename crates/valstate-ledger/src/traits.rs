use tracing::{info, warn};

use crate::error::Result;

/// Read boundary for an ordered ledger of raw transaction lines.
///
/// Records are numbered from 1. Implementations return lines verbatim; the
/// caller decodes them.
pub trait LedgerSource: Send + Sync {
    /// Total number of records in the ledger.
    fn record_count(&self) -> Result<u64>;

    /// Records `from..=to`, in ledger order.
    fn read_range(&self, from: u64, to: u64) -> Result<Vec<String>>;

    /// Every record, in ledger order.
    fn read_all(&self) -> Result<Vec<String>> {
        let count = self.record_count()?;
        info!(count, "entries in ledger");
        if count == 0 {
            return Ok(Vec::new());
        }

        let lines = self.read_range(1, count)?;
        info!(received = lines.len(), "ledger entries received");
        if lines.len() as u64 != count {
            warn!(
                expected = count,
                received = lines.len(),
                "ledger returned a different number of entries than announced"
            );
        }
        Ok(lines)
    }
}
