use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{LedgerError, Result};
use crate::traits::LedgerSource;

/// In-memory ledger of raw lines for tests, captured dumps, and stdin.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    lines: Vec<String>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a ledger dump, one record per line. Blank lines are dropped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        Ok(Self::from_lines(lines))
    }

    /// Load a ledger dump from `path`, or from stdin when `path` is `-`.
    pub fn open(path: &Path) -> Result<Self> {
        if path == Path::new("-") {
            return Self::from_reader(io::stdin().lock());
        }
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}

impl LedgerSource for InMemoryLedger {
    fn record_count(&self) -> Result<u64> {
        Ok(self.lines.len() as u64)
    }

    fn read_range(&self, from: u64, to: u64) -> Result<Vec<String>> {
        if from == 0 || to == 0 || from > to {
            return Err(LedgerError::InvalidRange { from, to });
        }

        let lines = &self.lines;
        let start = (from - 1) as usize;
        let end = (to as usize).min(lines.len());
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(lines[start..end].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn count_matches_loaded_lines() {
        let ledger = InMemoryLedger::from_lines(["a", "b"]);
        assert_eq!(ledger.record_count().unwrap(), 2);
    }

    #[test]
    fn read_range_is_inclusive_and_validated() {
        let ledger = InMemoryLedger::from_lines(["a", "b", "c"]);
        assert_eq!(ledger.read_range(2, 3).unwrap(), vec!["b", "c"]);
        assert_eq!(ledger.read_range(3, 10).unwrap(), vec!["c"]);
        assert!(ledger.read_range(4, 5).unwrap().is_empty());

        let error = ledger.read_range(3, 2).unwrap_err();
        assert!(matches!(error, LedgerError::InvalidRange { from: 3, to: 2 }));
        assert!(ledger.read_range(0, 1).is_err());
    }

    #[test]
    fn read_all_of_empty_ledger() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.read_all().unwrap().is_empty());
    }

    #[test]
    fn open_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.ledger");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "second").unwrap();
        writeln!(file, "   ").unwrap();
        drop(file);

        let ledger = InMemoryLedger::open(&path).unwrap();
        assert_eq!(ledger.read_all().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = InMemoryLedger::open(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, LedgerError::Io(_)), "unexpected error: {err}");
    }
}
