//! Report rendering for valstate.
//!
//! Two output modes are supported:
//! - [`OutputFormat::Csv`]: fixed column order, one header row, one row per
//!   validator, missing fields empty
//! - [`OutputFormat::Json`]: an array of objects with lexicographically
//!   sorted keys and absent fields omitted
//!
//! Both modes preserve the iteration order of the snapshots they are given.

pub mod csv;
pub mod error;
pub mod json;

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::info;
use valstate_types::ValidatorSnapshot;

pub use crate::csv::{write_csv, CSV_COLUMNS};
pub use crate::error::{ReportError, Result};
pub use crate::json::write_json;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Write `snapshots` to `out` in the requested format.
pub fn write_report<'a, W, I>(out: W, snapshots: I, format: OutputFormat) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ValidatorSnapshot>,
{
    info!(format = format.as_str(), "serializing validator snapshots");
    match format {
        OutputFormat::Csv => write_csv(out, snapshots),
        OutputFormat::Json => write_json(out, snapshots),
    }
}

/// Render the full report into memory.
///
/// Nothing reaches the caller's output until rendering has succeeded.
pub fn render_report<'a, I>(snapshots: I, format: OutputFormat) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a ValidatorSnapshot>,
{
    let mut buf = Vec::new();
    write_report(&mut buf, snapshots, format)?;
    Ok(buf)
}
