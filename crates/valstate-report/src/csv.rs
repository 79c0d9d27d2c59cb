use std::borrow::Cow;
use std::io::Write;

use serde_json::Value;
use valstate_types::snapshot::{IDENTITY_COLUMN, ORIGINATOR_COLUMN};
use valstate_types::ValidatorSnapshot;

use crate::error::Result;

/// Report columns, in output order.
pub const CSV_COLUMNS: [&str; 9] = [
    "alias",
    "bls_key",
    "client_ip",
    "client_port",
    "node_ip",
    "node_port",
    "services",
    IDENTITY_COLUMN,
    ORIGINATOR_COLUMN,
];

const LINE_TERMINATOR: &str = "\r\n";

/// Write a header row followed by one row per snapshot.
pub fn write_csv<'a, W, I>(mut out: W, snapshots: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ValidatorSnapshot>,
{
    write_row(&mut out, CSV_COLUMNS.iter().map(|c| Cow::Borrowed(*c)))?;
    for snapshot in snapshots {
        let record = snapshot.to_record();
        write_row(
            &mut out,
            CSV_COLUMNS.iter().map(|column| cell(record.get(column))),
        )?;
    }
    out.flush()?;
    Ok(())
}

fn write_row<'a, W: Write>(out: &mut W, cells: impl Iterator<Item = Cow<'a, str>>) -> Result<()> {
    for (i, value) in cells.enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        out.write_all(escape(&value).as_bytes())?;
    }
    out.write_all(LINE_TERMINATOR.as_bytes())?;
    Ok(())
}

/// Strings are written raw; other JSON values in their compact JSON form.
fn cell(value: Option<&Value>) -> Cow<'static, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Owned(s.clone()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Quote a field if it contains a delimiter, quote, or line break.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
