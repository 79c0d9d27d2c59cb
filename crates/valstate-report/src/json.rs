use std::io::Write;

use valstate_types::ValidatorSnapshot;

use crate::error::Result;

/// Write the snapshots as a single JSON array followed by a newline.
///
/// Each element's keys are sorted; attributes never written are omitted.
pub fn write_json<'a, W, I>(mut out: W, snapshots: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ValidatorSnapshot>,
{
    let records: Vec<_> = snapshots.into_iter().map(ValidatorSnapshot::to_record).collect();
    serde_json::to_writer(&mut out, &records)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
