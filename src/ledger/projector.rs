use anyhow::Context;

use super::{
    columns::LEDGER_COLUMNS,
    record::{LedgerRecord, LedgerTable},
};

pub fn project(records: Vec<LedgerRecord>) -> LedgerTable {
    LedgerTable { records }
}

/// Writes the table as comma separated text with a header line and `\n` line
/// endings. An empty table still gets its header.
pub fn serialize(table: &LedgerTable) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(LEDGER_COLUMNS)
        .context("error writing header")?;

    for record in &table.records {
        writer.serialize(record).context("error writing record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("error flushing csv: {}", err.error()))?;

    return Ok(bytes);
}
