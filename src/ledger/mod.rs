pub mod cleaning;
pub mod columns;
pub mod error;
pub mod grid;
pub mod header;
pub mod loader;
pub mod normalize;
pub mod projector;
pub mod record;

pub use error::NormalizeError;
pub use projector::serialize;
pub use record::{LedgerRecord, LedgerTable, TransactionType};

/// Runs an uploaded export through every stage: load, locate the header,
/// rename columns, filter and clean rows, normalize fields and project the
/// ledger columns.
#[tracing::instrument(skip(bytes), fields(size = bytes.len(), id = %ulid::Ulid::new()))]
pub fn process(bytes: &[u8], file_name: &str) -> Result<LedgerTable, NormalizeError> {
    let result = run(bytes, file_name);

    match &result {
        Ok(table) => tracing::info!("normalized {} ledger records", table.len()),
        Err(err) => tracing::warn!("normalization failed: {}", err),
    }

    result
}

fn run(bytes: &[u8], file_name: &str) -> Result<LedgerTable, NormalizeError> {
    let raw = loader::load(bytes, file_name)?;
    let table = header::locate_header(raw)?;
    let table = columns::remap_columns(table);
    let rows = cleaning::filter_rows(table)?;
    let records = normalize::normalize_rows(rows)?;

    Ok(projector::project(records))
}
