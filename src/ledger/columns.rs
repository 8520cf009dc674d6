use super::grid::Table;

pub const DEBTOR_REFERENCE: &str = "Debtor Reference";
pub const TRANSACTION_TYPE: &str = "Transaction Type";
pub const DOCUMENT_NUMBER: &str = "Document Number";
pub const DOCUMENT_DATE: &str = "Document Date";
pub const DOCUMENT_BALANCE: &str = "Document Balance";

/// Output columns, in output order.
pub const LEDGER_COLUMNS: [&str; 5] = [
    DEBTOR_REFERENCE,
    TRANSACTION_TYPE,
    DOCUMENT_NUMBER,
    DOCUMENT_DATE,
    DOCUMENT_BALANCE,
];

const COLUMN_MAPPING: [(&str, &str); 5] = [
    ("Name", DEBTOR_REFERENCE),
    ("Transaction type", TRANSACTION_TYPE),
    ("No.", DOCUMENT_NUMBER),
    ("Date", DOCUMENT_DATE),
    ("Open balance", DOCUMENT_BALANCE),
];

pub fn canonical_name(label: &str) -> Option<&'static str> {
    COLUMN_MAPPING
        .iter()
        .find(|(source, _)| *source == label)
        .map(|(_, canonical)| *canonical)
}

/// Renames the known export columns. Unknown columns keep their label.
pub fn remap_columns(mut table: Table) -> Table {
    for column in table.columns.iter_mut() {
        if let Some(canonical) = canonical_name(column) {
            *column = canonical.to_owned();
        }
    }

    table
}
