use std::str::FromStr;

use rust_decimal::Decimal;

use super::{
    columns::{DEBTOR_REFERENCE, DOCUMENT_BALANCE, DOCUMENT_DATE, DOCUMENT_NUMBER, TRANSACTION_TYPE},
    error::NormalizeError,
    grid::{Cell, Table},
};

pub const TOTAL_SENTINEL: &str = "TOTAL";

/// A data row that survived filtering, reduced to the five ledger fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    /// 1-based position below the header row.
    pub row: usize,
    pub debtor_reference: String,
    pub transaction_type: String,
    pub document_number: String,
    pub document_date: String,
    /// Balance text with thousands separators and quotes removed.
    pub document_balance: String,
}

struct LedgerColumns {
    debtor_reference: usize,
    transaction_type: usize,
    document_number: usize,
    document_date: usize,
    document_balance: usize,
}

impl LedgerColumns {
    fn resolve(table: &Table) -> Result<Self, NormalizeError> {
        let find = |label: &str| {
            table
                .column(label)
                .ok_or_else(|| NormalizeError::MissingColumn(label.to_owned()))
        };

        Ok(LedgerColumns {
            debtor_reference: find(DEBTOR_REFERENCE)?,
            transaction_type: find(TRANSACTION_TYPE)?,
            document_number: find(DOCUMENT_NUMBER)?,
            document_date: find(DOCUMENT_DATE)?,
            document_balance: find(DOCUMENT_BALANCE)?,
        })
    }
}

/// Drops incomplete rows, stops at the TOTAL row, cleans balance and
/// document number text and drops zero balances. The order of these steps is
/// significant: a TOTAL row with a missing cell is removed before the
/// sentinel search and so does not truncate anything.
pub fn filter_rows(table: Table) -> Result<Vec<CandidateRow>, NormalizeError> {
    let columns = LedgerColumns::resolve(&table)?;
    let total_rows = table.rows.len();

    let mut complete: Vec<(usize, Vec<Cell>)> = table
        .rows
        .into_iter()
        .enumerate()
        .filter(|(_, row)| !row.iter().any(Cell::is_empty))
        .map(|(index, row)| (index + 1, row))
        .collect();
    let complete_rows = complete.len();

    if let Some(total_index) = complete
        .iter()
        .position(|(_, row)| row[columns.debtor_reference].is_text(TOTAL_SENTINEL))
    {
        complete.truncate(total_index);
    }
    let before_total = complete.len();

    let mut candidates = Vec::with_capacity(complete.len());
    for (row_number, row) in complete {
        let document_balance = clean_balance(&field(&row, columns.document_balance));

        let value = parse_balance(&document_balance).ok_or_else(|| {
            NormalizeError::InvalidBalance {
                row: row_number,
                value: document_balance.clone(),
            }
        })?;
        if value.is_zero() {
            continue;
        }

        candidates.push(CandidateRow {
            row: row_number,
            debtor_reference: field(&row, columns.debtor_reference),
            transaction_type: field(&row, columns.transaction_type),
            document_number: field(&row, columns.document_number).replace('\'', ""),
            document_date: field(&row, columns.document_date),
            document_balance,
        });
    }

    tracing::debug!(
        "{} data rows, {} complete, {} before total, {} with a balance",
        total_rows,
        complete_rows,
        before_total,
        candidates.len()
    );

    return Ok(candidates);
}

fn field(row: &[Cell], index: usize) -> String {
    row[index]
        .render()
        .map(|value| value.into_owned())
        .unwrap_or_default()
}

/// Strips thousands separators and quote characters.
pub fn clean_balance(balance: &str) -> String {
    balance.replace([',', '"'], "")
}

/// Parses balance text as a decimal, accepting surrounding whitespace and
/// scientific notation.
pub fn parse_balance(balance: &str) -> Option<Decimal> {
    let balance = balance.trim();

    Decimal::from_str(balance)
        .or_else(|_| Decimal::from_scientific(balance))
        .ok()
}
