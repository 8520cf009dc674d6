use chrono::{NaiveDate, NaiveTime};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use super::{
    cleaning::{CandidateRow, parse_balance},
    error::NormalizeError,
    record::{LedgerRecord, TransactionType},
};

const OUTPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Only tried when the text starts with a four digit year.
const YEAR_FIRST_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

// two digit year variants come first, %Y would read "24" as year 24
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%d %B %y",
    "%d %B %Y",
    "%d %b %y",
    "%d %b %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
];

const MONTH_NAME_FIRST_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%B %d %Y", "%b %d %Y"];

const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%m-%d-%y", "%m-%d-%Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

pub fn normalize_rows(rows: Vec<CandidateRow>) -> Result<Vec<LedgerRecord>, NormalizeError> {
    rows.into_iter().map(normalize_row).collect()
}

pub fn normalize_row(row: CandidateRow) -> Result<LedgerRecord, NormalizeError> {
    // superseded below by the balance sign, kept as the first pass over the type
    let mapped_type = map_transaction_type(&row.transaction_type);

    let document_date = format_date(&row.document_date);
    let document_balance = format_balance(&row.document_balance);

    let transaction_type = transaction_type_from_balance(&document_balance).ok_or_else(|| {
        NormalizeError::InvalidBalance {
            row: row.row,
            value: document_balance.clone(),
        }
    })?;

    if mapped_type != transaction_type.code() {
        tracing::debug!(
            "row {}: transaction type '{}' overridden by balance sign as {}",
            row.row,
            row.transaction_type,
            transaction_type
        );
    }

    return Ok(LedgerRecord {
        debtor_reference: row.debtor_reference,
        transaction_type,
        document_number: row.document_number,
        document_date,
        document_balance,
    });
}

/// "Invoice" → "INV", "Credit Note" → "CRD", anything else unchanged.
pub fn map_transaction_type(value: &str) -> &str {
    match value {
        "Invoice" => TransactionType::Invoice.code(),
        "Credit Note" => TransactionType::Credit.code(),
        other => other,
    }
}

/// Reformats a day-first date as dd/mm/yyyy. Text that is not a recognizable
/// date is returned unchanged.
pub fn format_date(value: &str) -> String {
    match parse_day_first(value) {
        Some(date) => date.format(OUTPUT_DATE_FORMAT).to_string(),
        None => {
            tracing::debug!("keeping unparseable date '{}'", value);
            value.to_owned()
        }
    }
}

pub fn parse_day_first(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    let bytes = value.as_bytes();

    // yyyymmdd
    if bytes.len() == 8 && bytes.iter().all(u8::is_ascii_digit) {
        return parse_compact(value);
    }

    let year_first = bytes.len() > 4
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && !bytes[4].is_ascii_digit();

    if year_first {
        return YEAR_FIRST_FORMATS
            .iter()
            .find_map(|format| parse_with(value, format));
    }

    DAY_FIRST_FORMATS
        .iter()
        .chain(MONTH_NAME_FIRST_FORMATS)
        .chain(MONTH_FIRST_FORMATS)
        .find_map(|format| parse_with(value, format))
}

fn parse_with(value: &str, format: &str) -> Option<NaiveDate> {
    let (date, remainder) = NaiveDate::parse_and_remainder(value, format).ok()?;
    is_time_of_day(remainder).then_some(date)
}

fn parse_compact(value: &str) -> Option<NaiveDate> {
    let year = value.get(..4)?.parse().ok()?;
    let month = value.get(4..6)?.parse().ok()?;
    let day = value.get(6..8)?.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn is_time_of_day(remainder: &str) -> bool {
    if remainder.is_empty() {
        return true;
    }

    let Some(time) = remainder
        .strip_prefix('T')
        .or_else(|| remainder.strip_prefix(' '))
    else {
        return false;
    };

    TIME_FORMATS
        .iter()
        .any(|format| NaiveTime::parse_from_str(time.trim(), format).is_ok())
}

/// Fixed two fraction digits of the balance read as a double, so the digits
/// follow the binary value ("2.675" prints as "2.67"). Text that does not
/// parse is returned unchanged.
pub fn format_balance(value: &str) -> String {
    let Some(balance) = parse_balance(value) else {
        return value.to_owned();
    };

    let float = value.trim().parse::<f64>().ok().or_else(|| balance.to_f64());

    match float {
        Some(float) => format!("{:.2}", float),
        None => value.to_owned(),
    }
}

/// Credit when the balance is negative, invoice otherwise.
pub fn transaction_type_from_balance(balance: &str) -> Option<TransactionType> {
    let balance = parse_balance(balance)?;

    if balance < Decimal::ZERO {
        Some(TransactionType::Credit)
    } else {
        Some(TransactionType::Invoice)
    }
}
