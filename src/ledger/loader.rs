use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use super::{
    error::NormalizeError,
    grid::{Cell, RawTable},
};

/// Field values that exporters write for "no value".
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
}

impl SourceFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, NormalizeError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(SourceFormat::Delimited),
            "xls" | "xlsx" => Ok(SourceFormat::Spreadsheet),
            _ => Err(NormalizeError::UnsupportedFormat(extension)),
        }
    }
}

pub fn load(bytes: &[u8], file_name: &str) -> Result<RawTable, NormalizeError> {
    let format = SourceFormat::from_file_name(file_name)?;

    let rows = match format {
        SourceFormat::Delimited => read_delimited(bytes)?,
        SourceFormat::Spreadsheet => read_spreadsheet(bytes)?,
    };

    let table = RawTable::from_rows(rows);
    if table.is_empty() {
        return Err(NormalizeError::EmptyFile);
    }

    tracing::debug!(
        "loaded {} rows, {} columns as {:?}",
        table.rows.len(),
        table.width(),
        format
    );

    return Ok(table);
}

fn read_delimited(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, NormalizeError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(delimited_cell).collect());
    }

    Ok(rows)
}

fn delimited_cell(field: &str) -> Cell {
    if MISSING_MARKERS.contains(&field) {
        return Cell::Empty;
    }

    Cell::text(field)
}

fn read_spreadsheet(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, NormalizeError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(NormalizeError::NoWorksheet)??;

    // rows() starts at the used range, keep column A as the first cell
    let leading_columns = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let rows = range
        .rows()
        .map(|row| {
            std::iter::repeat_n(Cell::Empty, leading_columns)
                .chain(row.iter().map(spreadsheet_cell))
                .collect()
        })
        .collect();

    Ok(rows)
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::String(value) => Cell::text(value.as_str()),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::text(if *value { "True" } else { "False" }),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) if datetime.time() == chrono::NaiveTime::MIN => {
                Cell::text(datetime.format("%Y-%m-%d").to_string())
            }
            Some(datetime) => Cell::text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Number(value.as_f64()),
        },
        Data::DateTimeIso(value) | Data::DurationIso(value) => Cell::text(value.as_str()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}
