use std::borrow::Cow;

/// A single decoded cell. Text stays text: a number is never coerced into a
/// string for comparisons, only for rendering field values.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Exact, case-sensitive match that only succeeds for text cells.
    pub fn is_text(&self, expected: &str) -> bool {
        match self {
            Cell::Text(value) => value == expected,
            _ => false,
        }
    }

    /// Renders the cell as field text. Integral numbers drop the fraction.
    pub fn render(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Text(value) => Some(Cow::Borrowed(value.as_str())),
            Cell::Number(value) => Some(Cow::Owned(render_number(*value))),
            Cell::Empty => None,
        }
    }
}

fn render_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    format!("{}", value)
}

/// Rows exactly as decoded from the source, before any header is known.
#[derive(Debug, Default, Clone)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Builds a table from decoded rows. Rows without a single non-empty cell are
    /// dropped and the rest are padded to the widest row.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let mut rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in rows.iter_mut() {
            row.resize(width, Cell::Empty);
        }

        return Self { rows };
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }
}

/// Rows with labelled columns. Every row is as wide as `columns`.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Position of the first column carrying `label`.
    pub fn column(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == label)
    }
}
