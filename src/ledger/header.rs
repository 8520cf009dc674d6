use super::{
    error::NormalizeError,
    grid::{Cell, RawTable, Table},
};

pub const HEADER_MARKER: &str = "Name";

/// Finds the first row whose first cell is the text "Name" and turns it into
/// column labels. Rows above it are preamble and are dropped. The table is as
/// wide as the header without its trailing empty cells; data rows are padded
/// or cut to that width.
pub fn locate_header(raw: RawTable) -> Result<Table, NormalizeError> {
    let header_index = raw
        .rows
        .iter()
        .position(|row| row.first().is_some_and(|cell| cell.is_text(HEADER_MARKER)))
        .ok_or(NormalizeError::HeaderNotFound)?;

    let mut rows = raw.rows;
    let mut data = rows.split_off(header_index + 1);
    let mut header = rows.swap_remove(header_index);

    // trailing separators on wider preamble lines are not columns
    let width = header
        .iter()
        .rposition(|cell| !cell.is_empty())
        .map_or(0, |last| last + 1);
    header.truncate(width);
    for row in data.iter_mut() {
        row.resize(width, Cell::Empty);
    }

    let columns = header
        .iter()
        .map(|cell| cell.render().map(|label| label.into_owned()).unwrap_or_default())
        .collect();

    tracing::debug!(
        "header found at row {}, {} data rows",
        header_index,
        data.len()
    );

    return Ok(Table {
        columns,
        rows: data,
    });
}

#[cfg(test)]
mod test {
    use crate::ledger::{
        error::NormalizeError,
        grid::{Cell, RawTable},
    };

    use super::locate_header;

    fn raw(rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable::from_rows(rows)
    }

    #[test]
    fn test_header_after_preamble() {
        let table = locate_header(raw(vec![
            vec![Cell::text("Bakery Republic"), Cell::Empty],
            vec![Cell::text("Open invoices"), Cell::text("Name")],
            vec![Cell::text("Name"), Cell::text("Date")],
            vec![Cell::text("Alice"), Cell::text("01/02/2024")],
            vec![Cell::text("Name"), Cell::text("again")],
        ]))
        .unwrap();

        assert_eq!(table.columns, vec!["Name", "Date"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], Cell::text("Alice"));
        assert_eq!(table.rows[1][0], Cell::text("Name"));
    }

    #[test]
    fn test_header_on_first_row() {
        let table = locate_header(raw(vec![
            vec![Cell::text("Name"), Cell::Number(2024.0), Cell::Empty],
            vec![Cell::text("Bob"), Cell::text("x"), Cell::text("y")],
        ]))
        .unwrap();

        assert_eq!(table.columns, vec!["Name", "2024"]);
        assert_eq!(
            table.rows,
            vec![vec![Cell::text("Bob"), Cell::text("x")]]
        );
    }

    #[test]
    fn test_header_requires_exact_text() {
        let result = locate_header(raw(vec![
            vec![Cell::text("name"), Cell::text("Date")],
            vec![Cell::text(" Name"), Cell::text("Date")],
            vec![Cell::text("Name "), Cell::text("Date")],
            vec![Cell::Number(1.0), Cell::text("Name")],
        ]));

        assert!(matches!(result, Err(NormalizeError::HeaderNotFound)));
    }

    #[test]
    fn test_table_is_as_wide_as_header() {
        let table = locate_header(raw(vec![
            vec![
                Cell::text("Customer balance detail"),
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
            ],
            vec![Cell::text("Name"), Cell::text("Date")],
            vec![Cell::text("Alice"), Cell::text("13/02/2024"), Cell::text("extra")],
        ]))
        .unwrap();

        assert_eq!(table.columns, vec!["Name", "Date"]);
        assert_eq!(
            table.rows,
            vec![vec![Cell::text("Alice"), Cell::text("13/02/2024")]]
        );
    }

    #[test]
    fn test_inner_empty_header_cell_stays_a_column() {
        let table = locate_header(raw(vec![
            vec![Cell::text("Name"), Cell::Empty, Cell::text("Date"), Cell::Empty],
            vec![Cell::text("Alice"), Cell::text("x")],
        ]))
        .unwrap();

        assert_eq!(table.columns, vec!["Name", "", "Date"]);
        assert_eq!(
            table.rows[0],
            vec![Cell::text("Alice"), Cell::text("x"), Cell::Empty]
        );
    }

    #[test]
    fn test_header_without_data_rows() {
        let table = locate_header(raw(vec![vec![Cell::text("Name")]])).unwrap();

        assert_eq!(table.columns, vec!["Name"]);
        assert!(table.rows.is_empty());
    }
}
