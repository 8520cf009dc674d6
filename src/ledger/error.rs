#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Unsupported file format. Please upload a CSV or Excel file.")]
    UnsupportedFormat(String),

    #[error("The uploaded file is empty.")]
    EmptyFile,

    #[error("Could not find the header row with 'Name' in the file.")]
    HeaderNotFound,

    #[error("The file has no '{0}' column.")]
    MissingColumn(String),

    #[error("Invalid open balance '{value}' on row {row}.")]
    InvalidBalance { row: usize, value: String },

    #[error("error reading csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("error reading spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("The spreadsheet has no worksheets.")]
    NoWorksheet,
}

impl NormalizeError {
    /// Whether the bytes could not be read in the declared format at all, as
    /// opposed to a readable file whose contents break a ledger rule.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            NormalizeError::UnsupportedFormat(_)
                | NormalizeError::Csv(_)
                | NormalizeError::Spreadsheet(_)
                | NormalizeError::NoWorksheet
        )
    }
}
