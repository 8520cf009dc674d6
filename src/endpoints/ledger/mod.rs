pub mod upload;

pub mod preview;
pub use preview::preview;

pub mod export;
pub use export::export;

pub const LEDGER_TAG: &str = "ledger";

/// File name offered for the normalized download.
pub const EXPORT_FILE_NAME: &str = "processed_data.csv";
