use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum TransactionType {
    #[serde(rename = "INV")]
    Invoice,
    #[serde(rename = "CRD")]
    Credit,
}

impl TransactionType {
    pub fn code(&self) -> &'static str {
        match self {
            TransactionType::Invoice => "INV",
            TransactionType::Credit => "CRD",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One normalized ledger line.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LedgerRecord {
    #[serde(rename = "Debtor Reference")]
    pub debtor_reference: String,
    #[serde(rename = "Transaction Type")]
    pub transaction_type: TransactionType,
    #[serde(rename = "Document Number")]
    pub document_number: String,
    /// dd/mm/yyyy, or the source text when it is not a recognizable date.
    #[serde(rename = "Document Date")]
    pub document_date: String,
    /// Two fraction digits, negative for credits.
    #[serde(rename = "Document Balance")]
    pub document_balance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LedgerTable {
    pub records: Vec<LedgerRecord>,
}

impl LedgerTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
