use crate::domain::transaction::{BankAccount, DailyTotals, Transaction};
use crate::pagination::Paginated;

/// Query parameters accepted by the transactions page service.
#[derive(Debug, Default)]
pub struct TransactionsQuery {
    pub search: Option<String>,
    /// Category filter from the toolbar select.
    pub category: Option<String>,
    /// Receipt/payment filter from the toolbar select.
    pub txn_type: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the transactions screen.
pub struct TransactionsPageData {
    pub transactions: Paginated<Transaction>,
    /// Total number of transactions matching the filter.
    pub total: usize,
    /// Today's till figures for the header cards.
    pub today: DailyTotals,
    /// Receipts minus payments for today.
    pub net_flow: i64,
    pub accounts: Vec<BankAccount>,
    pub search_query: Option<String>,
    pub category_filter: Option<String>,
    pub type_filter: Option<String>,
}
