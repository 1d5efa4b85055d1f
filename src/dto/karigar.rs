use crate::domain::karigar::{Karigar, KarigarOrder};
use crate::domain::ledger::{LedgerEntry, LedgerSummary};

/// Data required to render the karigar list screen.
pub struct KarigarsPageData {
    /// Every karigar with the count of orders still on their bench.
    pub karigars: Vec<(Karigar, i64)>,
    pub search_query: Option<String>,
}

/// Data required to render one karigar's detail screen: the material
/// ledger, its aggregates and the order book.
pub struct KarigarPageData {
    pub karigar: Karigar,
    pub summary: LedgerSummary,
    /// Full entry history, oldest first.
    pub entries: Vec<LedgerEntry>,
    pub orders: Vec<KarigarOrder>,
}
