use crate::domain::stock::{StockItem, StockSummary};
use crate::pagination::Paginated;

/// Query parameters accepted by the stock page service.
#[derive(Debug, Default)]
pub struct StockQuery {
    pub search: Option<String>,
    /// Item kind filter from the toolbar select.
    pub kind: Option<String>,
    /// Status filter from the toolbar select.
    pub status: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the stock screen.
pub struct StockPageData {
    pub items: Paginated<StockItem>,
    /// Total number of items matching the filter.
    pub total: usize,
    /// Header counters, derived from the whole inventory rather than the
    /// current filter.
    pub summary: StockSummary,
    pub search_query: Option<String>,
    pub kind_filter: Option<String>,
    pub status_filter: Option<String>,
}
