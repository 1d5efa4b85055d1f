use serde::Serialize;

use crate::domain::stock::StockSummary;
use crate::domain::transaction::DailyTotals;

/// Client base counters shown on the dashboard.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ClientStats {
    pub total: usize,
    pub vip: usize,
    pub premium: usize,
}

/// Savings scheme counters shown on the dashboard.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct HarvestStats {
    pub active: usize,
    pub completed: usize,
    /// Rupees due across active plans each month.
    pub monthly_due: i64,
}

/// Data required to render the dashboard template.
pub struct DashboardData {
    pub stock: StockSummary,
    /// Today's till figures.
    pub today: DailyTotals,
    /// Receipts minus payments for today.
    pub net_flow: i64,
    pub clients: ClientStats,
    pub harvest: HarvestStats,
}
