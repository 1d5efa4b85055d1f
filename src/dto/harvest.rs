use crate::domain::client::Client;
use crate::domain::harvest::{HarvestPlan, LuckyDraw, Payment, PlanProgress};
use crate::dto::main::HarvestStats;

/// Data required to render the harvest plans screen.
pub struct HarvestPageData {
    /// Every plan joined with its holder, ordered by group and registration.
    pub plans: Vec<(HarvestPlan, Client)>,
    pub stats: HarvestStats,
    /// Recent draw history across all groups, newest first.
    pub draws: Vec<LuckyDraw>,
}

/// Data required to render one plan's detail screen.
pub struct PlanPageData {
    pub plan: HarvestPlan,
    pub client: Client,
    /// The twelve instalment slots in month order.
    pub payments: Vec<Payment>,
    pub progress: PlanProgress,
}

/// Outcome of a lucky draw, returned after the record is persisted.
pub struct DrawOutcome {
    pub draw: LuckyDraw,
    /// The winning plan and its holder, when the drawn number is taken.
    pub winner: Option<(HarvestPlan, Client)>,
}
