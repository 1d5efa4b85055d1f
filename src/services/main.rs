//! Dashboard aggregation for the index page.

use chrono::Utc;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::client::VipStatus;
use crate::domain::stock;
use crate::dto::main::{ClientStats, DashboardData};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    ClientListQuery, ClientReader, HarvestReader, StockReader, TransactionReader,
};
use crate::services::harvest::harvest_stats;
use crate::services::{ServiceResult, ensure_role};

/// Builds the dashboard counters from the inventory, today's till, the
/// client base and the savings plans.
pub fn load_dashboard<R>(
    user: &AuthenticatedUser,
    repo: &R,
    low_stock_threshold: i64,
) -> ServiceResult<DashboardData>
where
    R: StockReader + TransactionReader + ClientReader + HarvestReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let items = repo.list_all_stock_items().map_err(|err| {
        log::error!("Failed to load stock items: {err}");
        err
    })?;
    let stock = stock::summarize(&items, low_stock_threshold);

    let today = repo.daily_totals(Utc::now().date_naive()).map_err(|err| {
        log::error!("Failed to load daily totals: {err}");
        err
    })?;
    let net_flow = today.receipts - today.payments;

    let clients = ClientStats {
        total: count_clients(repo, None)?,
        vip: count_clients(repo, Some(VipStatus::Vip))?,
        premium: count_clients(repo, Some(VipStatus::Premium))?,
    };

    let plans = repo.list_plans().map_err(|err| {
        log::error!("Failed to load harvest plans: {err}");
        err
    })?;
    let harvest = harvest_stats(plans.iter().map(|(plan, _)| plan));

    Ok(DashboardData {
        stock,
        today,
        net_flow,
        clients,
        harvest,
    })
}

/// Count clients matching a VIP tier without loading the rows.
fn count_clients<R>(repo: &R, vip_status: Option<VipStatus>) -> ServiceResult<usize>
where
    R: ClientReader + ?Sized,
{
    let mut query = ClientListQuery::default().paginate(1, 1);
    if let Some(status) = vip_status {
        query = query.vip_status(status);
    }
    let (total, _) = repo.list_clients(query).map_err(|err| {
        log::error!("Failed to count clients: {err}");
        err
    })?;
    Ok(total)
}
