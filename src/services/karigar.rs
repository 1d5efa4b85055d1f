//! Services behind the karigar roster, work orders and material ledgers.

use chrono::Utc;
use validator::Validate;

use crate::domain::karigar::{NewKarigar, NewKarigarOrder, UpdateKarigarOrder};
use crate::domain::ledger::{
    self, EntryCategory, EntryType, LedgerEntry, LedgerReconciliation, NewLedgerEntry,
};
use crate::dto::karigar::{KarigarPageData, KarigarsPageData};
use crate::forms::karigar::{
    AddKarigarForm, AddOrderForm, IssueDiamondPayload, IssueGoldPayload, ReceiveJewelryPayload,
    ScheduleOrderForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{KarigarReader, KarigarWriter, LedgerReader, LedgerWriter, OrderReader, OrderWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Default shop rate applied when an issue form leaves the rate blank, in
/// rupees per gram.
pub const GOLD_RATE_PER_GRAM: i64 = 6_850;
/// Default shop rate for loose diamonds, in rupees per carat.
pub const DIAMOND_RATE_PER_CARAT: i64 = 50_000;

/// Loads the roster with open-order counts, filtered by the search box.
pub fn load_karigars_page<R>(
    user: &AuthenticatedUser,
    repo: &R,
    search: Option<String>,
) -> ServiceResult<KarigarsPageData>
where
    R: KarigarReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let search_query = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let mut karigars = repo.list_karigars_with_open_orders().map_err(|err| {
        log::error!("Failed to list karigars: {err}");
        err
    })?;

    // The roster stays small, so the search box filters in memory instead
    // of pushing another query shape into the repository.
    if let Some(term) = &search_query {
        let needle = term.to_lowercase();
        karigars.retain(|(karigar, _)| {
            karigar.name.to_lowercase().contains(&needle)
                || karigar.phone.contains(&needle)
                || karigar
                    .specialization
                    .iter()
                    .any(|s| s.to_lowercase().contains(&needle))
        });
    }

    Ok(KarigarsPageData {
        karigars,
        search_query,
    })
}

/// Loads one karigar's detail screen: ledger with balances and work orders.
pub fn load_karigar_page<R>(
    user: &AuthenticatedUser,
    repo: &R,
    karigar_id: i32,
) -> ServiceResult<KarigarPageData>
where
    R: KarigarReader + LedgerReader + OrderReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let karigar = repo
        .get_karigar_by_id(karigar_id)
        .map_err(|err| {
            log::error!("Failed to load karigar {karigar_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let entries = repo.list_ledger_entries(karigar_id).map_err(|err| {
        log::error!("Failed to load ledger for karigar {karigar_id}: {err}");
        err
    })?;
    let summary = ledger::summarize(&entries);

    let orders = repo.list_orders(Some(karigar_id)).map_err(|err| {
        log::error!("Failed to load orders for karigar {karigar_id}: {err}");
        err
    })?;

    Ok(KarigarPageData {
        karigar,
        summary,
        entries,
        orders,
    })
}

/// Validates the form and adds a karigar to the roster.
pub fn add_karigar<R>(user: &AuthenticatedUser, repo: &R, form: AddKarigarForm) -> ServiceResult<()>
where
    R: KarigarWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the karigar details".to_string()));
    }

    let new_karigar = NewKarigar::try_from(&form)?;

    repo.create_karigar(&new_karigar).map_err(|err| {
        log::error!("Failed to add karigar: {err}");
        err
    })?;

    Ok(())
}

/// Opens a work order against a karigar.
pub fn create_order<R>(user: &AuthenticatedUser, repo: &R, form: AddOrderForm) -> ServiceResult<()>
where
    R: KarigarReader + OrderWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the order details".to_string()));
    }

    require_karigar(repo, form.karigar_id)?;

    let new_order = NewKarigarOrder::try_from(&form)?;

    repo.create_order(&new_order).map_err(|err| {
        log::error!("Failed to create order: {err}");
        err
    })?;

    Ok(())
}

/// Moves an order along its status track and stamps the expected delivery.
pub fn schedule_order<R>(
    user: &AuthenticatedUser,
    repo: &R,
    form: ScheduleOrderForm,
) -> ServiceResult<()>
where
    R: OrderWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let updates = UpdateKarigarOrder::try_from(&form)?;

    repo.update_order(form.id, &updates).map_err(|err| {
        log::error!("Failed to update order {}: {err}", form.id);
        err
    })?;

    Ok(())
}

/// Books gold handed out to a karigar. The rupee amount is the weight priced
/// at the submitted rate, or the shop rate when the form left it blank.
pub fn issue_gold<R>(
    user: &AuthenticatedUser,
    repo: &R,
    payload: IssueGoldPayload,
) -> ServiceResult<LedgerEntry>
where
    R: KarigarReader + LedgerWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    require_karigar(repo, payload.karigar_id)?;

    let entry_date = payload.entry_date.unwrap_or_else(|| Utc::now().date_naive());
    let rate = payload.rate.unwrap_or(GOLD_RATE_PER_GRAM);
    let amount = (payload.gold_weight * rate as f64).round() as i64;

    let entry = NewLedgerEntry::new(
        payload.karigar_id,
        entry_date,
        EntryType::Issue,
        EntryCategory::Gold,
        payload.description,
        payload.item_name,
        Some(payload.gold_weight),
        Some(payload.gold_karat),
        None,
        None,
        None,
        amount,
        payload.reference,
    );

    let created = repo.create_ledger_entry(&entry).map_err(|err| {
        log::error!("Failed to record gold issue: {err}");
        err
    })?;

    Ok(created)
}

/// Books diamonds handed out to a karigar.
pub fn issue_diamonds<R>(
    user: &AuthenticatedUser,
    repo: &R,
    payload: IssueDiamondPayload,
) -> ServiceResult<LedgerEntry>
where
    R: KarigarReader + LedgerWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    require_karigar(repo, payload.karigar_id)?;

    let entry_date = payload.entry_date.unwrap_or_else(|| Utc::now().date_naive());
    let rate = payload.rate.unwrap_or(DIAMOND_RATE_PER_CARAT);
    let amount = (payload.diamond_weight * rate as f64).round() as i64;

    let entry = NewLedgerEntry::new(
        payload.karigar_id,
        entry_date,
        EntryType::Issue,
        EntryCategory::Diamond,
        payload.description,
        payload.item_name,
        None,
        None,
        Some(payload.diamond_weight),
        payload.diamond_quality,
        None,
        amount,
        payload.reference,
    );

    let created = repo.create_ledger_entry(&entry).map_err(|err| {
        log::error!("Failed to record diamond issue: {err}");
        err
    })?;

    Ok(created)
}

/// Books finished jewelry coming back from a karigar. One submission can
/// return gold, diamonds and bill labour at once; each material lands as its
/// own ledger line so the balances fold cleanly. Returns how many lines were
/// written.
pub fn receive_jewelry<R>(
    user: &AuthenticatedUser,
    repo: &R,
    payload: ReceiveJewelryPayload,
) -> ServiceResult<usize>
where
    R: KarigarReader + LedgerWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    require_karigar(repo, payload.karigar_id)?;

    let entry_date = payload.entry_date.unwrap_or_else(|| Utc::now().date_naive());
    let mut entries = Vec::new();

    if let Some(weight) = payload.gold_weight {
        entries.push(NewLedgerEntry::new(
            payload.karigar_id,
            entry_date,
            EntryType::Receive,
            EntryCategory::Gold,
            payload.description.clone(),
            Some(payload.item_name.clone()),
            Some(weight),
            payload.gold_karat,
            None,
            None,
            None,
            (weight * GOLD_RATE_PER_GRAM as f64).round() as i64,
            payload.reference.clone(),
        ));
    }

    if let Some(weight) = payload.diamond_weight {
        entries.push(NewLedgerEntry::new(
            payload.karigar_id,
            entry_date,
            EntryType::Receive,
            EntryCategory::Diamond,
            payload.description.clone(),
            Some(payload.item_name.clone()),
            None,
            None,
            Some(weight),
            payload.diamond_quality.clone(),
            None,
            (weight * DIAMOND_RATE_PER_CARAT as f64).round() as i64,
            payload.reference.clone(),
        ));
    }

    if let Some(charges) = payload.labour_charges {
        entries.push(NewLedgerEntry::new(
            payload.karigar_id,
            entry_date,
            EntryType::Receive,
            EntryCategory::Labour,
            payload.description.clone(),
            Some(payload.item_name.clone()),
            None,
            None,
            None,
            None,
            Some(charges),
            charges,
            payload.reference.clone(),
        ));
    }

    for entry in &entries {
        repo.create_ledger_entry(entry).map_err(|err| {
            log::error!("Failed to record jewelry receipt: {err}");
            err
        })?;
    }

    Ok(entries.len())
}

/// Marks the labour billed on a ledger line as paid out.
pub fn settle_labour<R>(user: &AuthenticatedUser, repo: &R, entry_id: i32) -> ServiceResult<()>
where
    R: LedgerWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.settle_labour(entry_id).map_err(|err| {
        log::error!("Failed to settle labour on entry {entry_id}: {err}");
        err
    })?;

    Ok(())
}

/// Re-derives a karigar's material balances from the full ledger and
/// overwrites the stored pair. The caller gets both sides to report drift.
pub fn reconcile<R>(
    user: &AuthenticatedUser,
    repo: &R,
    karigar_id: i32,
) -> ServiceResult<LedgerReconciliation>
where
    R: KarigarReader + LedgerWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    require_karigar(repo, karigar_id)?;

    let reconciliation = repo.reconcile_karigar(karigar_id).map_err(|err| {
        log::error!("Failed to reconcile karigar {karigar_id}: {err}");
        err
    })?;

    Ok(reconciliation)
}

fn require_karigar<R>(repo: &R, karigar_id: i32) -> ServiceResult<()>
where
    R: KarigarReader + ?Sized,
{
    repo.get_karigar_by_id(karigar_id)
        .map_err(|err| {
            log::error!("Failed to load karigar {karigar_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;
    Ok(())
}
