//! Services coordinating the inventory screens.

use std::str::FromStr;

use validator::Validate;

use crate::domain::stock::{self, NewStockItem, StockKind, StockStatus, UpdateStockItem};
use crate::dto::stock::{StockPageData, StockQuery};
use crate::forms::stock::{AddStockForm, SaveStockForm, UploadStockForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated, total_pages};
use crate::repository::errors::RepositoryError;
use crate::repository::{StockListQuery, StockReader, StockWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads the stock screen: the filtered item table plus header counters
/// derived from the whole inventory.
pub fn load_stock_page<R>(
    user: &AuthenticatedUser,
    repo: &R,
    query: StockQuery,
    low_stock_threshold: i64,
) -> ServiceResult<StockPageData>
where
    R: StockReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page = query.page.unwrap_or(1);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let kind_filter = query.kind.as_deref().and_then(|s| StockKind::from_str(s).ok());
    let status_filter = query
        .status
        .as_deref()
        .and_then(|s| StockStatus::from_str(s).ok());

    let mut list_query = StockListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }
    if let Some(kind) = kind_filter {
        list_query = list_query.kind(kind);
    }
    if let Some(status) = status_filter {
        list_query = list_query.status(status);
    }

    let (total, items) = repo.list_stock_items(list_query).map_err(|err| {
        log::error!("Failed to list stock items: {err}");
        err
    })?;
    let items = Paginated::new(items, page, total_pages(total, DEFAULT_ITEMS_PER_PAGE));

    let everything = repo.list_all_stock_items().map_err(|err| {
        log::error!("Failed to load inventory for summary: {err}");
        err
    })?;
    let summary = stock::summarize(&everything, low_stock_threshold);

    Ok(StockPageData {
        items,
        total,
        summary,
        search_query,
        kind_filter: kind_filter.map(|k| k.to_string()),
        status_filter: status_filter.map(|s| s.to_string()),
    })
}

/// Validates the add form and registers a stock item under a fresh tag.
pub fn add_stock_item<R>(user: &AuthenticatedUser, repo: &R, form: AddStockForm) -> ServiceResult<()>
where
    R: StockReader + StockWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the item details".to_string()));
    }

    let new_item = NewStockItem::try_from(&form)?;

    let existing = repo.get_stock_item_by_tag(&new_item.tag_id).map_err(|err| {
        log::error!("Failed to check stock tag: {err}");
        err
    })?;
    if existing.is_some() {
        return Err(ServiceError::Form(
            "An item with this tag is already registered".to_string(),
        ));
    }

    repo.create_stock_items(std::slice::from_ref(&new_item))
        .map_err(|err| {
            log::error!("Failed to add stock item: {err}");
            err
        })?;

    Ok(())
}

/// Validates the edit form and updates the item.
pub fn save_stock_item<R>(
    user: &AuthenticatedUser,
    repo: &R,
    form: SaveStockForm,
) -> ServiceResult<()>
where
    R: StockWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the item details".to_string()));
    }

    let updates = UpdateStockItem::try_from(&form)?;

    repo.update_stock_item(form.id, &updates).map_err(|err| {
        log::error!("Failed to save stock item {}: {err}", form.id);
        err
    })?;

    Ok(())
}

/// Removes a stock item.
pub fn delete_stock_item<R>(user: &AuthenticatedUser, repo: &R, item_id: i32) -> ServiceResult<()>
where
    R: StockWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_stock_item(item_id).map_err(|err| {
        log::error!("Failed to delete stock item {item_id}: {err}");
        err
    })?;

    Ok(())
}

/// Parses the uploaded CSV and registers the items in one batch. Returns
/// the number of items created.
pub fn import_stock<R>(
    user: &AuthenticatedUser,
    repo: &R,
    form: &UploadStockForm,
) -> ServiceResult<usize>
where
    R: StockWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let items = form.parse_csv().map_err(|err| {
        log::error!("Failed to parse stock csv: {err}");
        ServiceError::Form(err.to_string())
    })?;

    if items.is_empty() {
        return Err(ServiceError::Form("The file contains no items".to_string()));
    }

    let created = repo.create_stock_items(&items).map_err(|err| {
        log::error!("Failed to import stock items: {err}");
        match err {
            RepositoryError::ConstraintViolation(_) => ServiceError::Form(
                "The file contains tags that are already registered".to_string(),
            ),
            other => other.into(),
        }
    })?;

    Ok(created)
}
