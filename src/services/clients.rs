//! Services coordinating the client base and its reminders.

use std::str::FromStr;

use chrono::Utc;
use validator::Validate;

use crate::domain::client::{self, NewClient, NewReminder, Reminder, UpdateClient, VipStatus};
use crate::dto::clients::{ClientsPageData, ClientsQuery};
use crate::forms::clients::{AddClientForm, AddReminderForm, SaveClientForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated, total_pages};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, ReminderListQuery, ReminderReader, ReminderWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// How far ahead the birthday and anniversary strip looks, in days.
const EVENT_HORIZON_DAYS: i64 = 30;

/// Loads the clients screen: the filtered table, every reminder and the
/// upcoming birthdays and anniversaries.
pub fn load_clients_page<R>(
    user: &AuthenticatedUser,
    repo: &R,
    query: ClientsQuery,
) -> ServiceResult<ClientsPageData>
where
    R: ClientReader + ReminderReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page = query.page.unwrap_or(1);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let vip_filter = query
        .vip_status
        .as_deref()
        .and_then(|s| VipStatus::from_str(s).ok());

    let mut list_query = ClientListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }
    if let Some(status) = vip_filter {
        list_query = list_query.vip_status(status);
    }

    let (total, clients) = repo.list_clients(list_query).map_err(|err| {
        log::error!("Failed to list clients: {err}");
        err
    })?;
    let clients = Paginated::new(clients, page, total_pages(total, DEFAULT_ITEMS_PER_PAGE));

    let reminders = repo
        .list_reminders(ReminderListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list reminders: {err}");
            err
        })?;

    let (_, everyone) = repo.list_clients(ClientListQuery::new()).map_err(|err| {
        log::error!("Failed to list clients for events: {err}");
        err
    })?;
    let upcoming_events =
        client::upcoming_events(&everyone, Utc::now().date_naive(), EVENT_HORIZON_DAYS);

    Ok(ClientsPageData {
        clients,
        total,
        search_query,
        vip_filter: vip_filter.map(|s| s.to_string()),
        reminders,
        upcoming_events,
    })
}

/// Validates the add-client form and persists a new client record.
pub fn add_client<R>(user: &AuthenticatedUser, repo: &R, form: AddClientForm) -> ServiceResult<()>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the client details".to_string()));
    }

    let new_client = NewClient::try_from(&form)?;

    let existing = repo.get_client_by_email(&new_client.email).map_err(|err| {
        log::error!("Failed to check client email: {err}");
        err
    })?;
    if existing.is_some() {
        return Err(ServiceError::Form(
            "A client with this email already exists".to_string(),
        ));
    }

    repo.create_clients(&[new_client]).map_err(|err| {
        log::error!("Failed to add a client: {err}");
        err
    })?;

    Ok(())
}

/// Validates the edit form and updates the client profile.
pub fn save_client<R>(user: &AuthenticatedUser, repo: &R, form: SaveClientForm) -> ServiceResult<()>
where
    R: ClientWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the client details".to_string()));
    }

    let updates = UpdateClient::try_from(&form)?;

    repo.update_client(form.id, &updates).map_err(|err| {
        log::error!("Failed to save client {}: {err}", form.id);
        err
    })?;

    Ok(())
}

/// Removes a client. Refused while the client still holds harvest plans.
pub fn delete_client<R>(user: &AuthenticatedUser, repo: &R, client_id: i32) -> ServiceResult<()>
where
    R: ClientWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_client(client_id).map_err(|err| {
        log::error!("Failed to delete client {client_id}: {err}");
        match err {
            RepositoryError::ConstraintViolation(_) => ServiceError::Form(
                "This client still holds harvest plans and cannot be deleted".to_string(),
            ),
            other => other.into(),
        }
    })?;

    Ok(())
}

/// Validates the reminder form and schedules it against the client.
pub fn add_reminder<R>(
    user: &AuthenticatedUser,
    repo: &R,
    form: AddReminderForm,
) -> ServiceResult<Reminder>
where
    R: ClientReader + ReminderWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Check the reminder details".to_string()));
    }

    let new_reminder = NewReminder::try_from(&form)?;

    repo.get_client_by_id(new_reminder.client_id)
        .map_err(|err| {
            log::error!("Failed to load client {}: {err}", new_reminder.client_id);
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let reminder = repo.create_reminder(&new_reminder).map_err(|err| {
        log::error!("Failed to add reminder: {err}");
        err
    })?;

    Ok(reminder)
}

/// Marks a reminder as completed.
pub fn complete_reminder<R>(
    user: &AuthenticatedUser,
    repo: &R,
    reminder_id: i32,
) -> ServiceResult<Reminder>
where
    R: ReminderWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let reminder = repo.complete_reminder(reminder_id).map_err(|err| {
        log::error!("Failed to complete reminder {reminder_id}: {err}");
        err
    })?;

    Ok(reminder)
}

/// Removes a reminder outright.
pub fn delete_reminder<R>(user: &AuthenticatedUser, repo: &R, reminder_id: i32) -> ServiceResult<()>
where
    R: ReminderWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_reminder(reminder_id).map_err(|err| {
        log::error!("Failed to delete reminder {reminder_id}: {err}");
        err
    })?;

    Ok(())
}
