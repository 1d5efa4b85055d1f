//! Services behind the JSON endpoints.

use chrono::Utc;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::assistant;
use crate::dto::api::{ClientsResponse, ConsoleResponse, HealthResponse, OrdersResponse};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::{ClientListQuery, ClientReader, DieselRepository, OrderReader};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Probes the database and reports service health. The caller turns a
/// carried `error` into a 500.
pub fn health(repo: &DieselRepository, config: &ServerConfig) -> HealthResponse {
    let timestamp = Utc::now().to_rfc3339();
    let version = env!("CARGO_PKG_VERSION").to_string();

    match repo.ping() {
        Ok(()) => HealthResponse {
            status: "healthy".to_string(),
            timestamp,
            database: if config.demo_mode {
                "demo".to_string()
            } else {
                "connected".to_string()
            },
            environment: config.environment.clone(),
            version,
            error: None,
        },
        Err(err) => {
            log::error!("Health probe failed: {err}");
            HealthResponse {
                status: "unhealthy".to_string(),
                timestamp,
                database: "error".to_string(),
                environment: config.environment.clone(),
                version,
                error: Some(err.to_string()),
            }
        }
    }
}

/// Client lookup behind the search box and external integrations.
pub fn search_clients<R>(
    user: &AuthenticatedUser,
    repo: &R,
    query: Option<String>,
) -> ServiceResult<ClientsResponse>
where
    R: ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut list_query = ClientListQuery::new();
    if let Some(term) = query.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        list_query = list_query.search(term);
    }

    let (total, clients) = repo.list_clients(list_query).map_err(|err| {
        log::error!("Failed to search clients: {err}");
        err
    })?;

    Ok(ClientsResponse {
        total,
        clients: clients.into_iter().map(Into::into).collect(),
    })
}

/// Order poll with change detection. `None` means the caller's `since`
/// still matches the current revision and nothing needs to be sent.
pub fn poll_orders<R>(
    user: &AuthenticatedUser,
    repo: &R,
    since: Option<i64>,
) -> ServiceResult<Option<OrdersResponse>>
where
    R: OrderReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let revision = repo.orders_revision();
    if since == Some(revision) {
        return Ok(None);
    }

    let orders = repo.list_orders(None).map_err(|err| {
        log::error!("Failed to list orders: {err}");
        err
    })?;

    Ok(Some(OrdersResponse {
        revision,
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

/// Answers a console question from the canned rule set.
pub fn console(user: &AuthenticatedUser, message: &str) -> ServiceResult<ConsoleResponse> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let message = message.trim();
    if message.is_empty() {
        return Err(ServiceError::Form("Type a question first".to_string()));
    }

    Ok(assistant::respond(message).into())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::SERVICE_ADMIN_ROLE;
    use crate::domain::client::{Client, VipStatus};
    use crate::repository::mock::MockRepository;

    fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "owner@shreeji.example".to_string(),
            email: "owner@shreeji.example".to_string(),
            name: "Administrator".to_string(),
            roles: vec![
                SERVICE_ACCESS_ROLE.to_string(),
                SERVICE_ADMIN_ROLE.to_string(),
            ],
            exp: 0,
        }
    }

    fn stranger() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "stranger".to_string(),
            email: "stranger@example.com".to_string(),
            name: "Stranger".to_string(),
            roles: vec![],
            exp: 0,
        }
    }

    fn client() -> Client {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Client {
            id: 1,
            name: "Mrs. Priya Sharma".to_string(),
            phone: "+919876543210".to_string(),
            email: "priya.sharma@email.com".to_string(),
            address: String::new(),
            pan_no: String::new(),
            birthday: NaiveDate::from_ymd_opt(1985, 3, 15).unwrap(),
            anniversary: None,
            ring_size: None,
            bangle_size: None,
            bracelet_size: None,
            total_purchases: 1_250_000,
            lifetime_purchases: 3_500_000,
            current_balance: -25_000,
            last_purchase: NaiveDate::from_ymd_opt(2024, 11, 20),
            preferred_category: "Diamond Jewelry".to_string(),
            vip_status: VipStatus::Vip,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn search_requires_the_service_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients().times(0);

        let result = search_clients(&stranger(), &repo, None);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn search_maps_clients_to_payloads() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .withf(|query| {
                query.search.as_deref() == Some("priya") && query.pagination.is_none()
            })
            .times(1)
            .returning(|_| Ok((1, vec![client()])));

        let response =
            search_clients(&admin_user(), &repo, Some(" priya ".to_string())).unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.clients[0].name, "Mrs. Priya Sharma");
        assert_eq!(response.clients[0].vip_status, "vip");
    }

    #[test]
    fn poll_skips_an_unchanged_list() {
        let mut repo = MockRepository::new();
        repo.expect_orders_revision().times(1).returning(|| 7);
        repo.expect_list_orders().times(0);

        let response = poll_orders(&admin_user(), &repo, Some(7)).unwrap();

        assert!(response.is_none());
    }

    #[test]
    fn poll_sends_the_list_when_the_revision_moves() {
        let mut repo = MockRepository::new();
        repo.expect_orders_revision().times(1).returning(|| 8);
        repo.expect_list_orders()
            .withf(|karigar_id| karigar_id.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));

        let response = poll_orders(&admin_user(), &repo, Some(7)).unwrap();

        assert_eq!(response.map(|r| r.revision), Some(8));
    }

    #[test]
    fn console_categorises_by_keyword() {
        let response = console(&admin_user(), "How are sales this month?").unwrap();
        assert_eq!(response.category, "analysis");

        let response = console(&admin_user(), "Any missing stock?").unwrap();
        assert_eq!(response.category, "alert");
    }

    #[test]
    fn console_rejects_an_empty_question() {
        let result = console(&admin_user(), "   ");
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
