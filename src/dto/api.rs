//! DTOs exposed by the JSON API endpoints. Field names are camelCase to
//! match the browser clients.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::assistant::ConsoleReply;
use crate::domain::client::Client;
use crate::domain::karigar::KarigarOrder;

/// Payload returned by `GET /api/health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
    pub environment: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One client row in the `GET /api/v1/clients` search response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub vip_status: String,
    pub preferred_category: String,
    pub total_purchases: i64,
    pub current_balance: i64,
    pub last_purchase: Option<NaiveDate>,
}

impl From<Client> for ClientPayload {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            phone: client.phone,
            email: client.email,
            vip_status: client.vip_status.to_string(),
            preferred_category: client.preferred_category,
            total_purchases: client.total_purchases,
            current_balance: client.current_balance,
            last_purchase: client.last_purchase,
        }
    }
}

/// Payload returned by `GET /api/v1/clients`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientsResponse {
    pub total: usize,
    pub clients: Vec<ClientPayload>,
}

/// One work order in the `GET /api/v1/karigar/orders` poll response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub id: i32,
    pub karigar_id: i32,
    pub item_type: String,
    pub gold_weight: Option<f64>,
    pub diamond_count: Option<i32>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub expected_delivery: Option<NaiveDate>,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<KarigarOrder> for OrderPayload {
    fn from(order: KarigarOrder) -> Self {
        Self {
            id: order.id,
            karigar_id: order.karigar_id,
            item_type: order.item_type,
            gold_weight: order.gold_weight,
            diamond_count: order.diamond_count,
            status: order.status.to_string(),
            due_date: order.due_date,
            expected_delivery: order.expected_delivery,
            notes: order.notes,
            updated_at: order.updated_at,
        }
    }
}

/// Payload returned by the order poll. Clients hand `revision` back as
/// `since` on the next request and get `304 Not Modified` until it moves.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    pub revision: i64,
    pub orders: Vec<OrderPayload>,
}

/// Body accepted by `POST /api/v1/console`.
#[derive(Debug, Deserialize)]
pub struct ConsoleRequest {
    pub message: String,
}

/// Error body for rejected API requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Payload returned by the console endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleResponse {
    pub category: String,
    pub reply: String,
}

impl From<ConsoleReply> for ConsoleResponse {
    fn from(reply: ConsoleReply) -> Self {
        Self {
            category: reply.category.to_string(),
            reply: reply.reply,
        }
    }
}
