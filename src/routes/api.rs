use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::dto::api::{ConsoleRequest, ErrorResponse};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, api as api_service};

#[get("/health")]
pub async fn health(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let response = api_service::health(repo.get_ref(), &server_config);
    if response.error.is_some() {
        HttpResponse::InternalServerError().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}

#[derive(Deserialize)]
struct ApiV1ClientsQueryParams {
    query: Option<String>,
}

#[get("/v1/clients")]
pub async fn api_v1_clients(
    params: web::Query<ApiV1ClientsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::search_clients(&user, repo.get_ref(), params.into_inner().query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to search clients: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct ApiV1OrdersQueryParams {
    /// Revision from the previous poll. Matching the current one yields 304.
    since: Option<i64>,
}

#[get("/v1/karigar/orders")]
pub async fn api_v1_orders(
    params: web::Query<ApiV1OrdersQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::poll_orders(&user, repo.get_ref(), params.into_inner().since) {
        Ok(Some(response)) => HttpResponse::Ok().json(response),
        Ok(None) => HttpResponse::NotModified().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to poll orders: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/v1/console")]
pub async fn api_v1_console(
    body: web::Json<ConsoleRequest>,
    user: AuthenticatedUser,
) -> impl Responder {
    match api_service::console(&user, &body.message) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::Form(message)) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(err) => {
            log::error!("Failed to answer console question: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
