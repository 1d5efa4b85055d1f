//! HTTP handlers and the template helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;

pub mod api;
pub mod auth;
pub mod clients;
pub mod console;
pub mod harvest;
pub mod karigar;
pub mod main;
pub mod stock;
pub mod transactions;

/// Map a flash level to the alert class the templates use.
#[must_use]
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context every signed-in page starts from: flash alerts, the current
/// user, the active nav item and the demo banner flag.
#[must_use]
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    server_config: &ServerConfig,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("demo_mode", &server_config.demo_mode);
    context
}

/// Render a template to a full HTML response, logging failures.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render {template}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// See-other redirect used after every form post.
#[must_use]
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, location))
        .finish()
}
