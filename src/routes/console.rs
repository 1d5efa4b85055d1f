use actix_web::{Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::SERVICE_ACCESS_ROLE;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template};
use crate::services::check_role;

/// The console screen itself is static; questions go through the JSON API.
#[get("/console")]
pub async fn show_console(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        FlashMessage::error("You do not have access to this section.").send();
        return redirect("/na");
    }

    let context = base_context(&flash_messages, &user, "console", &server_config);
    render_template(&tera, "console/index.html", &context)
}
