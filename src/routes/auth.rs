//! Sign-in and sign-out handlers. These sit outside the authenticated
//! scope so a fresh browser can reach them.

use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};
use validator::Validate;

use crate::forms::auth::SignInForm;
use crate::models::config::ServerConfig;
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};

#[get("/auth/signin")]
pub async fn show_signin(
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", "signin");
    context.insert("demo_mode", &server_config.demo_mode);

    render_template(&tera, "auth/signin.html", &context)
}

#[post("/auth/signin")]
pub async fn signin(
    request: HttpRequest,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<SignInForm>,
) -> impl Responder {
    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        FlashMessage::error("Enter your email and password.").send();
        return redirect("/auth/signin");
    }

    match auth_service::sign_in(&server_config, &form.email, &form.password) {
        Ok(user) => {
            let token = match user.to_jwt(&server_config.secret) {
                Ok(token) => token,
                Err(err) => {
                    log::error!("Failed to issue session token: {err}");
                    return HttpResponse::InternalServerError().finish();
                }
            };
            if let Err(err) = Identity::login(&request.extensions(), token) {
                log::error!("Failed to attach session identity: {err}");
                return HttpResponse::InternalServerError().finish();
            }
            redirect("/")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Wrong email or password.").send();
            redirect("/auth/signin")
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/auth/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/auth/signin")
}
