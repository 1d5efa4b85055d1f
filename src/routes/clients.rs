use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::clients::ClientsQuery;
use crate::forms::clients::{AddClientForm, AddReminderForm, SaveClientForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, clients as clients_service};

#[derive(Deserialize)]
struct ClientsQueryParams {
    q: Option<String>,
    vip: Option<String>,
    page: Option<usize>,
}

#[get("/clients")]
pub async fn show_clients(
    params: web::Query<ClientsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = ClientsQuery {
        search: params.q,
        vip_status: params.vip,
        page: params.page,
    };

    match clients_service::load_clients_page(&user, repo.get_ref(), query) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "clients", &server_config);
            context.insert("clients", &data.clients);
            context.insert("total", &data.total);
            context.insert("search_query", &data.search_query);
            context.insert("vip_filter", &data.vip_filter);
            context.insert("reminders", &data.reminders);
            context.insert("upcoming_events", &data.upcoming_events);

            render_template(&tera, "clients/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load clients: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/clients/add")]
pub async fn add_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddClientForm>,
) -> impl Responder {
    match clients_service::add_client(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Client added.").send();
            redirect("/clients")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/clients")
        }
        Err(err) => {
            log::error!("Failed to add client: {err}");
            FlashMessage::error("Could not add the client.").send();
            redirect("/clients")
        }
    }
}

#[post("/clients/save")]
pub async fn save_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveClientForm>,
) -> impl Responder {
    match clients_service::save_client(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Client updated.").send();
            redirect("/clients")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/clients")
        }
        Err(err) => {
            log::error!("Failed to save client: {err}");
            FlashMessage::error("Could not save the client.").send();
            redirect("/clients")
        }
    }
}

#[post("/clients/{client_id}/delete")]
pub async fn delete_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match clients_service::delete_client(&user, repo.get_ref(), client_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Client removed.").send();
            redirect("/clients")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/clients")
        }
        Err(err) => {
            log::error!("Failed to delete client: {err}");
            FlashMessage::error("Could not remove the client.").send();
            redirect("/clients")
        }
    }
}

#[post("/clients/reminders/add")]
pub async fn add_reminder(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddReminderForm>,
) -> impl Responder {
    match clients_service::add_reminder(&user, repo.get_ref(), form) {
        Ok(_) => {
            FlashMessage::success("Reminder added.").send();
            redirect("/clients")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That client no longer exists.").send();
            redirect("/clients")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/clients")
        }
        Err(err) => {
            log::error!("Failed to add reminder: {err}");
            FlashMessage::error("Could not add the reminder.").send();
            redirect("/clients")
        }
    }
}

#[post("/clients/reminders/{reminder_id}/done")]
pub async fn complete_reminder(
    reminder_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match clients_service::complete_reminder(&user, repo.get_ref(), reminder_id.into_inner()) {
        Ok(_) => {
            FlashMessage::success("Reminder completed.").send();
            redirect("/clients")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to complete reminder: {err}");
            FlashMessage::error("Could not complete the reminder.").send();
            redirect("/clients")
        }
    }
}

#[post("/clients/reminders/{reminder_id}/delete")]
pub async fn delete_reminder(
    reminder_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match clients_service::delete_reminder(&user, repo.get_ref(), reminder_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Reminder removed.").send();
            redirect("/clients")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to delete reminder: {err}");
            FlashMessage::error("Could not remove the reminder.").send();
            redirect("/clients")
        }
    }
}
