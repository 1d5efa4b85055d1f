use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;
use validator::Validate;

use crate::forms::karigar::{
    AddKarigarForm, AddOrderForm, IssueDiamondForm, IssueDiamondPayload, IssueGoldForm,
    IssueGoldPayload, ReceiveJewelryForm, ReceiveJewelryPayload, ScheduleOrderForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, karigar as karigar_service};

#[derive(Deserialize)]
struct KarigarsQueryParams {
    q: Option<String>,
}

#[get("/karigar")]
pub async fn show_karigars(
    params: web::Query<KarigarsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match karigar_service::load_karigars_page(&user, repo.get_ref(), params.into_inner().q) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "karigar", &server_config);
            context.insert("karigars", &data.karigars);
            context.insert("search_query", &data.search_query);

            render_template(&tera, "karigar/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load karigars: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/karigar/{karigar_id}")]
pub async fn show_karigar(
    karigar_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match karigar_service::load_karigar_page(&user, repo.get_ref(), karigar_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "karigar", &server_config);
            context.insert("karigar", &data.karigar);
            context.insert("summary", &data.summary);
            context.insert("entries", &data.entries);
            context.insert("orders", &data.orders);

            render_template(&tera, "karigar/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That karigar no longer exists.").send();
            redirect("/karigar")
        }
        Err(err) => {
            log::error!("Failed to load karigar: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/karigar/add")]
pub async fn add_karigar(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddKarigarForm>,
) -> impl Responder {
    match karigar_service::add_karigar(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Karigar added.").send();
            redirect("/karigar")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/karigar")
        }
        Err(err) => {
            log::error!("Failed to add karigar: {err}");
            FlashMessage::error("Could not add the karigar.").send();
            redirect("/karigar")
        }
    }
}

#[post("/karigar/orders/add")]
pub async fn add_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddOrderForm>,
) -> impl Responder {
    let back = format!("/karigar/{}", form.karigar_id);
    match karigar_service::create_order(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Order opened.").send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That karigar no longer exists.").send();
            redirect("/karigar")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to create order: {err}");
            FlashMessage::error("Could not open the order.").send();
            redirect(&back)
        }
    }
}

#[post("/karigar/orders/save")]
pub async fn save_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ScheduleOrderForm>,
) -> impl Responder {
    match karigar_service::schedule_order(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Order updated.").send();
            redirect("/karigar")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect("/karigar")
        }
        Err(err) => {
            log::error!("Failed to update order: {err}");
            FlashMessage::error("Could not update the order.").send();
            redirect("/karigar")
        }
    }
}

#[post("/karigar/issue-gold")]
pub async fn issue_gold(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<IssueGoldForm>,
) -> impl Responder {
    let back = format!("/karigar/{}", form.karigar_id);

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        FlashMessage::error("Check the entry details.").send();
        return redirect(&back);
    }
    let payload = match IssueGoldPayload::try_from(&form) {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match karigar_service::issue_gold(&user, repo.get_ref(), payload) {
        Ok(entry) => {
            FlashMessage::success(format!("Gold issue booked for ₹{}.", entry.amount)).send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That karigar no longer exists.").send();
            redirect("/karigar")
        }
        Err(err) => {
            log::error!("Failed to issue gold: {err}");
            FlashMessage::error("Could not book the entry.").send();
            redirect(&back)
        }
    }
}

#[post("/karigar/issue-diamonds")]
pub async fn issue_diamonds(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<IssueDiamondForm>,
) -> impl Responder {
    let back = format!("/karigar/{}", form.karigar_id);

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        FlashMessage::error("Check the entry details.").send();
        return redirect(&back);
    }
    let payload = match IssueDiamondPayload::try_from(&form) {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match karigar_service::issue_diamonds(&user, repo.get_ref(), payload) {
        Ok(entry) => {
            FlashMessage::success(format!("Diamond issue booked for ₹{}.", entry.amount)).send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That karigar no longer exists.").send();
            redirect("/karigar")
        }
        Err(err) => {
            log::error!("Failed to issue diamonds: {err}");
            FlashMessage::error("Could not book the entry.").send();
            redirect(&back)
        }
    }
}

#[post("/karigar/receive")]
pub async fn receive_jewelry(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ReceiveJewelryForm>,
) -> impl Responder {
    let back = format!("/karigar/{}", form.karigar_id);

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        FlashMessage::error("Check the entry details.").send();
        return redirect(&back);
    }
    let payload = match ReceiveJewelryPayload::try_from(&form) {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match karigar_service::receive_jewelry(&user, repo.get_ref(), payload) {
        Ok(count) => {
            FlashMessage::success(format!("Receipt booked as {count} ledger entries.")).send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That karigar no longer exists.").send();
            redirect("/karigar")
        }
        Err(err) => {
            log::error!("Failed to receive jewelry: {err}");
            FlashMessage::error("Could not book the receipt.").send();
            redirect(&back)
        }
    }
}

#[derive(Deserialize)]
struct SettleLabourForm {
    karigar_id: i32,
    entry_id: i32,
}

#[post("/karigar/settle-labour")]
pub async fn settle_labour(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SettleLabourForm>,
) -> impl Responder {
    let back = format!("/karigar/{}", form.karigar_id);
    match karigar_service::settle_labour(&user, repo.get_ref(), form.entry_id) {
        Ok(()) => {
            FlashMessage::success("Labour settled.").send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to settle labour: {err}");
            FlashMessage::error("Could not settle the labour.").send();
            redirect(&back)
        }
    }
}

#[post("/karigar/{karigar_id}/reconcile")]
pub async fn reconcile(
    karigar_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let karigar_id = karigar_id.into_inner();
    let back = format!("/karigar/{karigar_id}");
    match karigar_service::reconcile(&user, repo.get_ref(), karigar_id) {
        Ok(outcome) => {
            if outcome.drifted() {
                FlashMessage::warning(format!(
                    "Balances repaired: gold {:.3}g to {:.3}g, diamond {:.3}ct to {:.3}ct.",
                    outcome.stored_gold,
                    outcome.derived_gold,
                    outcome.stored_diamond,
                    outcome.derived_diamond
                ))
                .send();
            } else {
                FlashMessage::success("Balances match the ledger.").send();
            }
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That karigar no longer exists.").send();
            redirect("/karigar")
        }
        Err(err) => {
            log::error!("Failed to reconcile karigar {karigar_id}: {err}");
            FlashMessage::error("Could not reconcile the ledger.").send();
            redirect(&back)
        }
    }
}
