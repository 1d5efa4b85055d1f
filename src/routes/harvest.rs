use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::harvest::{
    AddPlanForm, DrawForm, PayInstalmentForm, PayInstalmentPayload, RedeemPlanForm, SavePlanForm,
};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, harvest as harvest_service};

#[get("/harvest")]
pub async fn show_harvest(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match harvest_service::load_harvest_page(&user, repo.get_ref()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "harvest", &server_config);
            context.insert("plans", &data.plans);
            context.insert("stats", &data.stats);
            context.insert("draws", &data.draws);

            render_template(&tera, "harvest/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load harvest plans: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/harvest/{plan_id}")]
pub async fn show_plan(
    plan_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match harvest_service::load_plan_page(&user, repo.get_ref(), plan_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "harvest", &server_config);
            context.insert("plan", &data.plan);
            context.insert("client", &data.client);
            context.insert("payments", &data.payments);
            context.insert("progress", &data.progress);

            render_template(&tera, "harvest/show.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That plan no longer exists.").send();
            redirect("/harvest")
        }
        Err(err) => {
            log::error!("Failed to load plan: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/harvest/add")]
pub async fn add_plan(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddPlanForm>,
) -> impl Responder {
    match harvest_service::create_plan(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Plan registered.").send();
            redirect("/harvest")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That client no longer exists.").send();
            redirect("/harvest")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/harvest")
        }
        Err(err) => {
            log::error!("Failed to register plan: {err}");
            FlashMessage::error("Could not register the plan.").send();
            redirect("/harvest")
        }
    }
}

#[post("/harvest/save")]
pub async fn save_plan(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SavePlanForm>,
) -> impl Responder {
    let back = format!("/harvest/{}", form.id);
    match harvest_service::save_plan(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Plan updated.").send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to save plan: {err}");
            FlashMessage::error("Could not update the plan.").send();
            redirect(&back)
        }
    }
}

#[post("/harvest/{plan_id}/delete")]
pub async fn delete_plan(
    plan_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match harvest_service::delete_plan(&user, repo.get_ref(), plan_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Plan removed.").send();
            redirect("/harvest")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to delete plan: {err}");
            FlashMessage::error("Could not remove the plan.").send();
            redirect("/harvest")
        }
    }
}

#[post("/harvest/pay")]
pub async fn pay_instalment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PayInstalmentForm>,
) -> impl Responder {
    let back = format!("/harvest/{}", form.plan_id);

    let payload = match PayInstalmentPayload::try_from(&form) {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match harvest_service::pay_instalment(&user, repo.get_ref(), payload) {
        Ok(()) => {
            FlashMessage::success("Instalment recorded.").send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That plan no longer exists.").send();
            redirect("/harvest")
        }
        Err(err) => {
            log::error!("Failed to record instalment: {err}");
            FlashMessage::error("Could not record the instalment.").send();
            redirect(&back)
        }
    }
}

#[post("/harvest/redeem")]
pub async fn redeem_plan(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RedeemPlanForm>,
) -> impl Responder {
    let back = format!("/harvest/{}", form.id);
    match harvest_service::redeem_plan(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Plan redeemed.").send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("That plan no longer exists.").send();
            redirect("/harvest")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to redeem plan: {err}");
            FlashMessage::error("Could not redeem the plan.").send();
            redirect(&back)
        }
    }
}

#[post("/harvest/draw")]
pub async fn run_draw(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DrawForm>,
) -> impl Responder {
    match harvest_service::run_draw(&user, repo.get_ref(), form.group_no) {
        Ok(outcome) => {
            match &outcome.winner {
                Some((_, client)) => {
                    FlashMessage::success(format!(
                        "Lucky draw for group {}: number {} goes to {}.",
                        form.group_no, outcome.draw.winner_no, client.name
                    ))
                    .send();
                }
                None => {
                    FlashMessage::warning(format!(
                        "Lucky draw for group {}: number {} is unclaimed this month.",
                        form.group_no, outcome.draw.winner_no
                    ))
                    .send();
                }
            }
            redirect("/harvest")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/harvest")
        }
        Err(err) => {
            log::error!("Failed to run draw for group {}: {err}", form.group_no);
            FlashMessage::error("Could not run the draw.").send();
            redirect("/harvest")
        }
    }
}
