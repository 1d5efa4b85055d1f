use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::stock::StockQuery;
use crate::forms::stock::{AddStockForm, SaveStockForm, UploadStockForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, stock as stock_service};

#[derive(Deserialize)]
struct StockQueryParams {
    q: Option<String>,
    kind: Option<String>,
    status: Option<String>,
    page: Option<usize>,
}

#[get("/stock")]
pub async fn show_stock(
    params: web::Query<StockQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = StockQuery {
        search: params.q,
        kind: params.kind,
        status: params.status,
        page: params.page,
    };

    match stock_service::load_stock_page(
        &user,
        repo.get_ref(),
        query,
        server_config.low_stock_threshold,
    ) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "stock", &server_config);
            context.insert("items", &data.items);
            context.insert("total", &data.total);
            context.insert("summary", &data.summary);
            context.insert("search_query", &data.search_query);
            context.insert("kind_filter", &data.kind_filter);
            context.insert("status_filter", &data.status_filter);

            render_template(&tera, "stock/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load stock: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/stock/add")]
pub async fn add_stock_item(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddStockForm>,
) -> impl Responder {
    match stock_service::add_stock_item(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Item registered.").send();
            redirect("/stock")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/stock")
        }
        Err(err) => {
            log::error!("Failed to add stock item: {err}");
            FlashMessage::error("Could not register the item.").send();
            redirect("/stock")
        }
    }
}

#[post("/stock/save")]
pub async fn save_stock_item(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveStockForm>,
) -> impl Responder {
    match stock_service::save_stock_item(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Item updated.").send();
            redirect("/stock")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/stock")
        }
        Err(err) => {
            log::error!("Failed to save stock item: {err}");
            FlashMessage::error("Could not save the item.").send();
            redirect("/stock")
        }
    }
}

#[post("/stock/{item_id}/delete")]
pub async fn delete_stock_item(
    item_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match stock_service::delete_stock_item(&user, repo.get_ref(), item_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Item removed.").send();
            redirect("/stock")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to delete stock item: {err}");
            FlashMessage::error("Could not remove the item.").send();
            redirect("/stock")
        }
    }
}

#[post("/stock/upload")]
pub async fn upload_stock(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadStockForm>,
) -> impl Responder {
    match stock_service::import_stock(&user, repo.get_ref(), &form) {
        Ok(count) => {
            FlashMessage::success(format!("{count} items imported.")).send();
            redirect("/stock")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/stock")
        }
        Err(err) => {
            log::error!("Failed to import stock: {err}");
            FlashMessage::error("Could not import the file.").send();
            redirect("/stock")
        }
    }
}
