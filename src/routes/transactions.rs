use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use serde::Deserialize;
use tera::Tera;

use crate::dto::transactions::TransactionsQuery;
use crate::forms::transactions::{AddBankAccountForm, AddTransactionForm, SaveTransactionForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, transactions as transactions_service};

#[derive(Deserialize)]
struct TransactionsQueryParams {
    q: Option<String>,
    category: Option<String>,
    txn_type: Option<String>,
    page: Option<usize>,
}

#[get("/transactions")]
pub async fn show_transactions(
    params: web::Query<TransactionsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = TransactionsQuery {
        search: params.q,
        category: params.category,
        txn_type: params.txn_type,
        page: params.page,
    };

    match transactions_service::load_transactions_page(&user, repo.get_ref(), query) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "transactions", &server_config);
            context.insert("transactions", &data.transactions);
            context.insert("total", &data.total);
            context.insert("today", &data.today);
            context.insert("net_flow", &data.net_flow);
            context.insert("accounts", &data.accounts);
            context.insert("search_query", &data.search_query);
            context.insert("category_filter", &data.category_filter);
            context.insert("type_filter", &data.type_filter);

            render_template(&tera, "transactions/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load transactions: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/transactions/add")]
pub async fn add_transaction(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddTransactionForm>,
) -> impl Responder {
    match transactions_service::add_transaction(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Transaction booked.").send();
            redirect("/transactions")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/transactions")
        }
        Err(err) => {
            log::error!("Failed to add transaction: {err}");
            FlashMessage::error("Could not book the transaction.").send();
            redirect("/transactions")
        }
    }
}

#[post("/transactions/save")]
pub async fn save_transaction(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveTransactionForm>,
) -> impl Responder {
    match transactions_service::save_transaction(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Transaction updated.").send();
            redirect("/transactions")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/transactions")
        }
        Err(err) => {
            log::error!("Failed to save transaction: {err}");
            FlashMessage::error("Could not update the transaction.").send();
            redirect("/transactions")
        }
    }
}

#[post("/transactions/{txn_id}/delete")]
pub async fn delete_transaction(
    txn_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match transactions_service::delete_transaction(&user, repo.get_ref(), txn_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Transaction removed.").send();
            redirect("/transactions")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to delete transaction: {err}");
            FlashMessage::error("Could not remove the transaction.").send();
            redirect("/transactions")
        }
    }
}

#[get("/transactions/export")]
pub async fn export_transactions(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match transactions_service::export_csv(&user, repo.get_ref()) {
        Ok(csv) => {
            let filename = format!("transactions-{}.csv", Utc::now().date_naive());
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(csv)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to export transactions: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/transactions/accounts/add")]
pub async fn add_bank_account(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddBankAccountForm>,
) -> impl Responder {
    match transactions_service::add_bank_account(&user, repo.get_ref(), form) {
        Ok(()) => {
            FlashMessage::success("Account added.").send();
            redirect("/transactions")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/transactions")
        }
        Err(err) => {
            log::error!("Failed to add bank account: {err}");
            FlashMessage::error("Could not add the account.").send();
            redirect("/transactions")
        }
    }
}

#[post("/transactions/accounts/{account_id}/delete")]
pub async fn delete_bank_account(
    account_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match transactions_service::delete_bank_account(&user, repo.get_ref(), account_id.into_inner())
    {
        Ok(()) => {
            FlashMessage::success("Account removed.").send();
            redirect("/transactions")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You do not have access to this section.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to delete bank account: {err}");
            FlashMessage::error("Could not remove the account.").send();
            redirect("/transactions")
        }
    }
}
