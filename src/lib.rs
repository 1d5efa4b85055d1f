use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::{Compress, Logger};
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tera::Tera;

use crate::db::establish_connection_pool;
use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::api::{api_v1_clients, api_v1_console, api_v1_orders, health};
use crate::routes::auth::{logout, show_signin, signin};
use crate::routes::clients::{
    add_client, add_reminder, complete_reminder, delete_client, delete_reminder, save_client,
    show_clients,
};
use crate::routes::console::show_console;
use crate::routes::harvest::{
    add_plan, delete_plan, pay_instalment, redeem_plan, run_draw, save_plan, show_harvest,
    show_plan,
};
use crate::routes::karigar::{
    add_karigar, add_order, issue_diamonds, issue_gold, receive_jewelry, reconcile, save_order,
    settle_labour, show_karigar, show_karigars,
};
use crate::routes::main::{not_assigned, show_index};
use crate::routes::stock::{
    add_stock_item, delete_stock_item, save_stock_item, show_stock, upload_stock,
};
use crate::routes::transactions::{
    add_bank_account, add_transaction, delete_bank_account, delete_transaction,
    export_transactions, save_transaction, show_transactions,
};

pub mod db;
pub mod demo;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

pub const SERVICE_ACCESS_ROLE: &str = "erp";
pub const SERVICE_ADMIN_ROLE: &str = "erp_admin";

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Opens the configured database, applies pending migrations and checks it
/// answers a query.
fn open_database(database_url: &str) -> Result<DieselRepository, Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = SqliteConnection::establish(database_url)?;
    conn.run_pending_migrations(MIGRATIONS)?;

    let pool = establish_connection_pool(database_url)?;
    let repo = DieselRepository::new(pool);
    repo.ping()?;
    Ok(repo)
}

fn demo_repository() -> std::io::Result<DieselRepository> {
    demo::prepare()
        .map_err(|e| std::io::Error::other(format!("Failed to prepare demo database: {e}")))
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
///
/// When the configured database cannot be opened the server comes up on a
/// seeded demo store instead and flags it, so every page carries the demo
/// banner and the health endpoint reports the substitution.
pub async fn run(mut server_config: ServerConfig) -> std::io::Result<()> {
    let repo = if server_config.demo_mode {
        demo_repository()?
    } else {
        match open_database(&server_config.database_url) {
            Ok(repo) => repo,
            Err(e) => {
                log::warn!(
                    "Database {} is not usable: {e}. Serving demo data.",
                    server_config.database_url
                );
                server_config.demo_mode = true;
                demo_repository()?
            }
        }
    };

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_signin)
            .service(signin)
            .service(
                web::scope("/api")
                    .service(health)
                    .service(api_v1_clients)
                    .service(api_v1_orders)
                    .service(api_v1_console),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(not_assigned)
                    .service(show_clients)
                    .service(add_client)
                    .service(save_client)
                    .service(delete_client)
                    .service(add_reminder)
                    .service(complete_reminder)
                    .service(delete_reminder)
                    .service(show_stock)
                    .service(add_stock_item)
                    .service(save_stock_item)
                    .service(delete_stock_item)
                    .service(upload_stock)
                    .service(show_karigars)
                    .service(show_karigar)
                    .service(add_karigar)
                    .service(add_order)
                    .service(save_order)
                    .service(issue_gold)
                    .service(issue_diamonds)
                    .service(receive_jewelry)
                    .service(settle_labour)
                    .service(reconcile)
                    .service(show_harvest)
                    .service(show_plan)
                    .service(add_plan)
                    .service(save_plan)
                    .service(delete_plan)
                    .service(pay_instalment)
                    .service(redeem_plan)
                    .service(run_draw)
                    .service(show_transactions)
                    .service(add_transaction)
                    .service(save_transaction)
                    .service(delete_transaction)
                    .service(export_transactions)
                    .service(add_bank_account)
                    .service(delete_bank_account)
                    .service(show_console)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
