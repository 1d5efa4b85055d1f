use actix_web::{App, test::{self}, web};
use actix_web_flash_messages::Level;

use shreeji_erp::models::config::ServerConfig;
use shreeji_erp::repository::DieselRepository;
use shreeji_erp::routes::alert_level_to_str;
use shreeji_erp::routes::api::health;

mod common;

fn test_config(demo_mode: bool) -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        templates_dir: "templates/**/*".to_string(),
        secret: "0".repeat(64),
        admin_email: "owner@example.com".to_string(),
        admin_password: "secret".to_string(),
        environment: "test".to_string(),
        low_stock_threshold: 50_000,
        demo_mode,
    }
}

#[test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn health_reports_connected_database() {
    let test_db = common::TestDb::new("test_health_reports_connected_database.db");
    let repo = DieselRepository::new(test_db.pool());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .app_data(web::Data::new(test_config(false)))
            .service(web::scope("/api").service(health)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["environment"], "test");
    assert!(body.get("error").is_none());
}

#[actix_web::test]
async fn health_reports_demo_database_when_fallback_is_active() {
    let test_db = common::TestDb::new("test_health_reports_demo_database.db");
    let repo = DieselRepository::new(test_db.pool());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .app_data(web::Data::new(test_config(true)))
            .service(web::scope("/api").service(health)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "demo");
}
