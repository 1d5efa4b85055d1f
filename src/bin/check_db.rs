//! Deployment check: probes the configured database and prints the health
//! verdict the `/api/health` endpoint would report.

use std::env;
use std::process::ExitCode;

use config::Config;
use dotenvy::dotenv;

use shreeji_erp::db::establish_connection_pool;
use shreeji_erp::models::config::ServerConfig;
use shreeji_erp::repository::DieselRepository;
use shreeji_erp::services::api as api_service;

fn main() -> ExitCode {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(err) => {
            log::error!(
                "Cannot open database {}: {err}",
                server_config.database_url
            );
            return ExitCode::FAILURE;
        }
    };

    let repo = DieselRepository::new(pool);
    let report = api_service::health(&repo, &server_config);

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log::error!("Cannot serialize health report: {err}");
            return ExitCode::FAILURE;
        }
    }

    if report.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
