//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_environment() -> String {
    "development".to_string()
}

fn default_low_stock_threshold() -> i64 {
    50_000
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    pub secret: String,
    /// Credentials the sign-in form is checked against.
    pub admin_email: String,
    pub admin_password: String,
    /// Reported by the health endpoint.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Items cheaper than this count as low stock on the dashboard, in rupees.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    /// Fall back to a seeded throwaway database when the configured one
    /// cannot be opened.
    #[serde(default)]
    pub demo_mode: bool,
}
