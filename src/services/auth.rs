//! Sign-in against the configured shop credentials.

use chrono::{Duration, Utc};

use crate::models::auth::{AuthenticatedUser, SESSION_TTL_DAYS};
use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Check submitted credentials and mint the session claims. This is a
/// single-operator shop, so a successful sign-in carries both roles.
pub fn sign_in(config: &ServerConfig, email: &str, password: &str) -> ServiceResult<AuthenticatedUser> {
    let email = email.trim().to_lowercase();
    if email != config.admin_email.trim().to_lowercase() || password != config.admin_password {
        return Err(ServiceError::Unauthorized);
    }

    let exp = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp() as usize;
    Ok(AuthenticatedUser {
        sub: email.clone(),
        email,
        name: "Administrator".to_string(),
        roles: vec![
            SERVICE_ACCESS_ROLE.to_string(),
            SERVICE_ADMIN_ROLE.to_string(),
        ],
        exp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            domain: "localhost".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            database_url: ":memory:".to_string(),
            templates_dir: "templates".to_string(),
            secret: "secret".to_string(),
            admin_email: "owner@shreeji.example".to_string(),
            admin_password: "jewels".to_string(),
            environment: "test".to_string(),
            low_stock_threshold: 50_000,
            demo_mode: false,
        }
    }

    #[test]
    fn sign_in_grants_both_roles() {
        let user = sign_in(&config(), "owner@shreeji.example", "jewels").unwrap();

        assert_eq!(user.email, "owner@shreeji.example");
        assert!(user.roles.contains(&SERVICE_ACCESS_ROLE.to_string()));
        assert!(user.roles.contains(&SERVICE_ADMIN_ROLE.to_string()));
        assert!(user.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn sign_in_is_case_insensitive_on_email() {
        let user = sign_in(&config(), "  Owner@Shreeji.Example ", "jewels").unwrap();
        assert_eq!(user.email, "owner@shreeji.example");
    }

    #[test]
    fn wrong_password_is_rejected() {
        let result = sign_in(&config(), "owner@shreeji.example", "paste");
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn unknown_email_is_rejected() {
        let result = sign_in(&config(), "guest@shreeji.example", "jewels");
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
