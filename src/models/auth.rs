//! Signed-in user carried as JWT claims inside the identity cookie.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest, web};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

/// How long a sign-in stays valid.
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Subject, the user id.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let Ok(identity) = Identity::from_request(req, payload).into_inner() else {
            return ready(Err(ErrorUnauthorized("Unauthorized")));
        };
        let Ok(token) = identity.id() else {
            return ready(Err(ErrorUnauthorized("Unauthorized")));
        };
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            return ready(Err(ErrorUnauthorized("Unauthorized")));
        };
        match Self::from_jwt(&token, &config.secret) {
            Ok(user) => ready(Ok(user)),
            Err(_) => ready(Err(ErrorUnauthorized("Unauthorized"))),
        }
    }
}
