//! Form definitions backing the dashboard routes.

use chrono::NaiveDate;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod clients;
pub mod harvest;
pub mod karigar;
pub mod stock;
pub mod transactions;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid date")]
    InvalidDate,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("csv error: {0}")]
    Csv(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::NonPositiveAmount => FormError::InvalidAmount,
            TypeConstraintError::EmptyString => FormError::InvalidValue("empty value".to_string()),
            TypeConstraintError::InvalidValue(value) => FormError::InvalidValue(value),
        }
    }
}

/// Parse a required `YYYY-MM-DD` input field.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate)
}

/// Parse an optional date field, treating an empty input as absent.
pub(crate) fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_date(trimmed).map(Some)
}

/// Parse a rupee amount field. HTML number inputs arrive as text.
pub(crate) fn parse_amount(value: &str) -> Result<i64, FormError> {
    value.trim().parse::<i64>().map_err(|_| FormError::InvalidAmount)
}

/// Parse an optional rupee amount, treating an empty input as absent.
pub(crate) fn parse_optional_amount(value: &str) -> Result<Option<i64>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_amount(trimmed).map(Some)
}

/// Parse an optional weight field (grams or carats).
pub(crate) fn parse_optional_weight(value: &str) -> Result<Option<f64>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| FormError::InvalidValue(format!("not a weight: {trimmed}")))
}

/// Parse an optional integer field (karat values, piece counts).
pub(crate) fn parse_optional_int(value: &str) -> Result<Option<i32>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| FormError::InvalidValue(format!("not a number: {trimmed}")))
}

/// Empty optional text inputs become `None`.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
