//! Database models shared across the store layer.

#[cfg(feature = "server")]
pub mod auth;
pub mod client;
pub mod config;
pub mod harvest;
pub mod karigar;
pub mod ledger;
pub mod stock;
pub mod transaction;
