//! Domain aggregates exposed by the service layer.

pub mod assistant;
pub mod client;
pub mod harvest;
pub mod karigar;
pub mod ledger;
pub mod stock;
pub mod transaction;
pub mod types;
