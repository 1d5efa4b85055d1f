//! DTO modules that bridge services with templates and APIs.

pub mod api;
pub mod clients;
pub mod harvest;
pub mod karigar;
pub mod main;
pub mod stock;
pub mod transactions;
