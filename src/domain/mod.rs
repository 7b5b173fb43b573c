//! Core domain types and logic.

pub mod stock;
pub mod trade;
pub mod market;
pub mod seed;
pub mod config_validation;
pub mod error;
