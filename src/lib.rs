//! gbce — a small in-memory stock market: stock metadata, an append-only
//! trade log, dividend yield, P/E, volume weighted stock price and the
//! geometric-mean all share index.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
