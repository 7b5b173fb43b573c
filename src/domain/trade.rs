//! Trade records (the append-only facts the market keeps).

use crate::domain::error::GbceError;
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "Buy"),
            Direction::Sell => write!(f, "Sell"),
        }
    }
}

impl FromStr for Direction {
    type Err = GbceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Direction::Buy),
            "sell" => Ok(Direction::Sell),
            other => Err(GbceError::invalid(format!(
                "invalid direction '{other}', expected Buy or Sell"
            ))),
        }
    }
}

/// A recorded trade. Only [`Market`](crate::domain::market::Market) creates
/// these, after validating the ticket they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub quantity: u64,
    pub direction: Direction,
    pub price: f64,
}

impl Trade {
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// `2017-01-12 10:40:55 Sell 30 GIN at 1000`
impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} at {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.direction,
            self.quantity,
            self.symbol,
            self.price
        )
    }
}

/// An unvalidated trade request, as supplied by a caller or a trade feed.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeTicket {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub quantity: i64,
    pub direction: Direction,
    pub price: f64,
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, GbceError> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        GbceError::invalid(format!(
            "invalid timestamp '{}' ({e}), expected YYYY-MM-DD HH:MM:SS",
            s.trim()
        ))
    })
}
