#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use gbce::domain::market::Market;
pub use gbce::domain::trade::{Direction, TradeTicket};
use std::io::Write;

pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn ago(secs: i64) -> NaiveDateTime {
    now() - TimeDelta::seconds(secs)
}

pub fn ticket(symbol: &str, secs_ago: i64, quantity: i64, direction: Direction, price: f64) -> TradeTicket {
    TradeTicket {
        symbol: symbol.to_string(),
        timestamp: ago(secs_ago),
        quantity,
        direction,
        price,
    }
}

/// The trades of the classic exercise: TEA, GIN and (optionally) ALE, with
/// the first TEA trade the only one that falls outside a 15 minute window
/// once `now` has moved on by 20 seconds.
pub fn first_trades() -> Vec<TradeTicket> {
    vec![
        ticket("TEA", 910, 50, Direction::Buy, 500.0),
        ticket("TEA", 440, 40, Direction::Sell, 30.0),
        ticket("TEA", 230, 10, Direction::Buy, 100.0),
        ticket("GIN", 145, 25, Direction::Sell, 400.0),
        ticket("GIN", 110, 70, Direction::Buy, 300.0),
        ticket("GIN", 20, 260, Direction::Sell, 30.0),
    ]
}

pub fn later_trades() -> Vec<TradeTicket> {
    vec![
        ticket("ALE", 20, 25, Direction::Buy, 500.0),
        ticket("ALE", 20, 30, Direction::Buy, 490.0),
        ticket("ALE", 20, 70, Direction::Buy, 480.0),
    ]
}

pub fn market_with(tickets: &[TradeTicket]) -> Market {
    let mut market = Market::gbce();
    market.record_trades(tickets).unwrap();
    market
}

pub fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
