//! Market data ports: where the stock table and trade feed come from.

use crate::domain::error::GbceError;
use crate::domain::stock::Stock;
use crate::domain::trade::TradeTicket;

pub trait StockTablePort {
    fn load_stocks(&self) -> Result<Vec<Stock>, GbceError>;
}

/// Yields trade tickets in feed order. Validation against the registry is the
/// market's job.
pub trait TradeFeedPort {
    fn load_trades(&self) -> Result<Vec<TradeTicket>, GbceError>;
}
