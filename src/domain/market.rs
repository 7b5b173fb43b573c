//! The stock registry, the append-only trade log and the market-level metrics.
//!
//! Every time-windowed query takes `now` from the caller; nothing here reads a
//! clock.

use crate::domain::error::GbceError;
use crate::domain::seed::gbce_stocks;
use crate::domain::stock::Stock;
use crate::domain::trade::{Direction, Trade, TradeTicket};
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub window: TimeDelta,
    /// Stock table to load instead of the GBCE seed table.
    pub stocks_path: Option<PathBuf>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            window: TimeDelta::minutes(DEFAULT_WINDOW_MINUTES),
            stocks_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Market {
    stocks: BTreeMap<String, Stock>,
    trades: Vec<Trade>,
    window: TimeDelta,
}

impl Market {
    /// Builds a market over an arbitrary stock table.
    pub fn new(stocks: Vec<Stock>) -> Result<Self, GbceError> {
        let mut registry = BTreeMap::new();
        for stock in stocks {
            stock.validate()?;
            if registry.contains_key(&stock.symbol) {
                return Err(GbceError::invalid(format!(
                    "duplicate stock symbol: {}",
                    stock.symbol
                )));
            }
            registry.insert(stock.symbol.clone(), stock);
        }
        Ok(Self {
            stocks: registry,
            trades: Vec::new(),
            window: TimeDelta::minutes(DEFAULT_WINDOW_MINUTES),
        })
    }

    /// The market seeded with the GBCE stock table.
    pub fn gbce() -> Self {
        Self {
            stocks: gbce_stocks()
                .into_iter()
                .map(|s| (s.symbol.clone(), s))
                .collect(),
            trades: Vec::new(),
            window: TimeDelta::minutes(DEFAULT_WINDOW_MINUTES),
        }
    }

    pub fn with_window(mut self, window: TimeDelta) -> Result<Self, GbceError> {
        if window <= TimeDelta::zero() {
            return Err(GbceError::invalid("trade window must be positive"));
        }
        self.window = window;
        Ok(self)
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    pub fn stock(&self, symbol: &str) -> Option<&Stock> {
        self.stocks.get(symbol)
    }

    /// Stocks in symbol order.
    pub fn stocks(&self) -> impl Iterator<Item = &Stock> {
        self.stocks.values()
    }

    /// The trade log in insertion order.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trades_for<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a Trade> + 'a {
        self.trades.iter().filter(move |t| t.symbol == symbol)
    }

    fn lookup(&self, symbol: &str) -> Result<&Stock, GbceError> {
        self.stocks.get(symbol).ok_or_else(|| GbceError::UnknownStock {
            symbol: symbol.to_string(),
        })
    }

    pub fn dividend_yield(&self, symbol: &str, price: f64) -> Result<f64, GbceError> {
        self.lookup(symbol)?.dividend_yield(price)
    }

    pub fn pe_ratio(&self, symbol: &str, price: f64) -> Result<f64, GbceError> {
        self.lookup(symbol)?.pe_ratio(price)
    }

    fn validate_ticket(&self, ticket: &TradeTicket) -> Result<Trade, GbceError> {
        self.lookup(&ticket.symbol)?;
        if ticket.quantity <= 0 {
            return Err(GbceError::invalid(format!(
                "quantity must be positive, got {}",
                ticket.quantity
            )));
        }
        if !ticket.price.is_finite() || ticket.price <= 0.0 {
            return Err(GbceError::invalid(format!(
                "price must be positive, got {}",
                ticket.price
            )));
        }
        if !(ticket.price * ticket.quantity as f64).is_finite() {
            return Err(GbceError::invalid(format!(
                "notional of {} x {} is not representable",
                ticket.quantity, ticket.price
            )));
        }
        Ok(Trade {
            symbol: ticket.symbol.clone(),
            timestamp: ticket.timestamp,
            quantity: ticket.quantity as u64,
            direction: ticket.direction,
            price: ticket.price,
        })
    }

    pub fn record_trade(
        &mut self,
        symbol: &str,
        timestamp: NaiveDateTime,
        quantity: i64,
        direction: Direction,
        price: f64,
    ) -> Result<(), GbceError> {
        self.record_ticket(&TradeTicket {
            symbol: symbol.to_string(),
            timestamp,
            quantity,
            direction,
            price,
        })
    }

    pub fn record_ticket(&mut self, ticket: &TradeTicket) -> Result<(), GbceError> {
        let trade = self.validate_ticket(ticket).inspect_err(|e| {
            debug!(symbol = %ticket.symbol, reason = %e, "trade rejected");
        })?;
        debug!(trade = %trade, "trade recorded");
        self.trades.push(trade);
        Ok(())
    }

    /// Records a batch of tickets. Nothing is appended unless every ticket is
    /// valid. Returns the number of trades appended.
    pub fn record_trades<'a, I>(&mut self, tickets: I) -> Result<usize, GbceError>
    where
        I: IntoIterator<Item = &'a TradeTicket>,
    {
        let mut accepted = Vec::new();
        for (row, ticket) in tickets.into_iter().enumerate() {
            let trade = self.validate_ticket(ticket).inspect_err(|e| {
                debug!(row, symbol = %ticket.symbol, reason = %e, "batch rejected");
            })?;
            accepted.push(trade);
        }
        let count = accepted.len();
        self.trades.extend(accepted);
        info!(count, total = self.trades.len(), "trades recorded");
        Ok(count)
    }

    fn in_window(&self, trade: &Trade, now: NaiveDateTime) -> bool {
        trade.timestamp <= now && now.signed_duration_since(trade.timestamp) <= self.window
    }

    /// sum(price * quantity) / sum(quantity) over the symbol's trades in
    /// `[now - window, now]`.
    pub fn volume_weighted_stock_price(
        &self,
        symbol: &str,
        now: NaiveDateTime,
    ) -> Result<f64, GbceError> {
        self.lookup(symbol)?;
        volume_weighted_price(symbol, self.trades_for(symbol).filter(|t| self.in_window(t, now)))?
            .ok_or_else(|| GbceError::NoTradesInWindow {
                symbol: symbol.to_string(),
            })
    }

    /// Geometric mean over every traded stock of its volume-weighted price
    /// across the whole trade log.
    pub fn all_share_index(&self) -> Result<f64, GbceError> {
        let prices = self
            .stocks
            .keys()
            .map(|symbol| volume_weighted_price(symbol, self.trades_for(symbol)))
            .collect::<Result<Vec<_>, _>>()?;
        geometric_mean(&prices.into_iter().flatten().collect::<Vec<_>>())?
            .ok_or(GbceError::NoTradesRecorded)
    }

    /// Geometric mean over every stock traded in the window ending at `now`
    /// of its windowed volume-weighted price.
    pub fn all_share_index_at(&self, now: NaiveDateTime) -> Result<f64, GbceError> {
        if self.trades.is_empty() {
            return Err(GbceError::NoTradesRecorded);
        }
        let prices = self
            .stocks
            .keys()
            .map(|symbol| {
                volume_weighted_price(
                    symbol,
                    self.trades_for(symbol).filter(|t| self.in_window(t, now)),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        geometric_mean(&prices.into_iter().flatten().collect::<Vec<_>>())?
            .ok_or(GbceError::NoStockTradedInWindow)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.trades.is_empty() {
            return write!(f, "no trades recorded");
        }
        for (i, trade) in self.trades.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{trade}")?;
        }
        Ok(())
    }
}

/// `Ok(None)` when there are no trades.
fn volume_weighted_price<'a>(
    symbol: &str,
    trades: impl Iterator<Item = &'a Trade>,
) -> Result<Option<f64>, GbceError> {
    let (notional, volume) = trades.fold((0.0f64, 0u128), |(n, v), t| {
        (n + t.notional(), v + u128::from(t.quantity))
    });
    if volume == 0 {
        return Ok(None);
    }
    let price = notional / volume as f64;
    if !notional.is_finite() || !price.is_finite() {
        return Err(GbceError::NumericOverflow {
            what: format!("volume weighted price of {symbol}"),
        });
    }
    Ok(Some(price))
}

/// N-th root of the product, summed in log space so large products do not
/// overflow.
fn geometric_mean(values: &[f64]) -> Result<Option<f64>, GbceError> {
    if values.is_empty() {
        return Ok(None);
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    let mean = (log_sum / values.len() as f64).exp();
    if !mean.is_finite() {
        return Err(GbceError::NumericOverflow {
            what: "all share index".into(),
        });
    }
    Ok(Some(mean))
}
