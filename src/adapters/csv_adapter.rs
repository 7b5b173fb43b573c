//! CSV file adapters for the stock table and the trade feed.

use crate::domain::error::GbceError;
use crate::domain::stock::{Stock, StockKind};
use crate::domain::trade::{parse_timestamp, Direction, TradeTicket};
use crate::ports::market_data_port::{StockTablePort, TradeFeedPort};
use std::fs;
use std::path::{Path, PathBuf};

/// `symbol,type,last_dividend,fixed_dividend,par_value`
pub struct CsvStockTable {
    path: PathBuf,
}

impl CsvStockTable {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// `timestamp,symbol,direction,quantity,price`
pub struct CsvTradeFeed {
    path: PathBuf,
}

impl CsvTradeFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn read_records(path: &Path) -> Result<Vec<csv::StringRecord>, GbceError> {
    let content = fs::read_to_string(path).map_err(|e| GbceError::Feed {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    rdr.records()
        .map(|r| {
            r.map_err(|e| GbceError::Feed {
                reason: format!("CSV parse error: {}", e),
            })
        })
        .collect()
}

fn column<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, GbceError> {
    record.get(index).ok_or_else(|| GbceError::Feed {
        reason: format!("line {line}: missing {name} column"),
    })
}

fn parse_column<T>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<T, GbceError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    column(record, index, name, line)?
        .parse()
        .map_err(|e| GbceError::Feed {
            reason: format!("line {line}: invalid {name} value: {e}"),
        })
}

impl StockTablePort for CsvStockTable {
    fn load_stocks(&self) -> Result<Vec<Stock>, GbceError> {
        let mut stocks = Vec::new();

        for (i, record) in read_records(&self.path)?.iter().enumerate() {
            // header is line 1
            let line = i + 2;
            let symbol = column(record, 0, "symbol", line)?.to_uppercase();
            let kind: StockKind = parse_column(record, 1, "type", line)?;
            let last_dividend: f64 = parse_column(record, 2, "last_dividend", line)?;
            let fixed = column(record, 3, "fixed_dividend", line)?;
            let par_value: f64 = parse_column(record, 4, "par_value", line)?;

            let kind = match (kind, fixed.is_empty()) {
                (StockKind::Common, true) => StockKind::Common,
                (StockKind::Common, false) => {
                    return Err(GbceError::Feed {
                        reason: format!("line {line}: {symbol} is Common but has a fixed dividend"),
                    });
                }
                (StockKind::Preferred { .. }, true) => {
                    return Err(GbceError::Feed {
                        reason: format!("line {line}: {symbol} is Preferred without a fixed dividend"),
                    });
                }
                (StockKind::Preferred { .. }, false) => StockKind::Preferred {
                    fixed_dividend_pct: parse_column(record, 3, "fixed_dividend", line)?,
                },
            };

            stocks.push(Stock {
                symbol,
                kind,
                last_dividend,
                par_value,
            });
        }

        Ok(stocks)
    }
}

impl TradeFeedPort for CsvTradeFeed {
    fn load_trades(&self) -> Result<Vec<TradeTicket>, GbceError> {
        let mut tickets = Vec::new();

        for (i, record) in read_records(&self.path)?.iter().enumerate() {
            let line = i + 2;
            let timestamp = parse_timestamp(column(record, 0, "timestamp", line)?).map_err(
                |e| GbceError::Feed {
                    reason: format!("line {line}: {e}"),
                },
            )?;
            let symbol = column(record, 1, "symbol", line)?.to_uppercase();
            let direction: Direction = parse_column(record, 2, "direction", line)?;
            let quantity: i64 = parse_column(record, 3, "quantity", line)?;
            let price: f64 = parse_column(record, 4, "price", line)?;

            tickets.push(TradeTicket {
                symbol,
                timestamp,
                quantity,
                direction,
                price,
            });
        }

        Ok(tickets)
    }
}
