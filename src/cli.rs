//! CLI definition and dispatch.

use chrono::{NaiveDateTime, TimeDelta, Utc};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvStockTable, CsvTradeFeed};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_market_config;
use crate::domain::error::GbceError;
use crate::domain::market::{DEFAULT_WINDOW_MINUTES, Market, MarketConfig};
use crate::domain::trade::{parse_timestamp, TradeTicket, TIMESTAMP_FORMAT};
use crate::logging::LoggingConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::{StockTablePort, TradeFeedPort};

#[derive(Parser, Debug)]
#[command(name = "gbce", about = "Global Beverage Corporation Exchange stock calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the stock table
    Stocks {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Dividend yield and P/E ratio for a stock at a given price
    Quote {
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, allow_negative_numbers = true)]
        price: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Record a trade feed and report volume weighted prices and the index
    Replay {
        #[arg(short, long)]
        trades: Option<PathBuf>,
        /// Evaluation instant, YYYY-MM-DD HH:MM:SS
        #[arg(long)]
        now: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Stocks { config } => {
            prepare(config.as_ref()).map(|(_, market)| print!("{}", render_stock_table(&market)))
        }
        Command::Quote {
            symbol,
            price,
            config,
        } => prepare(config.as_ref()).and_then(|(_, market)| {
            print!("{}", render_quote(&market, &symbol.to_uppercase(), price)?);
            Ok(())
        }),
        Command::Replay {
            trades,
            now,
            config,
        } => prepare(config.as_ref())
            .and_then(|(adapter, market)| run_replay(&adapter, market, trades, now.as_deref())),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, GbceError> {
    FileConfigAdapter::from_file(path).map_err(|e| GbceError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Loads and validates the config, starts logging and builds the market.
fn prepare(config_path: Option<&PathBuf>) -> Result<(FileConfigAdapter, Market), GbceError> {
    let adapter = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_market_config(&adapter)?;
    LoggingConfig::from_config(&adapter).init();

    let market_config = build_market_config(&adapter)?;
    let market = build_market(&market_config)?;
    Ok((adapter, market))
}

fn run_validate(config_path: &PathBuf) -> Result<(), GbceError> {
    let adapter = load_config(config_path)?;
    validate_market_config(&adapter)?;
    let market_config = build_market_config(&adapter)?;
    build_market(&market_config)?;
    println!("{} is valid", config_path.display());
    Ok(())
}

pub fn build_market_config(adapter: &dyn ConfigPort) -> Result<MarketConfig, GbceError> {
    let minutes = adapter.get_int("market", "window_minutes", DEFAULT_WINDOW_MINUTES);
    let window = TimeDelta::try_minutes(minutes)
        .filter(|w| *w > TimeDelta::zero())
        .ok_or_else(|| GbceError::ConfigInvalid {
            section: "market".into(),
            key: "window_minutes".into(),
            reason: format!("{minutes} is not a usable window"),
        })?;

    Ok(MarketConfig {
        window,
        stocks_path: adapter.get_string("market", "stocks_path").map(PathBuf::from),
    })
}

pub fn build_market(config: &MarketConfig) -> Result<Market, GbceError> {
    let market = match &config.stocks_path {
        Some(path) => {
            eprintln!("Loading stock table from {}", path.display());
            Market::new(CsvStockTable::new(path.clone()).load_stocks()?)?
        }
        None => Market::gbce(),
    };
    market.with_window(config.window)
}

/// `--now`, then `[replay] now`, then the latest trade in the feed, then the
/// wall clock.
pub fn resolve_now(
    cli_now: Option<&str>,
    adapter: &dyn ConfigPort,
    tickets: &[TradeTicket],
) -> Result<NaiveDateTime, GbceError> {
    if let Some(raw) = cli_now {
        return parse_timestamp(raw);
    }
    if let Some(raw) = adapter.get_string("replay", "now") {
        return parse_timestamp(&raw);
    }
    Ok(tickets
        .iter()
        .map(|t| t.timestamp)
        .max()
        .unwrap_or_else(|| Utc::now().naive_utc()))
}

fn run_replay(
    adapter: &dyn ConfigPort,
    mut market: Market,
    trades_path: Option<PathBuf>,
    cli_now: Option<&str>,
) -> Result<(), GbceError> {
    let trades_path = trades_path
        .or_else(|| adapter.get_string("replay", "trades_path").map(PathBuf::from))
        .ok_or_else(|| GbceError::ConfigMissing {
            section: "replay".into(),
            key: "trades_path".into(),
        })?;

    eprintln!("Loading trades from {}", trades_path.display());
    let tickets = CsvTradeFeed::new(trades_path).load_trades()?;
    let now = resolve_now(cli_now, adapter, &tickets)?;

    let recorded = market.record_trades(&tickets)?;
    eprintln!("Recorded {} trades", recorded);

    print!("{}", render_replay_report(&market, now));
    Ok(())
}

pub fn render_stock_table(market: &Market) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<10} {:>13} {:>14} {:>9}",
        "Symbol", "Type", "Last Dividend", "Fixed Dividend", "Par Value"
    );
    for stock in market.stocks() {
        let fixed = stock
            .kind
            .fixed_dividend_pct()
            .map(|pct| format!("{pct}%"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:>13} {:>14} {:>9}",
            stock.symbol,
            stock.kind.name(),
            stock.last_dividend,
            fixed,
            stock.par_value
        );
    }
    out
}

/// A missing dividend makes P/E undefined; that is reported, not an error.
pub fn render_quote(market: &Market, symbol: &str, price: f64) -> Result<String, GbceError> {
    let dividend_yield = market.dividend_yield(symbol, price)?;
    let pe = match market.pe_ratio(symbol, price) {
        Ok(pe) => format!("{pe:.3}"),
        Err(GbceError::DivisionByZero { .. }) => "n/a (no dividend)".to_string(),
        Err(e) => return Err(e),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{symbol} at {price}");
    let _ = writeln!(out, "  dividend yield: {dividend_yield:.4}");
    let _ = writeln!(out, "  P/E ratio:      {pe}");
    Ok(out)
}

pub fn render_replay_report(market: &Market, now: NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trades:");
    let _ = writeln!(out, "{market}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Volume weighted stock price at {} ({} min window):",
        now.format(TIMESTAMP_FORMAT),
        market.window().num_minutes()
    );
    for stock in market.stocks() {
        if market.trades_for(&stock.symbol).next().is_none() {
            continue;
        }
        let line = match market.volume_weighted_stock_price(&stock.symbol, now) {
            Ok(price) => format!("{price:.3}"),
            Err(e) => e.to_string(),
        };
        let _ = writeln!(out, "  {:<6} {}", stock.symbol, line);
    }

    let index_line = |result: Result<f64, GbceError>| match result {
        Ok(index) => format!("{index:.3}"),
        Err(e) => e.to_string(),
    };
    let _ = writeln!(
        out,
        "All share index (all trades): {}",
        index_line(market.all_share_index())
    );
    let _ = writeln!(
        out,
        "All share index (window):     {}",
        index_line(market.all_share_index_at(now))
    );
    out
}
