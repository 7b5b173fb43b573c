//! Configuration validation.
//!
//! Checks every config field before the market is built.

use crate::domain::error::GbceError;
use crate::domain::trade::parse_timestamp;
use crate::ports::config_port::ConfigPort;

pub const LOG_FORMATS: [&str; 2] = ["pretty", "compact"];

pub fn validate_market_config(config: &dyn ConfigPort) -> Result<(), GbceError> {
    validate_window(config)?;
    validate_now(config)?;
    validate_log_format(config)?;
    Ok(())
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), GbceError> {
    match config.get_int_strict("market", "window_minutes") {
        None => Ok(()),
        Some(Ok(minutes)) if minutes > 0 => Ok(()),
        Some(Ok(_)) => Err(GbceError::ConfigInvalid {
            section: "market".to_string(),
            key: "window_minutes".to_string(),
            reason: "window_minutes must be positive".to_string(),
        }),
        Some(Err(raw)) => Err(GbceError::ConfigInvalid {
            section: "market".to_string(),
            key: "window_minutes".to_string(),
            reason: format!("'{raw}' is not a whole number of minutes"),
        }),
    }
}

fn validate_now(config: &dyn ConfigPort) -> Result<(), GbceError> {
    if let Some(raw) = config.get_string("replay", "now") {
        parse_timestamp(&raw).map_err(|_| GbceError::ConfigInvalid {
            section: "replay".to_string(),
            key: "now".to_string(),
            reason: "invalid now format, expected YYYY-MM-DD HH:MM:SS".to_string(),
        })?;
    }
    Ok(())
}

fn validate_log_format(config: &dyn ConfigPort) -> Result<(), GbceError> {
    match config.get_string("logging", "format") {
        Some(f) if !LOG_FORMATS.contains(&f.trim().to_lowercase().as_str()) => {
            Err(GbceError::ConfigInvalid {
                section: "logging".to_string(),
                key: "format".to_string(),
                reason: format!("format must be one of {}", LOG_FORMATS.join(", ")),
            })
        }
        _ => Ok(()),
    }
}
