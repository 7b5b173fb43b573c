//! Domain error types.

/// Top-level error type for gbce.
#[derive(Debug, thiserror::Error)]
pub enum GbceError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("unknown stock: {symbol}")]
    UnknownStock { symbol: String },

    #[error("division by zero: {symbol} has no dividend, P/E ratio is undefined")]
    DivisionByZero { symbol: String },

    #[error("no trades for {symbol} in the trailing window")]
    NoTradesInWindow { symbol: String },

    #[error("no stock traded in the trailing window")]
    NoStockTradedInWindow,

    #[error("no trades recorded")]
    NoTradesRecorded,

    #[error("numeric overflow computing {what}")]
    NumericOverflow { what: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("feed error: {reason}")]
    Feed { reason: String },
}

impl GbceError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        GbceError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<&GbceError> for std::process::ExitCode {
    fn from(err: &GbceError) -> Self {
        let code: u8 = match err {
            GbceError::ConfigParse { .. }
            | GbceError::ConfigMissing { .. }
            | GbceError::ConfigInvalid { .. } => 2,
            GbceError::Feed { .. } => 3,
            GbceError::InvalidInput { .. } | GbceError::UnknownStock { .. } => 4,
            GbceError::DivisionByZero { .. }
            | GbceError::NoTradesInWindow { .. }
            | GbceError::NoStockTradedInWindow
            | GbceError::NoTradesRecorded
            | GbceError::NumericOverflow { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
