//! Listed stocks and their per-share dividend formulas.

use crate::domain::error::GbceError;
use std::fmt;
use std::str::FromStr;

/// Common stocks pay `last_dividend`; preferred stocks pay a fixed
/// percentage of par value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StockKind {
    Common,
    Preferred { fixed_dividend_pct: f64 },
}

impl StockKind {
    pub fn name(&self) -> &'static str {
        match self {
            StockKind::Common => "Common",
            StockKind::Preferred { .. } => "Preferred",
        }
    }

    pub fn fixed_dividend_pct(&self) -> Option<f64> {
        match self {
            StockKind::Common => None,
            StockKind::Preferred { fixed_dividend_pct } => Some(*fixed_dividend_pct),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    pub symbol: String,
    pub kind: StockKind,
    /// Pence per share.
    pub last_dividend: f64,
    pub par_value: f64,
}

impl Stock {
    pub fn common(symbol: &str, last_dividend: f64, par_value: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            kind: StockKind::Common,
            last_dividend,
            par_value,
        }
    }

    pub fn preferred(
        symbol: &str,
        last_dividend: f64,
        fixed_dividend_pct: f64,
        par_value: f64,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            kind: StockKind::Preferred { fixed_dividend_pct },
            last_dividend,
            par_value,
        }
    }

    /// Checks the metadata a registry relies on.
    pub fn validate(&self) -> Result<(), GbceError> {
        if self.symbol.trim().is_empty() {
            return Err(GbceError::invalid("stock symbol must not be empty"));
        }
        if !self.last_dividend.is_finite() || self.last_dividend < 0.0 {
            return Err(GbceError::invalid(format!(
                "{}: last dividend must be non-negative",
                self.symbol
            )));
        }
        if !self.par_value.is_finite() || self.par_value <= 0.0 {
            return Err(GbceError::invalid(format!(
                "{}: par value must be positive",
                self.symbol
            )));
        }
        if let Some(pct) = self.kind.fixed_dividend_pct() {
            if !pct.is_finite() || pct < 0.0 {
                return Err(GbceError::invalid(format!(
                    "{}: fixed dividend must be a non-negative percentage",
                    self.symbol
                )));
            }
        }
        Ok(())
    }

    /// Dividend paid per share under this stock's dividend policy.
    pub fn dividend(&self) -> f64 {
        match self.kind {
            StockKind::Common => self.last_dividend,
            StockKind::Preferred { fixed_dividend_pct } => {
                fixed_dividend_pct / 100.0 * self.par_value
            }
        }
    }

    /// Common: last_dividend / price. Preferred: (fixed% * par) / price.
    pub fn dividend_yield(&self, price: f64) -> Result<f64, GbceError> {
        check_price(price)?;
        finite(self.dividend() / price, || format!("dividend yield of {}", self.symbol))
    }

    /// price / last_dividend
    pub fn pe_ratio(&self, price: f64) -> Result<f64, GbceError> {
        check_price(price)?;
        if self.last_dividend == 0.0 {
            return Err(GbceError::DivisionByZero {
                symbol: self.symbol.clone(),
            });
        }
        finite(price / self.last_dividend, || format!("P/E ratio of {}", self.symbol))
    }
}

fn finite(value: f64, what: impl FnOnce() -> String) -> Result<f64, GbceError> {
    if !value.is_finite() {
        return Err(GbceError::NumericOverflow { what: what() });
    }
    Ok(value)
}

fn check_price(price: f64) -> Result<(), GbceError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(GbceError::invalid(format!(
            "price must be positive, got {price}"
        )));
    }
    Ok(())
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Parses the `type` column of a stock table. `Preferred` parses with a zero
/// fixed dividend; the caller fills it in.
impl FromStr for StockKind {
    type Err = GbceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(StockKind::Common),
            "preferred" => Ok(StockKind::Preferred {
                fixed_dividend_pct: 0.0,
            }),
            other => Err(GbceError::invalid(format!(
                "unknown stock type '{other}', expected Common or Preferred"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pop() -> Stock {
        Stock::common("POP", 8.0, 100.0)
    }

    fn gin() -> Stock {
        Stock::preferred("GIN", 8.0, 2.0, 100.0)
    }

    #[test]
    fn common_dividend_yield() {
        assert_relative_eq!(pop().dividend_yield(500.0).unwrap(), 0.016);
    }

    #[test]
    fn preferred_dividend_yield_uses_fixed_percent_of_par() {
        // 2% of 100 = 2, 2 / 500
        assert_relative_eq!(gin().dividend_yield(500.0).unwrap(), 0.004);
    }

    #[test]
    fn zero_dividend_yields_zero() {
        let tea = Stock::common("TEA", 0.0, 100.0);
        assert_eq!(tea.dividend_yield(500.0).unwrap(), 0.0);
    }

    #[test]
    fn dividend_yield_rejects_non_positive_price() {
        for price in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                pop().dividend_yield(price),
                Err(GbceError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn pe_ratio_divides_price_by_last_dividend() {
        assert_relative_eq!(pop().pe_ratio(500.0).unwrap(), 62.5);
        assert_relative_eq!(gin().pe_ratio(500.0).unwrap(), 62.5);
        let ale = Stock::common("ALE", 23.0, 60.0);
        assert_relative_eq!(ale.pe_ratio(500.0).unwrap(), 21.739130434782609);
    }

    #[test]
    fn pe_ratio_zero_dividend_is_division_by_zero() {
        let tea = Stock::common("TEA", 0.0, 100.0);
        let err = tea.pe_ratio(500.0).unwrap_err();
        assert!(matches!(err, GbceError::DivisionByZero { symbol } if symbol == "TEA"));
    }

    #[test]
    fn pe_ratio_checks_price_before_dividend() {
        let tea = Stock::common("TEA", 0.0, 100.0);
        assert!(matches!(
            tea.pe_ratio(0.0),
            Err(GbceError::InvalidInput { .. })
        ));
    }

    #[test]
    fn subnormal_price_overflows_instead_of_returning_infinity() {
        assert!(matches!(
            pop().dividend_yield(1e-320),
            Err(GbceError::NumericOverflow { what }) if what == "dividend yield of POP"
        ));
        let penny = Stock::common("PNY", 0.001, 100.0);
        assert!(matches!(
            penny.pe_ratio(1e308),
            Err(GbceError::NumericOverflow { what }) if what == "P/E ratio of PNY"
        ));
    }

    #[test]
    fn validate_rejects_bad_metadata() {
        assert!(pop().validate().is_ok());
        assert!(gin().validate().is_ok());
        assert!(Stock::common("", 1.0, 100.0).validate().is_err());
        assert!(Stock::common("BAD", -1.0, 100.0).validate().is_err());
        assert!(Stock::common("BAD", 1.0, 0.0).validate().is_err());
        assert!(Stock::preferred("BAD", 1.0, -2.0, 100.0).validate().is_err());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("common".parse::<StockKind>().unwrap(), StockKind::Common);
        assert_eq!(
            " Preferred ".parse::<StockKind>().unwrap(),
            StockKind::Preferred {
                fixed_dividend_pct: 0.0
            }
        );
        assert!("ordinary".parse::<StockKind>().is_err());
    }

    #[test]
    fn fixed_dividend_only_on_preferred() {
        assert_eq!(pop().kind.fixed_dividend_pct(), None);
        assert_eq!(gin().kind.fixed_dividend_pct(), Some(2.0));
    }
}
