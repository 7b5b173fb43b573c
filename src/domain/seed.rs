//! The Global Beverage Corporation Exchange stock table.

use crate::domain::stock::Stock;

pub fn gbce_stocks() -> Vec<Stock> {
    vec![
        Stock::common("TEA", 0.0, 100.0),
        Stock::common("POP", 8.0, 100.0),
        Stock::common("ALE", 23.0, 60.0),
        Stock::preferred("GIN", 8.0, 2.0, 100.0),
        Stock::common("JOE", 13.0, 250.0),
    ]
}
