use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct BreedCount {
    pub breed: String,
    pub sold_count: u32,
    pub returned_count: u32,
}

/// Sales and returns aggregated by the backend over a date range.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SalesStats {
    pub sold_count: u32,
    pub returned_count: u32,
    pub revenue: Decimal,
    #[serde(default)]
    pub by_breed: Vec<BreedCount>,
}

impl SalesStats {
    /// Returned birds as a percentage of sold birds, rounded to 2 decimals.
    pub fn return_rate(&self) -> Decimal {
        if self.sold_count == 0 {
            return Decimal::ZERO;
        }

        (Decimal::from(self.returned_count) * dec!(100) / Decimal::from(self.sold_count)).round_dp(2)
    }
}
