use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A percentage, e.g. `0.3` for a 0.3% fee tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(pub Decimal);

impl Percentage {
    /// Converts a pool fee in hundredths of a basis point to percent:
    /// 3000 -> 0.3, 500 -> 0.05, 100 -> 0.01.
    pub fn from_fee_tier(fee: u32) -> Self {
        Self((Decimal::from(fee) / Decimal::from(10_000)).normalize())
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
