use crate::error::ValuationError;
use crate::math::price_tick::tick_to_adjusted_price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Human price of token0 quoted in token1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Decimals-adjusted price at `tick`.
    pub fn at_tick(tick: i32, decimals0: u8, decimals1: u8) -> Result<Self, ValuationError> {
        tick_to_adjusted_price(tick, decimals0, decimals1).map(Self::new)
    }

    /// `1 / value`; a zero price stays zero.
    pub fn invert(&self) -> Self {
        Self {
            value: Decimal::ONE.checked_div(self.value).unwrap_or(Decimal::ZERO),
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invert() {
        assert_eq!(Price::new(dec!(4)).invert().value, dec!(0.25));
        assert_eq!(Price::new(Decimal::ZERO).invert().value, Decimal::ZERO);
    }

    #[test]
    fn test_display_six_places() {
        assert_eq!(Price::new(dec!(1.23456789)).to_string(), "1.234568");
        assert_eq!(Price::new(dec!(2)).to_string(), "2.000000");
    }

    #[test]
    fn test_at_tick_zero_same_decimals() {
        assert_eq!(Price::at_tick(0, 18, 18).unwrap().value, Decimal::ONE);
    }
}
