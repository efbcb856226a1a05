use crate::error::ValuationError;
use crate::value_objects::price::Price;
use serde::{Deserialize, Serialize};

/// Lower and upper display prices of a position's tick window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub lower_price: Price,
    pub upper_price: Price,
}

impl PriceRange {
    pub fn new(lower: Price, upper: Price) -> Self {
        Self {
            lower_price: lower,
            upper_price: upper,
        }
    }

    /// Decimals-adjusted prices at both ends of `[tick_lower, tick_upper]`.
    pub fn from_ticks(
        tick_lower: i32,
        tick_upper: i32,
        decimals0: u8,
        decimals1: u8,
    ) -> Result<Self, ValuationError> {
        Ok(Self::new(
            Price::at_tick(tick_lower, decimals0, decimals1)?,
            Price::at_tick(tick_upper, decimals0, decimals1)?,
        ))
    }

    /// The same window quoted the other way round. Inverting swaps the ends:
    /// the new lower bound is `1 / upper`.
    pub fn inverted(&self) -> Self {
        Self::new(self.upper_price.invert(), self.lower_price.invert())
    }

    /// `lower<>upper`, six decimal places each.
    pub fn text(&self) -> String {
        format!("{}<>{}", self.lower_price, self.upper_price)
    }
}
