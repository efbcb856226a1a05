//! Domain model for Uniswap V3 position reporting.
//!
//! This crate is pure and synchronous:
//! - Entities read from chain (positions, pools, token metadata)
//! - Tick math and liquidity-to-amount conversion on 256-bit integers
//! - Range classification
//! - The [`valuation::PositionValuator`] and its output records
//! - USD figures over valued positions

/// Position, pool and token snapshots.
pub mod entities;
/// Range and position status.
pub mod enums;
/// Valuation errors.
pub mod error;
/// Tick math and liquidity amounts.
pub mod math;
/// USD valuation and portfolio summary.
pub mod metrics;
/// Serde helpers for `U256` as decimal strings.
pub mod serde_u256;
/// Position valuator.
pub mod valuation;
/// Amounts, percentages and prices.
pub mod value_objects;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::entities::{
        Pool, Position, RawPosition, Slot0, TokenId, TokenInfo, ZERO_ADDRESS, is_zero_address,
        resolve_token_info, strip_wrapped_prefix,
    };
    pub use crate::enums::{PositionStatus, RangeStatus, classify_range};
    pub use crate::error::ValuationError;
    pub use crate::math::{
        MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, amounts_for_liquidity, sqrt_ratio_at_tick,
    };
    pub use crate::metrics::{PortfolioSummary, PriceBook, UsdValuation};
    pub use crate::valuation::{
        PositionValuation, PositionValuator, ValuationFailure, ValuationInput, ValuationOutcome,
    };
    pub use crate::value_objects::{Amount, Percentage, Price, PriceRange};
}
