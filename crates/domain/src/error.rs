//! Errors raised while valuing a liquidity position.

use primitive_types::U256;
use thiserror::Error;

/// Reasons a position valuation cannot complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// The factory returned the zero address for the pair and fee tier.
    #[error("Pool not found for {token0}/{token1} with fee {fee_percent}%")]
    PoolNotFound {
        token0: String,
        token1: String,
        fee_percent: String,
    },

    /// A token metadata call failed.
    #[error("Token metadata unavailable for {address}: {reason}")]
    MetadataUnavailable { address: String, reason: String },

    /// Tick outside `[MIN_TICK, MAX_TICK]`.
    #[error("Tick {0} is outside the supported range")]
    TickOutOfRange(i32),

    /// A position whose lower tick sits above its upper tick.
    #[error("Invalid tick order: lower {lower} > upper {upper}")]
    InvalidTickOrder { lower: i32, upper: i32 },

    /// sqrtPriceX96 outside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]`.
    #[error("sqrtPriceX96 {0} is outside the supported range")]
    InvalidSqrtPrice(U256),

    #[error("Price must be positive")]
    NonPositivePrice,

    #[error("Division by zero in {0}")]
    DivisionByZero(&'static str),

    #[error("Overflow in {0}")]
    Overflow(&'static str),
}

impl ValuationError {
    /// True for errors that mean the caller handed in corrupt numeric data.
    #[must_use]
    pub fn is_arithmetic_domain(&self) -> bool {
        matches!(
            self,
            Self::TickOutOfRange(_)
                | Self::InvalidTickOrder { .. }
                | Self::InvalidSqrtPrice(_)
                | Self::NonPositivePrice
                | Self::DivisionByZero(_)
                | Self::Overflow(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_not_found_message() {
        let err = ValuationError::PoolNotFound {
            token0: "WETH".to_string(),
            token1: "USDC".to_string(),
            fee_percent: "0.05".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Pool not found for WETH/USDC with fee 0.05%"
        );
        assert!(!err.is_arithmetic_domain());
    }

    #[test]
    fn test_arithmetic_domain_classification() {
        assert!(ValuationError::TickOutOfRange(900_000).is_arithmetic_domain());
        assert!(ValuationError::InvalidSqrtPrice(U256::zero()).is_arithmetic_domain());
        assert!(
            !ValuationError::MetadataUnavailable {
                address: "0x0".to_string(),
                reason: "reverted".to_string(),
            }
            .is_arithmetic_domain()
        );
    }
}
