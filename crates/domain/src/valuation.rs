//! Position valuation: liquidity and ticks in, human-readable record out.
//!
//! [`PositionValuator::valuate`] is pure. It never touches the network; every
//! input is a snapshot the caller already fetched.

use crate::entities::token::UNKNOWN;
use crate::entities::{Pool, Position, TokenId, TokenInfo};
use crate::enums::{PositionStatus, RangeStatus};
use crate::error::ValuationError;
use crate::math::{amounts_for_liquidity, check_tick};
use crate::value_objects::{Amount, Percentage, Price, PriceRange};
use bigdecimal::BigDecimal;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Symbols that are quoted in the other token when building display prices.
pub const DEFAULT_BASE_SYMBOLS: [&str; 4] = ["WETH", "ETH", "WBTC", "BTC"];

/// One side of a valued position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenValuation {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    /// Human amount held by the position's liquidity, exact.
    pub amount: BigDecimal,
    /// Human amount of fees owed but not collected. Never part of `amount`.
    pub uncollected_fees: BigDecimal,
    #[serde(with = "crate::serde_u256")]
    pub raw_amount: U256,
}

impl TokenValuation {
    fn new(info: &TokenInfo, address: &str, raw_amount: U256, raw_fees: u128) -> Self {
        Self {
            address: address.to_string(),
            symbol: info.symbol.clone(),
            name: info.name.clone(),
            decimals: info.decimals,
            amount: Amount::new(raw_amount, info.decimals).to_big_decimal(),
            uncollected_fees: Amount::from_u128(raw_fees, info.decimals).to_big_decimal(),
            raw_amount,
        }
    }

    /// True when the metadata behind this side is the `Unknown` fallback.
    pub fn is_unknown(&self) -> bool {
        self.symbol == UNKNOWN && self.name == UNKNOWN
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub address: String,
    /// Fee tier in percent, e.g. `0.3`.
    pub fee: Percentage,
    pub current_tick: i32,
    #[serde(with = "crate::serde_u256")]
    pub current_sqrt_price_x96: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub liquidity: u128,
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Tick window check only; a closed position can still be "in range".
    pub in_range: bool,
    pub range_status: RangeStatus,
    pub status: PositionStatus,
}

/// Display prices for the position's window, best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRangeView {
    pub price_lower: Decimal,
    pub price_upper: Decimal,
    pub current_price: Decimal,
    pub price_range_text: String,
    pub price_is_inverted: bool,
}

/// Valuation record for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionValuation {
    pub token_id: TokenId,
    pub token0: TokenValuation,
    pub token1: TokenValuation,
    pub pool: PoolSummary,
    pub position: PositionSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRangeView>,
}

impl PositionValuation {
    pub fn range_status(&self) -> RangeStatus {
        self.position.range_status
    }

    pub fn is_active(&self) -> bool {
        self.position.status == PositionStatus::Active
    }

    /// Either side was valued with fallback metadata.
    pub fn has_unknown_metadata(&self) -> bool {
        self.token0.is_unknown() || self.token1.is_unknown()
    }
}

/// Error record for a position that could not be valued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationFailure {
    pub token_id: TokenId,
    pub error: String,
}

/// Per-position result of a batch. Serialises as either the valuation record
/// or `{ "token_id", "error" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ValuationOutcome {
    Valued(Box<PositionValuation>),
    Failed(ValuationFailure),
}

impl ValuationOutcome {
    pub fn from_result(token_id: TokenId, result: Result<PositionValuation, ValuationError>) -> Self {
        match result {
            Ok(valuation) => Self::Valued(Box::new(valuation)),
            Err(err) => Self::failed(token_id, err),
        }
    }

    pub fn failed(token_id: TokenId, error: impl ToString) -> Self {
        Self::Failed(ValuationFailure {
            token_id,
            error: error.to_string(),
        })
    }

    pub fn token_id(&self) -> TokenId {
        match self {
            Self::Valued(v) => v.token_id,
            Self::Failed(f) => f.token_id,
        }
    }

    pub fn valuation(&self) -> Option<&PositionValuation> {
        match self {
            Self::Valued(v) => Some(v),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Valued(_) => None,
            Self::Failed(f) => Some(&f.error),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Borrowed inputs for one position in [`PositionValuator::valuate_batch`].
#[derive(Debug, Clone, Copy)]
pub struct ValuationInput<'a> {
    pub position: &'a Position,
    pub pool: &'a Pool,
    pub token0: &'a TokenInfo,
    pub token1: &'a TokenInfo,
}

/// Turns position and pool snapshots into [`PositionValuation`] records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionValuator {
    base_symbols: Vec<String>,
}

impl Default for PositionValuator {
    fn default() -> Self {
        Self::with_base_symbols(DEFAULT_BASE_SYMBOLS)
    }
}

impl PositionValuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the symbols quoted in the other token for display prices.
    pub fn with_base_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            base_symbols: symbols
                .into_iter()
                .map(|s| s.as_ref().trim().to_ascii_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn base_symbols(&self) -> &[String] {
        &self.base_symbols
    }

    fn is_base_symbol(&self, symbol: &str) -> bool {
        self.base_symbols.iter().any(|b| b.eq_ignore_ascii_case(symbol))
    }

    /// Values one position against its pool.
    ///
    /// `token0`/`token1` may be fallback metadata from [`TokenInfo::unknown`];
    /// the math then runs with 18 decimals and the record keeps the
    /// `Unknown` sentinel so callers can spot it.
    ///
    /// # Errors
    ///
    /// [`ValuationError::PoolNotFound`] when `pool` carries the zero address,
    /// [`ValuationError::InvalidTickOrder`] when `tick_lower > tick_upper`,
    /// [`ValuationError::TickOutOfRange`] for a pool tick outside
    /// `[MIN_TICK, MAX_TICK]`, and any arithmetic error from the amount math.
    pub fn valuate(
        &self,
        position: &Position,
        pool: &Pool,
        token0: &TokenInfo,
        token1: &TokenInfo,
    ) -> Result<PositionValuation, ValuationError> {
        let fee = Percentage::from_fee_tier(position.fee);
        if pool.is_null() {
            return Err(ValuationError::PoolNotFound {
                token0: token0.symbol.clone(),
                token1: token1.symbol.clone(),
                fee_percent: fee.0.to_string(),
            });
        }
        if position.tick_lower > position.tick_upper {
            return Err(ValuationError::InvalidTickOrder {
                lower: position.tick_lower,
                upper: position.tick_upper,
            });
        }
        check_tick(pool.current_tick)?;

        let (raw0, raw1) = amounts_for_liquidity(
            position.liquidity,
            position.tick_lower,
            position.tick_upper,
            pool.sqrt_price_x96,
        )?;

        let range_status = RangeStatus::classify(
            position.tick_lower,
            position.tick_upper,
            pool.current_tick,
            position.liquidity,
        );
        let in_range = position.tick_lower <= pool.current_tick && pool.current_tick <= position.tick_upper;

        Ok(PositionValuation {
            token_id: position.token_id,
            token0: TokenValuation::new(token0, &position.token0, raw0, position.tokens_owed0),
            token1: TokenValuation::new(token1, &position.token1, raw1, position.tokens_owed1),
            pool: PoolSummary {
                address: pool.address.clone(),
                fee,
                current_tick: pool.current_tick,
                current_sqrt_price_x96: pool.sqrt_price_x96,
            },
            position: PositionSummary {
                liquidity: position.liquidity,
                tick_lower: position.tick_lower,
                tick_upper: position.tick_upper,
                in_range,
                range_status,
                status: PositionStatus::from_liquidity(position.liquidity),
            },
            price_range: self.price_range_view(position, pool, token0, token1),
        })
    }

    /// Values every input independently; a failure becomes a
    /// [`ValuationOutcome::Failed`] record and never stops the batch.
    pub fn valuate_batch<'a, I>(&self, inputs: I) -> Vec<ValuationOutcome>
    where
        I: IntoIterator<Item = ValuationInput<'a>>,
    {
        inputs
            .into_iter()
            .map(|input| {
                ValuationOutcome::from_result(
                    input.position.token_id,
                    self.valuate(input.position, input.pool, input.token0, input.token1),
                )
            })
            .collect()
    }

    fn price_range_view(
        &self,
        position: &Position,
        pool: &Pool,
        token0: &TokenInfo,
        token1: &TokenInfo,
    ) -> Option<PriceRangeView> {
        let range =
            PriceRange::from_ticks(position.tick_lower, position.tick_upper, token0.decimals, token1.decimals)
                .ok()?;
        let current = Price::at_tick(pool.current_tick, token0.decimals, token1.decimals).ok()?;

        let invert = self.is_base_symbol(&token1.symbol) && !self.is_base_symbol(&token0.symbol);
        let (range, current) = if invert {
            // A zero end would invert to infinity.
            if range.lower_price.value.is_zero() || current.value.is_zero() {
                return None;
            }
            (range.inverted(), current.invert())
        } else {
            (range, current)
        };

        Some(PriceRangeView {
            price_lower: range.lower_price.value,
            price_upper: range.upper_price.value,
            current_price: current.value,
            price_range_text: range.text(),
            price_is_inverted: invert,
        })
    }
}
