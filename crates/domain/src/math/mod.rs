//! Fixed-point and display math for Uniswap V3 style positions.

pub mod liquidity_amounts;
pub mod price_tick;
pub mod tick_math;

pub use liquidity_amounts::amounts_for_liquidity;
pub use tick_math::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, Q96, check_tick, sqrt_ratio_at_tick};
