use crate::error::ValuationError;
use crate::math::tick_math::{Q96, check_sqrt_price, sqrt_ratio_at_tick};
use primitive_types::{U256, U512};

/// `floor(a * b / denominator)` with a 512-bit intermediate product.
fn mul_div(a: U256, b: U256, denominator: U256, context: &'static str) -> Result<U256, ValuationError> {
    if denominator.is_zero() {
        return Err(ValuationError::DivisionByZero(context));
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    U256::try_from(quotient).map_err(|_| ValuationError::Overflow(context))
}

/// `floor(a * b / 2^96)`, the Q96 product of two sqrt prices.
fn mul_q96(a: U256, b: U256, context: &'static str) -> Result<U256, ValuationError> {
    U256::try_from(a.full_mul(b) >> 96).map_err(|_| ValuationError::Overflow(context))
}

/// Raw token0 amount for `liquidity` spread over `[sqrt_a, sqrt_b]`.
///
/// `L * (sqrt_b - sqrt_a) / (sqrt_a * sqrt_b / 2^96)`. The denominator is
/// floored before the division, matching the reporting formula rather than
/// the pool's own rounding.
fn amount0_for_range(liquidity: U256, sqrt_a: U256, sqrt_b: U256) -> Result<U256, ValuationError> {
    let denominator = mul_q96(sqrt_a, sqrt_b, "amount0 denominator")?;
    mul_div(liquidity, sqrt_b - sqrt_a, denominator, "amount0")
}

/// Raw token1 amount: `L * (sqrt_b - sqrt_a) / 2^96`.
fn amount1_for_range(liquidity: U256, sqrt_a: U256, sqrt_b: U256) -> Result<U256, ValuationError> {
    mul_div(liquidity, sqrt_b - sqrt_a, Q96, "amount1")
}

/// Converts a position's liquidity into raw token0/token1 amounts at the
/// current pool price.
///
/// - price at or below the lower bound: all token0;
/// - price at or above the upper bound: all token1;
/// - otherwise both, split at the current price.
///
/// Reversed ticks are swapped so that `sqrt_a <= sqrt_b`. Zero liquidity
/// returns `(0, 0)` before any tick or price checks. All divisions floor and
/// every product is taken before its division.
///
/// # Errors
///
/// - [`ValuationError::TickOutOfRange`] for ticks outside the pool limits;
/// - [`ValuationError::InvalidSqrtPrice`] for a zero or unreachable price;
/// - [`ValuationError::DivisionByZero`] when `sqrt_a * sqrt_b / 2^96` floors to
///   zero at extreme negative ticks;
/// - [`ValuationError::Overflow`] if an amount does not fit in 256 bits.
pub fn amounts_for_liquidity(
    liquidity: u128,
    tick_lower: i32,
    tick_upper: i32,
    current_sqrt_price_x96: U256,
) -> Result<(U256, U256), ValuationError> {
    if liquidity == 0 {
        return Ok((U256::zero(), U256::zero()));
    }

    let mut sqrt_a = sqrt_ratio_at_tick(tick_lower)?;
    let mut sqrt_b = sqrt_ratio_at_tick(tick_upper)?;
    if sqrt_a > sqrt_b {
        std::mem::swap(&mut sqrt_a, &mut sqrt_b);
    }
    let current = check_sqrt_price(current_sqrt_price_x96)?;
    let liquidity = U256::from(liquidity);

    if current <= sqrt_a {
        Ok((amount0_for_range(liquidity, sqrt_a, sqrt_b)?, U256::zero()))
    } else if current >= sqrt_b {
        Ok((U256::zero(), amount1_for_range(liquidity, sqrt_a, sqrt_b)?))
    } else {
        let amount0 = amount0_for_range(liquidity, current, sqrt_b)?;
        let amount1 = amount1_for_range(liquidity, sqrt_a, current)?;
        Ok((amount0, amount1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::{MAX_TICK, MIN_TICK};

    fn sqrt(tick: i32) -> U256 {
        sqrt_ratio_at_tick(tick).unwrap()
    }

    fn dec(s: &str) -> U256 {
        U256::from_dec_str(s).unwrap()
    }

    #[test]
    fn test_in_range_holds_both_tokens() {
        let (a0, a1) = amounts_for_liquidity(1_000_000, -100, 100, sqrt(0)).unwrap();
        assert_eq!(a0, U256::from(4987));
        assert_eq!(a1, U256::from(4987));

        let (a0, a1) = amounts_for_liquidity(10u128.pow(18), -100, 100, sqrt(0)).unwrap();
        assert_eq!(a0, U256::from(4_987_272_070_749_096u64));
        assert_eq!(a1, U256::from(4_987_272_070_749_096u64));
    }

    #[test]
    fn test_below_range_is_all_token0() {
        let (a0, a1) = amounts_for_liquidity(10u128.pow(18), -100, 100, sqrt(-200)).unwrap();
        assert_eq!(a0, U256::from(9_999_541_693_800_299u64));
        assert!(a1.is_zero());

        // Exactly at the lower bound counts as below.
        let (a0, a1) = amounts_for_liquidity(10u128.pow(18), -100, 100, sqrt(-100)).unwrap();
        assert_eq!(a0, U256::from(9_999_541_693_800_299u64));
        assert!(a1.is_zero());
    }

    #[test]
    fn test_above_range_is_all_token1() {
        let (a0, a1) = amounts_for_liquidity(10u128.pow(18), -100, 100, sqrt(200)).unwrap();
        assert!(a0.is_zero());
        assert_eq!(a1, U256::from(9_999_541_693_800_299u64));

        let (a0, a1) = amounts_for_liquidity(10u128.pow(18), -100, 100, sqrt(100)).unwrap();
        assert!(a0.is_zero());
        assert_eq!(a1, U256::from(9_999_541_693_800_299u64));
    }

    #[test]
    fn test_zero_liquidity_short_circuits() {
        assert_eq!(
            amounts_for_liquidity(0, -100, 100, sqrt(0)).unwrap(),
            (U256::zero(), U256::zero())
        );
        // Even with nonsense ticks and price.
        assert_eq!(
            amounts_for_liquidity(0, i32::MAX, i32::MIN, U256::zero()).unwrap(),
            (U256::zero(), U256::zero())
        );
    }

    #[test]
    fn test_reversed_ticks_are_normalised() {
        let forward = amounts_for_liquidity(10u128.pow(18), -100, 100, sqrt(0)).unwrap();
        let reversed = amounts_for_liquidity(10u128.pow(18), 100, -100, sqrt(0)).unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_zero_width_range() {
        // Any price is at or below sqrt_a == sqrt_b, or above it: never both tokens.
        let (a0, a1) = amounts_for_liquidity(10u128.pow(18), 60, 60, sqrt(0)).unwrap();
        assert!(a0.is_zero() && a1.is_zero());
        let (a0, a1) = amounts_for_liquidity(10u128.pow(18), 60, 60, sqrt(120)).unwrap();
        assert!(a0.is_zero() && a1.is_zero());
    }

    #[test]
    fn test_uint128_max_liquidity() {
        let (a0, a1) = amounts_for_liquidity(u128::MAX, MIN_TICK, MAX_TICK, sqrt(0)).unwrap();
        assert_eq!(a0, dec("340282366920938463444927169969384229630"));
        assert_eq!(a1, dec("340282366920938463444927169965653491711"));

        let (a0, a1) = amounts_for_liquidity(u128::MAX, 0, 10, sqrt(-10)).unwrap();
        assert_eq!(a0, dec("170090153012932385310901701277258209"));
        assert!(a1.is_zero());

        let (a0, a1) = amounts_for_liquidity(u128::MAX, 0, 10, sqrt(20)).unwrap();
        assert!(a0.is_zero());
        assert_eq!(a1, dec("170175215100155139373702415067906047"));
    }

    #[test]
    fn test_negative_tick_range() {
        // A WETH/USDC-like range, prices well below 1.0 in raw units.
        let (a0, a1) =
            amounts_for_liquidity(10u128.pow(15), -201_000, -199_000, sqrt(-200_000)).unwrap();
        assert!(a0 > U256::zero());
        assert!(a1 > U256::zero());
    }

    #[test]
    fn test_invalid_inputs_fail_loudly() {
        assert_eq!(
            amounts_for_liquidity(1, MIN_TICK - 1, 0, sqrt(0)),
            Err(ValuationError::TickOutOfRange(MIN_TICK - 1))
        );
        assert_eq!(
            amounts_for_liquidity(1, -100, 100, U256::zero()),
            Err(ValuationError::InvalidSqrtPrice(U256::zero()))
        );
        // sqrt_a * sqrt_b / 2^96 floors to zero this close to MIN_TICK.
        assert_eq!(
            amounts_for_liquidity(1, MIN_TICK, MIN_TICK + 10, sqrt(MIN_TICK)),
            Err(ValuationError::DivisionByZero("amount0"))
        );
    }

    #[test]
    fn test_one_sided_properties() {
        for (lower, upper) in [(-100, 100), (0, 1), (-10_000, 10_000), (-250_000, -240_000)] {
            for liquidity in [1_000_000u128, 10u128.pow(20)] {
                let (a0, a1) = amounts_for_liquidity(liquidity, lower, upper, sqrt(lower)).unwrap();
                assert!(a1.is_zero());
                assert!(a0 > U256::zero(), "range [{lower}, {upper}] liquidity {liquidity}");

                let (a0, a1) = amounts_for_liquidity(liquidity, lower, upper, sqrt(upper)).unwrap();
                assert!(a0.is_zero());
                assert!(a1 > U256::zero(), "range [{lower}, {upper}] liquidity {liquidity}");
            }
        }
    }
}
