use crate::error::ValuationError;
use primitive_types::U256;

/// Lowest tick a Uniswap V3 pool can reach, log base 1.0001 of 2^-128.
pub const MIN_TICK: i32 = -887_272;
/// Highest tick a Uniswap V3 pool can reach, log base 1.0001 of 2^128.
pub const MAX_TICK: i32 = -MIN_TICK;

/// `sqrt_ratio_at_tick(MIN_TICK)` = 4295128739.
pub const MIN_SQRT_RATIO: U256 = U256([4_295_128_739, 0, 0, 0]);
/// `sqrt_ratio_at_tick(MAX_TICK)` = 1461446703485210103287273052203988822378723970342.
pub const MAX_SQRT_RATIO: U256 = U256([0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963, 0]);

/// 2^96, the scale of a Q64.96 sqrt price.
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// Q128.128 values of `1 / sqrt(1.0001)^(2^i)` for bits 1..=19 of |tick|.
const RATIO_MULTIPLIERS: [(u32, u128); 19] = [
    (0x2, 0xfff97272373d413259a46990580e213a),
    (0x4, 0xfff2e50f5f656932ef12357cf3c7fdcc),
    (0x8, 0xffe5caca7e10e4e61c3624eaa0941cd0),
    (0x10, 0xffcb9843d60f6159c9db58835c926644),
    (0x20, 0xff973b41fa98c081472e6896dfb254c0),
    (0x40, 0xff2ea16466c96a3843ec78b326b52861),
    (0x80, 0xfe5dee046a99a2a811c461f1969c3053),
    (0x100, 0xfcbe86c7900a88aedcffc83b479aa3a4),
    (0x200, 0xf987a7253ac413176f2b074cf7815e54),
    (0x400, 0xf3392b0822b70005940c7a398e4b70f3),
    (0x800, 0xe7159475a2c29b7443b29c7fa6e889d9),
    (0x1000, 0xd097f3bdfd2022b8845ad8f792aa5825),
    (0x2000, 0xa9f746462d870fdf8a65dc1f90e061e5),
    (0x4000, 0x70d869a156d2a1b890bb3df62baf32f7),
    (0x8000, 0x31be135f97d08fd981231505542fcfa6),
    (0x10000, 0x9aa508b5b7a84e1c677de54f3e99bc9),
    (0x20000, 0x5d6af8dedb81196699c329225ee604),
    (0x40000, 0x2216e584f5fa1ea926041bedfe98),
    (0x80000, 0x48a170391f7dc42444e8fa2),
];

/// Returns `sqrt(1.0001^tick) * 2^96` as a Q64.96 integer.
///
/// Integer-only port of the pool contract's `getSqrtRatioAtTick`: the ratio is
/// built in Q128.128 from precomputed powers and rounded up when shifted down
/// to Q64.96. The result is deterministic and agrees with the real-valued
/// formula to within one unit in the last place, with `tick = 0` mapping to
/// exactly `2^96`.
///
/// # Errors
///
/// [`ValuationError::TickOutOfRange`] when `tick` is outside `[MIN_TICK, MAX_TICK]`.
/// Out-of-range ticks are rejected, never clamped.
pub fn sqrt_ratio_at_tick(tick: i32) -> Result<U256, ValuationError> {
    let abs_tick = check_tick(tick)?.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(0xfffcb933bd6fad37aa2d162d1a594001_u128)
    } else {
        U256::one() << 128
    };
    for (bit, multiplier) in RATIO_MULTIPLIERS {
        if abs_tick & bit != 0 {
            // ratio <= 2^128 and multiplier < 2^128, so the product fits.
            ratio = (ratio * U256::from(multiplier)) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up.
    let remainder = ratio % (U256::one() << 32);
    let sqrt_price = (ratio >> 32) + if remainder.is_zero() { U256::zero() } else { U256::one() };
    Ok(sqrt_price)
}

/// Checks that a tick lies inside `[MIN_TICK, MAX_TICK]`.
///
/// # Errors
///
/// [`ValuationError::TickOutOfRange`] otherwise.
pub fn check_tick(tick: i32) -> Result<i32, ValuationError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(ValuationError::TickOutOfRange(tick));
    }
    Ok(tick)
}

/// Checks that a pool-reported sqrt price lies inside the reachable range.
///
/// # Errors
///
/// [`ValuationError::InvalidSqrtPrice`] for zero (uninitialised pool) or any
/// value outside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]`.
pub fn check_sqrt_price(sqrt_price_x96: U256) -> Result<U256, ValuationError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 > MAX_SQRT_RATIO {
        return Err(ValuationError::InvalidSqrtPrice(sqrt_price_x96));
    }
    Ok(sqrt_price_x96)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> U256 {
        U256::from_dec_str(s).unwrap()
    }

    #[test]
    fn test_tick_zero_is_q96() {
        assert_eq!(sqrt_ratio_at_tick(0).unwrap(), Q96);
        assert_eq!(Q96, U256::one() << 96);
    }

    #[test]
    fn test_bounds_match_constants() {
        assert_eq!(sqrt_ratio_at_tick(MIN_TICK).unwrap(), MIN_SQRT_RATIO);
        assert_eq!(sqrt_ratio_at_tick(MAX_TICK).unwrap(), MAX_SQRT_RATIO);
        assert_eq!(
            MAX_SQRT_RATIO,
            dec("1461446703485210103287273052203988822378723970342")
        );
    }

    #[test]
    fn test_known_values() {
        assert_eq!(sqrt_ratio_at_tick(1).unwrap(), dec("79232123823359799118286999568"));
        assert_eq!(sqrt_ratio_at_tick(-1).unwrap(), dec("79224201403219477170569942574"));
        assert_eq!(sqrt_ratio_at_tick(100).unwrap(), dec("79625275426524748796330556128"));
        assert_eq!(sqrt_ratio_at_tick(-100).unwrap(), dec("78833030112140176575862854579"));
        assert_eq!(sqrt_ratio_at_tick(60).unwrap(), dec("79466191966197645195421774833"));
    }

    #[test]
    fn test_out_of_range_ticks_fail() {
        assert_eq!(
            sqrt_ratio_at_tick(MAX_TICK + 1),
            Err(ValuationError::TickOutOfRange(887_273))
        );
        assert_eq!(
            sqrt_ratio_at_tick(MIN_TICK - 1),
            Err(ValuationError::TickOutOfRange(-887_273))
        );
        assert!(sqrt_ratio_at_tick(i32::MIN).is_err());
        assert_eq!(check_tick(MIN_TICK), Ok(MIN_TICK));
        assert_eq!(check_tick(1_000_000), Err(ValuationError::TickOutOfRange(1_000_000)));
    }

    #[test]
    fn test_monotonic() {
        let mut previous = sqrt_ratio_at_tick(MIN_TICK).unwrap();
        let mut tick = MIN_TICK;
        while tick < MAX_TICK {
            tick = (tick + 7919).min(MAX_TICK);
            let current = sqrt_ratio_at_tick(tick).unwrap();
            assert!(current >= previous, "not monotonic at tick {tick}");
            previous = current;
        }
        for t in -50..50 {
            assert!(sqrt_ratio_at_tick(t + 1).unwrap() > sqrt_ratio_at_tick(t).unwrap());
        }
    }

    #[test]
    fn test_close_to_floating_point_formula() {
        for tick in [-50_000, -1000, -10, 10, 1000, 50_000] {
            let exact = sqrt_ratio_at_tick(tick).unwrap();
            let approx = 1.0001f64.powf(tick as f64 / 2.0) * 2f64.powi(96);
            let exact_f = exact.to_string().parse::<f64>().unwrap();
            let rel = ((exact_f - approx) / approx).abs();
            assert!(rel < 1e-9, "tick {tick}: relative error {rel}");
        }
    }

    #[test]
    fn test_check_sqrt_price() {
        assert!(check_sqrt_price(Q96).is_ok());
        assert!(check_sqrt_price(MIN_SQRT_RATIO).is_ok());
        assert!(check_sqrt_price(MAX_SQRT_RATIO).is_ok());
        assert_eq!(
            check_sqrt_price(U256::zero()),
            Err(ValuationError::InvalidSqrtPrice(U256::zero()))
        );
        assert!(check_sqrt_price(MAX_SQRT_RATIO + U256::one()).is_err());
    }
}
