use crate::error::ValuationError;
use crate::math::tick_math::check_tick;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Returns the raw price (token1 units per token0 unit) at a given tick.
/// P = 1.0001 ^ tick
///
/// Display helper only: goes through `f64`, so extreme ticks lose precision
/// or fail to fit a `Decimal`.
pub fn tick_to_price(tick: i32) -> Result<Decimal, ValuationError> {
    let base = 1.0001f64;
    let price_f64 = base.powi(tick);
    Decimal::from_f64(price_f64).ok_or(ValuationError::Overflow("tick to price"))
}

/// Returns the human price of token0 in token1 at a given tick,
/// i.e. `1.0001^tick * 10^(decimals0 - decimals1)`.
pub fn tick_to_adjusted_price(
    tick: i32,
    decimals0: u8,
    decimals1: u8,
) -> Result<Decimal, ValuationError> {
    let exponent = i32::from(decimals0) - i32::from(decimals1);
    let scaled = 1.0001f64.powi(tick) * 10f64.powi(exponent);
    if !scaled.is_finite() {
        return Err(ValuationError::Overflow("tick to price"));
    }
    Decimal::from_f64(scaled).ok_or(ValuationError::Overflow("tick to price"))
}

/// Returns the tick corresponding to a given raw price.
/// tick = log_1.0001(P)
///
/// The result is range-checked like [`crate::math::sqrt_ratio_at_tick`].
pub fn price_to_tick(price: Decimal) -> Result<i32, ValuationError> {
    if price <= Decimal::ZERO {
        return Err(ValuationError::NonPositivePrice);
    }
    let price_f64 = price
        .to_f64()
        .ok_or(ValuationError::Overflow("price to tick"))?;
    let base = 1.0001f64;
    let tick = price_f64
        .log(base)
        .round()
        .to_i32()
        .ok_or(ValuationError::Overflow("price to tick"))?;
    check_tick(tick)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_to_price() {
        // Tick 0 -> Price 1
        let p = tick_to_price(0).unwrap();
        assert_eq!(p, Decimal::from(1));

        // Tick 100 -> 1.0001^100 ~= 1.010049
        let p100 = tick_to_price(100).unwrap();
        // Allow small error due to f64
        let expected = 1.01004966;
        let diff = (p100.to_f64().unwrap() - expected).abs();
        assert!(diff < 0.000001);
    }

    #[test]
    fn test_adjusted_price_for_weth_usdc() {
        // WETH (18) / USDC (6) around $2000: raw price 2000e-12 -> tick ~ -200311.
        let p = tick_to_adjusted_price(-200_311, 18, 6).unwrap();
        let v = p.to_f64().unwrap();
        assert!((v - 2000.0).abs() < 1.0, "got {v}");
    }

    #[test]
    fn test_adjusted_price_overflow() {
        assert!(tick_to_adjusted_price(887_272, 18, 0).is_err());
    }

    #[test]
    fn test_price_to_tick() {
        let t = price_to_tick(Decimal::from(1)).unwrap();
        assert_eq!(t, 0);

        let t2 = price_to_tick(Decimal::from_f64(1.01004966).unwrap()).unwrap();
        assert_eq!(t2, 100);

        assert!(price_to_tick(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_price_to_tick_stays_in_tick_range() {
        // The whole Decimal domain maps inside [MIN_TICK, MAX_TICK].
        let top = price_to_tick(Decimal::MAX).unwrap();
        let bottom = price_to_tick(Decimal::new(1, 28)).unwrap();
        assert!(top > 600_000 && top <= crate::math::MAX_TICK, "top {top}");
        assert!(bottom < -600_000 && bottom >= crate::math::MIN_TICK, "bottom {bottom}");
        assert_eq!(price_to_tick(Decimal::from(-5)), Err(ValuationError::NonPositivePrice));
    }
}
