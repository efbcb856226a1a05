use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::BigInt;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest scale a `Decimal` supports.
const MAX_DECIMAL_SCALE: u32 = 28;

/// A raw on-chain token amount together with the token's decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    #[serde(with = "crate::serde_u256")]
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn from_u128(raw: u128, decimals: u8) -> Self {
        Self::new(U256::from(raw), decimals)
    }

    /// Human-readable amount, `raw / 10^decimals`, exact and normalised.
    ///
    /// Every `U256` with any number of decimals is representable, so a
    /// position at `u128::MAX` liquidity values without loss.
    pub fn to_big_decimal(&self) -> BigDecimal {
        // Limbs are little-endian 64-bit words.
        let digits = self
            .raw
            .0
            .iter()
            .rev()
            .fold(BigInt::from(0u8), |acc, limb| (acc << 64usize) + BigInt::from(*limb));
        BigDecimal::new(digits, i64::from(self.decimals)).normalized()
    }
}

/// Narrows an exact amount to a `Decimal` for arithmetic against prices.
///
/// Fraction digits past the 28th are dropped and the final addition may round.
/// Returns `None` when the whole part exceeds `Decimal::MAX`.
pub fn to_decimal(value: &BigDecimal) -> Option<Decimal> {
    let whole = value.with_scale(0);
    let fraction = (value - &whole).with_scale(i64::from(MAX_DECIMAL_SCALE));

    let (whole, _) = whole.into_bigint_and_exponent();
    let (fraction, _) = fraction.into_bigint_and_exponent();
    let whole = Decimal::try_from_i128_with_scale(i128::try_from(&whole).ok()?, 0).ok()?;
    // |fraction| < 10^28 < 2^96, so it always fits.
    let fraction = Decimal::try_from_i128_with_scale(i128::try_from(&fraction).ok()?, MAX_DECIMAL_SCALE).ok()?;

    whole.checked_add(fraction).map(|d| d.normalize())
}
