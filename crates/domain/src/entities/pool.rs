use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// What a factory returns for a pair/fee tier without a deployed pool.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Returns true for the null address, in any casing, with or without `0x`.
pub fn is_zero_address(address: &str) -> bool {
    let hex = address
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    !hex.is_empty() && hex.chars().all(|c| c == '0')
}

/// Output of a pool's `slot0()` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot0 {
    #[serde(with = "crate::serde_u256")]
    pub sqrt_price_x96: U256,
    pub tick: i32,
    #[serde(default)]
    pub observation_index: u16,
    #[serde(default)]
    pub observation_cardinality: u16,
    #[serde(default)]
    pub observation_cardinality_next: u16,
    #[serde(default)]
    pub fee_protocol: u8,
    #[serde(default)]
    pub unlocked: bool,
}

/// Pool snapshot as seen by the valuator.
///
/// `current_tick` is the pool's reported tick and drives range checks;
/// `sqrt_price_x96` only feeds the amount math. The two are not cross-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub address: String,
    pub fee: u32, // hundredths of a bip, e.g. 3000 for 0.3%
    #[serde(with = "crate::serde_u256")]
    pub sqrt_price_x96: U256,
    pub current_tick: i32,
}

impl Pool {
    pub fn new(address: impl Into<String>, fee: u32, sqrt_price_x96: U256, current_tick: i32) -> Self {
        Self {
            address: address.into(),
            fee,
            sqrt_price_x96,
            current_tick,
        }
    }

    /// Builds a snapshot from `slot0()`; only price and tick are consumed.
    pub fn from_slot0(address: impl Into<String>, fee: u32, slot0: &Slot0) -> Self {
        Self::new(address, fee, slot0.sqrt_price_x96, slot0.tick)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        is_zero_address(&self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_zero_address() {
        assert!(is_zero_address(ZERO_ADDRESS));
        assert!(is_zero_address("0X0000000000000000000000000000000000000000"));
        assert!(is_zero_address("0000"));
        assert!(!is_zero_address("0xC6962004f452bE9203591991D15f6b388e09E8D0"));
        assert!(!is_zero_address(""));
        assert!(!is_zero_address("0x"));
    }

    #[test]
    fn test_from_slot0_consumes_price_and_tick() {
        let slot0 = Slot0 {
            sqrt_price_x96: U256::one() << 96,
            tick: 0,
            observation_index: 7,
            observation_cardinality: 100,
            observation_cardinality_next: 100,
            fee_protocol: 0,
            unlocked: true,
        };
        let pool = Pool::from_slot0("0xpool", 500, &slot0);
        assert_eq!(pool.sqrt_price_x96, U256::one() << 96);
        assert_eq!(pool.current_tick, 0);
        assert_eq!(pool.fee, 500);
        assert!(!pool.is_null());
    }

    #[test]
    fn test_slot0_optional_fields_default() {
        let slot0: Slot0 =
            serde_json::from_str(r#"{"sqrt_price_x96":"79228162514264337593543950336","tick":0}"#)
                .unwrap();
        assert_eq!(slot0.tick, 0);
        assert!(!slot0.unlocked);
    }
}
