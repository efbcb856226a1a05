use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// NFT id of a position in the position manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub U256);

impl From<u64> for TokenId {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TokenId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::serde_u256::parse_u256(s).map(Self)
    }
}

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::serde_u256::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        crate::serde_u256::deserialize(deserializer).map(Self)
    }
}

/// Twelve-field output of `NonfungiblePositionManager.positions(tokenId)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPosition {
    #[serde(default)]
    pub nonce: u128,
    #[serde(default)]
    pub operator: String,
    pub token0: String,
    pub token1: String,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    #[serde(default, with = "crate::serde_u256")]
    pub fee_growth_inside0_last_x128: U256,
    #[serde(default, with = "crate::serde_u256")]
    pub fee_growth_inside1_last_x128: U256,
    #[serde(default)]
    pub tokens_owed0: u128,
    #[serde(default)]
    pub tokens_owed1: u128,
}

/// Immutable snapshot of a concentrated-liquidity position.
///
/// `tokens_owed0/1` are uncollected fees in raw token units. A position with
/// zero liquidity is closed whatever its tick range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub token_id: TokenId,
    pub token0: String,
    pub token1: String,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
}

impl Position {
    /// Keeps token0, token1, fee, ticks, liquidity and owed amounts; nonce,
    /// operator and fee-growth checkpoints are dropped.
    pub fn from_raw(token_id: TokenId, raw: &RawPosition) -> Self {
        Self {
            token_id,
            token0: raw.token0.clone(),
            token1: raw.token1.clone(),
            fee: raw.fee,
            tick_lower: raw.tick_lower,
            tick_upper: raw.tick_upper,
            liquidity: raw.liquidity,
            tokens_owed0: raw.tokens_owed0,
            tokens_owed1: raw.tokens_owed1,
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.liquidity == 0
    }
}
