use crate::error::ValuationError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Sentinel used for symbol and name when metadata cannot be read.
pub const UNKNOWN: &str = "Unknown";

/// Decimals assumed when the `decimals()` call fails.
pub const FALLBACK_DECIMALS: u8 = 18;

/// Wrapped natives and the asset they wrap.
const WRAPPED_NATIVES: &[(&str, &str)] = &[
    ("WETH", "ETH"),
    ("WBTC", "BTC"),
    ("WMATIC", "MATIC"),
    ("WPOL", "POL"),
    ("WAVAX", "AVAX"),
    ("WBNB", "BNB"),
    ("WSOL", "SOL"),
    ("WFTM", "FTM"),
];

/// ERC-20 metadata for one token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(
        address: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            name: name.into(),
            decimals,
        }
    }

    /// Degraded metadata returned when any of the three ERC-20 calls fails.
    pub fn unknown(address: impl Into<String>) -> Self {
        Self::new(address, UNKNOWN, UNKNOWN, FALLBACK_DECIMALS)
    }

    /// True when this record carries the fallback sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.symbol == UNKNOWN && self.name == UNKNOWN
    }
}

/// Applies the metadata fallback policy to a lookup result.
///
/// A failed lookup degrades to [`TokenInfo::unknown`] so that amount math can
/// still proceed with 18 decimals. The failure comes back as
/// [`ValuationError::MetadataUnavailable`] for the caller to report.
pub fn resolve_token_info<E: Display>(
    address: &str,
    lookup: Result<TokenInfo, E>,
) -> (TokenInfo, Option<ValuationError>) {
    match lookup {
        Ok(info) => (info, None),
        Err(err) => (
            TokenInfo::unknown(address),
            Some(ValuationError::MetadataUnavailable {
                address: address.to_string(),
                reason: format!("{err:#}"),
            }),
        ),
    }
}

/// Maps a wrapped native symbol to the asset it wraps.
///
/// `WETH` becomes `ETH`, `wbtc` becomes `BTC`. Anything that is not a known
/// wrapped native is returned untouched, so `WOO` stays `WOO`.
pub fn strip_wrapped_prefix(symbol: &str) -> &str {
    WRAPPED_NATIVES
        .iter()
        .find(|(wrapped, _)| wrapped.eq_ignore_ascii_case(symbol))
        .map(|(_, base)| *base)
        .unwrap_or(symbol)
}
