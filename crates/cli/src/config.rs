//! Runtime configuration from the environment (and `.env`).

use lp_report_data::providers::{CoinMetricsOracle, DEFAULT_API_URL};
use lp_report_domain::valuation::{DEFAULT_BASE_SYMBOLS, PositionValuator};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

pub const COINMETRICS_API_KEY: &str = "COINMETRICS_API_KEY";
pub const COINMETRICS_API_URL: &str = "COINMETRICS_API_URL";
pub const BASE_SYMBOLS: &str = "LP_REPORT_BASE_SYMBOLS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub coinmetrics_api_key: Option<String>,
    pub coinmetrics_api_url: String,
    /// Symbols quoted in the other token for display prices.
    pub base_symbols: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            coinmetrics_api_key: None,
            coinmetrics_api_url: DEFAULT_API_URL.to_string(),
            base_symbols: DEFAULT_BASE_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            coinmetrics_api_key: get(COINMETRICS_API_KEY),
            coinmetrics_api_url: get(COINMETRICS_API_URL).unwrap_or(defaults.coinmetrics_api_url),
            base_symbols: get(BASE_SYMBOLS)
                .map(|v| split_symbols(&v))
                .unwrap_or(defaults.base_symbols),
        }
    }

    /// Replaces the base symbols when a command-line list is given.
    pub fn with_base_symbols(mut self, symbols: Option<&str>) -> Self {
        if let Some(list) = symbols {
            self.base_symbols = split_symbols(list);
        }
        self
    }

    pub fn valuator(&self) -> PositionValuator {
        PositionValuator::with_base_symbols(&self.base_symbols)
    }

    pub fn coinmetrics(&self) -> CoinMetricsOracle {
        CoinMetricsOracle::with_base_url(&self.coinmetrics_api_url, self.coinmetrics_api_key.clone())
    }
}

fn split_symbols(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses a `SYMBOL=USD` price override, e.g. `ETH=2000.5`.
pub fn parse_price_override(arg: &str) -> Result<(String, Decimal), String> {
    let (symbol, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=PRICE, got {arg:?}"))?;
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(format!("missing symbol in {arg:?}"));
    }
    let price = Decimal::from_str(value.trim()).map_err(|e| format!("invalid price in {arg:?}: {e}"))?;
    if price.is_sign_negative() {
        return Err(format!("negative price in {arg:?}"));
    }
    Ok((symbol.to_string(), price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ReportConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.coinmetrics_api_url, "https://api.coinmetrics.io/v4");
        assert_eq!(config.base_symbols, vec!["WETH", "ETH", "WBTC", "BTC"]);
    }

    #[test]
    fn test_env_values() {
        let config = ReportConfig::from_lookup(lookup(&[
            (COINMETRICS_API_KEY, "secret"),
            (COINMETRICS_API_URL, "https://community-api.coinmetrics.io/v4"),
            (BASE_SYMBOLS, "weth, wmatic ,,"),
        ]));
        assert_eq!(config.coinmetrics_api_key.as_deref(), Some("secret"));
        assert_eq!(config.coinmetrics_api_url, "https://community-api.coinmetrics.io/v4");
        assert_eq!(config.base_symbols, vec!["WETH", "WMATIC"]);

        let config = config.with_base_symbols(Some("btc"));
        assert_eq!(config.base_symbols, vec!["BTC"]);
        assert_eq!(config.valuator().base_symbols(), ["BTC".to_string()]);
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = ReportConfig::from_lookup(lookup(&[(COINMETRICS_API_KEY, "  ")]));
        assert!(config.coinmetrics_api_key.is_none());
    }

    #[test]
    fn test_price_override() {
        assert_eq!(parse_price_override("ETH=2000.5"), Ok(("ETH".to_string(), dec!(2000.5))));
        assert_eq!(parse_price_override(" usdc = 1 "), Ok(("usdc".to_string(), dec!(1))));
        assert!(parse_price_override("ETH").is_err());
        assert!(parse_price_override("=5").is_err());
        assert!(parse_price_override("ETH=abc").is_err());
        assert!(parse_price_override("ETH=-1").is_err());
    }
}
