use crate::entities::strip_wrapped_prefix;
use crate::error::ValuationError;
use crate::valuation::PositionValuation;
use crate::value_objects::amount::to_decimal;
use bigdecimal::BigDecimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key a symbol is priced under: wrapped prefix removed, uppercased.
/// `WETH`, `weth` and `ETH` all share the key `ETH`.
pub fn price_key(symbol: &str) -> String {
    strip_wrapped_prefix(symbol.trim()).to_ascii_uppercase()
}

/// USD reference prices keyed by [`price_key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceBook {
    prices: BTreeMap<String, Decimal>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, usd: Decimal) {
        self.prices.insert(price_key(symbol), usd);
    }

    pub fn get(&self, symbol: &str) -> Option<Decimal> {
        self.prices.get(&price_key(symbol)).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.prices.contains_key(&price_key(symbol))
    }

    /// Adds every price from `other`, overwriting existing keys.
    pub fn merge(&mut self, other: PriceBook) {
        self.prices.extend(other.prices);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.prices.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: AsRef<str>> FromIterator<(S, Decimal)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        let mut book = Self::new();
        for (symbol, usd) in iter {
            book.insert(symbol.as_ref(), usd);
        }
        book
    }
}

/// USD view of one valued position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsdValuation {
    pub token0_usd: Option<Decimal>,
    pub token1_usd: Option<Decimal>,
    /// Sum of the priced token amounts. Uncollected fees are not included.
    pub total_usd: Decimal,
    pub uncollected_fees_usd: Decimal,
    /// Symbols with no USD price; their side counts as zero.
    pub missing_prices: Vec<String>,
}

impl UsdValuation {
    pub fn compute(valuation: &PositionValuation, prices: &PriceBook) -> Result<Self, ValuationError> {
        let mut missing_prices = Vec::new();
        let mut total_usd = Decimal::ZERO;
        let mut uncollected_fees_usd = Decimal::ZERO;
        let mut sides = [None, None];

        for (slot, token) in sides.iter_mut().zip([&valuation.token0, &valuation.token1]) {
            let Some(price) = prices.get(&token.symbol) else {
                if !missing_prices.contains(&token.symbol) {
                    missing_prices.push(token.symbol.clone());
                }
                continue;
            };
            let value = mul(narrow(&token.amount)?, price)?;
            total_usd = add(total_usd, value)?;
            uncollected_fees_usd = add(uncollected_fees_usd, mul(narrow(&token.uncollected_fees)?, price)?)?;
            *slot = Some(value);
        }

        let [token0_usd, token1_usd] = sides;
        Ok(Self {
            token0_usd,
            token1_usd,
            total_usd,
            uncollected_fees_usd,
            missing_prices,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.missing_prices.is_empty()
    }
}

/// Token amounts past `Decimal::MAX` have no USD figure.
fn narrow(amount: &BigDecimal) -> Result<Decimal, ValuationError> {
    to_decimal(amount).ok_or(ValuationError::Overflow("usd value"))
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal, ValuationError> {
    a.checked_mul(b).ok_or(ValuationError::Overflow("usd value"))
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal, ValuationError> {
    a.checked_add(b).ok_or(ValuationError::Overflow("usd value"))
}
