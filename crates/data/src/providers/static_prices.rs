use crate::PriceOracle;
use anyhow::Result;
use async_trait::async_trait;
use lp_report_domain::metrics::PriceBook;
use tracing::warn;

/// Fixed USD prices, e.g. from command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceOracle {
    book: PriceBook,
}

impl StaticPriceOracle {
    #[must_use]
    pub fn new(book: PriceBook) -> Self {
        Self { book }
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn usd_prices(&self, symbols: &[String]) -> Result<PriceBook> {
        Ok(symbols
            .iter()
            .filter_map(|s| self.book.get(s).map(|usd| (s.as_str(), usd)))
            .collect())
    }
}

/// Another oracle with fixed prices laid on top.
///
/// Overrides win over the inner oracle. If the inner oracle fails, the
/// overrides are still returned.
#[derive(Debug, Clone)]
pub struct WithOverrides<O> {
    inner: O,
    overrides: StaticPriceOracle,
}

impl<O: PriceOracle> WithOverrides<O> {
    #[must_use]
    pub fn new(inner: O, overrides: PriceBook) -> Self {
        Self {
            inner,
            overrides: StaticPriceOracle::new(overrides),
        }
    }
}

#[async_trait]
impl<O: PriceOracle> PriceOracle for WithOverrides<O> {
    async fn usd_prices(&self, symbols: &[String]) -> Result<PriceBook> {
        let mut book = match self.inner.usd_prices(symbols).await {
            Ok(book) => book,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "price source failed, using overrides only");
                PriceBook::new()
            }
        };
        book.merge(self.overrides.usd_prices(symbols).await?);
        Ok(book)
    }
}
