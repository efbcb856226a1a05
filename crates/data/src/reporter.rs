//! Fetch-then-value orchestration over the collaborator traits.

use crate::{ChainReader, PriceOracle, TokenMetadataProvider};
use anyhow::{Context, Result};
use lp_report_domain::entities::{Pool, Position, TokenId, TokenInfo, is_zero_address, resolve_token_info};
use lp_report_domain::metrics::{PortfolioSummary, PriceBook};
use lp_report_domain::valuation::{PositionValuation, PositionValuator, ValuationOutcome};
use primitive_types::U256;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Token metadata already resolved in the current batch, keyed by lowercase address.
type MetadataCache = HashMap<String, TokenInfo>;

/// Outcomes of a batch together with the prices used to summarise them.
#[derive(Debug, Clone)]
pub struct PositionReport {
    pub outcomes: Vec<ValuationOutcome>,
    pub prices: PriceBook,
    pub summary: PortfolioSummary,
}

/// Reads chain state for each position and runs it through a [`PositionValuator`].
///
/// Positions are isolated: a failing read or valuation becomes a
/// [`ValuationOutcome::Failed`] record and the batch carries on.
pub struct PositionReporter<C, M> {
    chain: C,
    metadata: M,
    valuator: PositionValuator,
}

impl<C, M> PositionReporter<C, M>
where
    C: ChainReader,
    M: TokenMetadataProvider,
{
    pub fn new(chain: C, metadata: M) -> Self {
        Self::with_valuator(chain, metadata, PositionValuator::default())
    }

    pub fn with_valuator(chain: C, metadata: M, valuator: PositionValuator) -> Self {
        Self {
            chain,
            metadata,
            valuator,
        }
    }

    /// Values each id in order.
    pub async fn value_positions(&self, token_ids: &[TokenId]) -> Vec<ValuationOutcome> {
        let mut cache = MetadataCache::new();
        let mut outcomes = Vec::with_capacity(token_ids.len());

        for &token_id in token_ids {
            let outcome = match self.value_one(token_id, &mut cache).await {
                Ok(valuation) => ValuationOutcome::Valued(Box::new(valuation)),
                Err(err) => {
                    let message = format!("{err:#}");
                    warn!(token_id = %token_id, error = %message, "position valuation failed");
                    ValuationOutcome::failed(token_id, message)
                }
            };
            outcomes.push(outcome);
        }

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        info!(positions = outcomes.len(), failed, "valuation batch complete");
        outcomes
    }

    /// Values every position held by `owner`.
    ///
    /// # Errors
    /// Returns an error only if the owner's position ids cannot be listed.
    pub async fn value_owner(&self, owner: &str) -> Result<Vec<ValuationOutcome>> {
        let token_ids = self
            .chain
            .token_ids_of(owner)
            .await
            .with_context(|| format!("listing positions of {owner}"))?;
        debug!(owner, positions = token_ids.len(), "resolved owner positions");
        Ok(self.value_positions(&token_ids).await)
    }

    /// Values `token_ids`, prices the tokens involved and summarises the batch.
    ///
    /// A failing oracle leaves the book empty; every USD figure then counts
    /// as missing instead of failing the report.
    ///
    /// # Errors
    /// Returns an error if the USD totals overflow.
    pub async fn report(&self, token_ids: &[TokenId], oracle: &dyn PriceOracle) -> Result<PositionReport> {
        let outcomes = self.value_positions(token_ids).await;
        let symbols = priced_symbols(&outcomes);
        let prices = match oracle.usd_prices(&symbols).await {
            Ok(book) => book,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "price lookup failed, USD values unavailable");
                PriceBook::new()
            }
        };
        let summary = PortfolioSummary::from_outcomes(&outcomes, &prices)?;
        Ok(PositionReport {
            outcomes,
            prices,
            summary,
        })
    }

    async fn value_one(&self, token_id: TokenId, cache: &mut MetadataCache) -> Result<PositionValuation> {
        let raw = self
            .chain
            .position(token_id)
            .await
            .with_context(|| format!("Error calculating position details for token ID {token_id}"))?;
        let position = Position::from_raw(token_id, &raw);

        let token0 = self.token_info(&position.token0, cache).await;
        let token1 = self.token_info(&position.token1, cache).await;

        let pool_address = self
            .chain
            .pool_address(&position.token0, &position.token1, position.fee)
            .await
            .context("resolving pool address")?;
        let pool = if is_zero_address(&pool_address) {
            // The valuator turns the null pool into a PoolNotFound error.
            Pool::new(pool_address, position.fee, U256::zero(), 0)
        } else {
            let slot0 = self
                .chain
                .slot0(&pool_address)
                .await
                .with_context(|| format!("reading slot0 of {pool_address}"))?;
            Pool::from_slot0(pool_address, position.fee, &slot0)
        };

        Ok(self.valuator.valuate(&position, &pool, &token0, &token1)?)
    }

    async fn token_info(&self, address: &str, cache: &mut MetadataCache) -> TokenInfo {
        let key = address.to_ascii_lowercase();
        if let Some(info) = cache.get(&key) {
            return info.clone();
        }
        let (info, degraded) = resolve_token_info(address, self.metadata.token_info(address).await);
        if let Some(err) = degraded {
            warn!(error = %err, "using fallback token metadata");
        }
        cache.insert(key, info.clone());
        info
    }
}

/// Distinct symbols of valued positions worth pricing, `Unknown` excluded.
pub fn priced_symbols(outcomes: &[ValuationOutcome]) -> Vec<String> {
    let mut symbols: Vec<String> = outcomes
        .iter()
        .filter_map(ValuationOutcome::valuation)
        .flat_map(|v| [&v.token0, &v.token1])
        .filter(|t| !t.is_unknown())
        .map(|t| t.symbol.clone())
        .collect();
    symbols.sort();
    symbols.dedup();
    symbols
}
