//! Collaborators of the position valuator.
//!
//! This crate provides the I/O side of position reporting:
//! - Async seams for chain state, token metadata and USD prices
//! - A JSON snapshot adapter for chain state and metadata
//! - A CoinMetrics reference-rate price oracle
//! - The [`reporter::PositionReporter`] batch orchestrator

/// Chain, metadata and price adapters.
pub mod providers;
/// Batch orchestration.
pub mod reporter;

use anyhow::Result;
use async_trait::async_trait;
use lp_report_domain::entities::{RawPosition, Slot0, TokenId, TokenInfo};
use lp_report_domain::metrics::PriceBook;

pub use reporter::PositionReporter;

/// Read access to the position manager, factory and pools.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// `positions(tokenId)` on the position manager.
    async fn position(&self, token_id: TokenId) -> Result<RawPosition>;

    /// `getPool(token0, token1, fee)` on the factory. Returns the zero
    /// address when no pool exists.
    async fn pool_address(&self, token0: &str, token1: &str, fee: u32) -> Result<String>;

    /// `slot0()` on a pool.
    async fn slot0(&self, pool_address: &str) -> Result<Slot0>;

    /// Position NFTs held by `owner`.
    async fn token_ids_of(&self, owner: &str) -> Result<Vec<TokenId>>;
}

/// ERC-20 metadata, one call per field.
#[async_trait]
pub trait TokenMetadataProvider: Send + Sync {
    async fn name(&self, address: &str) -> Result<String>;

    async fn symbol(&self, address: &str) -> Result<String>;

    async fn decimals(&self, address: &str) -> Result<u8>;

    /// All three fields. Fails if any single call fails.
    async fn token_info(&self, address: &str) -> Result<TokenInfo> {
        let name = self.name(address).await?;
        let symbol = self.symbol(address).await?;
        let decimals = self.decimals(address).await?;
        Ok(TokenInfo::new(address, symbol, name, decimals))
    }
}

/// USD reference prices by symbol.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Prices for as many of `symbols` as the source knows. Unknown symbols
    /// are simply absent from the returned book.
    async fn usd_prices(&self, symbols: &[String]) -> Result<PriceBook>;
}
