//! Chain state and token metadata from a JSON snapshot file.

use crate::{ChainReader, TokenMetadataProvider};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use lp_report_domain::entities::{RawPosition, Slot0, TokenId, TokenInfo, ZERO_ADDRESS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// A position as returned by `positions(tokenId)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionEntry {
    /// Position NFT id.
    pub token_id: TokenId,
    /// Raw twelve-field position tuple.
    pub position: RawPosition,
}

/// A deployed pool and its `slot0()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// Pool contract address.
    pub address: String,
    /// First token of the pair.
    pub token0: String,
    /// Second token of the pair.
    pub token1: String,
    /// Fee tier in hundredths of a basis point.
    pub fee: u32,
    /// Current pool slot.
    pub slot0: Slot0,
}

impl PoolEntry {
    fn matches(&self, token0: &str, token1: &str, fee: u32) -> bool {
        let same = |a: &str, b: &str| a.eq_ignore_ascii_case(b);
        self.fee == fee
            && ((same(&self.token0, token0) && same(&self.token1, token1))
                || (same(&self.token0, token1) && same(&self.token1, token0)))
    }
}

/// Everything a valuation run reads from chain, captured up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Owner address to the position ids it holds.
    #[serde(default)]
    pub owners: BTreeMap<String, Vec<TokenId>>,
    /// Position tuples by id.
    #[serde(default)]
    pub positions: Vec<PositionEntry>,
    /// Pools known to the factory.
    #[serde(default)]
    pub pools: Vec<PoolEntry>,
    /// Token metadata. Tokens absent here fail their metadata calls.
    #[serde(default)]
    pub tokens: Vec<TokenInfo>,
}

/// [`ChainReader`] and [`TokenMetadataProvider`] over a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotChainReader {
    snapshot: Snapshot,
}

impl SnapshotChainReader {
    /// Wraps an in-memory snapshot.
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Parses a snapshot from JSON text.
    ///
    /// # Errors
    /// Returns an error if the JSON does not match the snapshot layout.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json).context("parsing snapshot JSON")?;
        Ok(Self::new(snapshot))
    }

    /// Loads a snapshot file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        let reader = Self::from_json_str(&json)
            .with_context(|| format!("loading snapshot {}", path.display()))?;
        debug!(
            path = %path.display(),
            positions = reader.snapshot.positions.len(),
            pools = reader.snapshot.pools.len(),
            tokens = reader.snapshot.tokens.len(),
            "snapshot loaded"
        );
        Ok(reader)
    }

    /// The underlying snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Every position id in file order.
    #[must_use]
    pub fn token_ids(&self) -> Vec<TokenId> {
        self.snapshot.positions.iter().map(|p| p.token_id).collect()
    }

    fn token(&self, address: &str) -> Result<&TokenInfo> {
        self.snapshot
            .tokens
            .iter()
            .find(|t| t.address.eq_ignore_ascii_case(address))
            .ok_or_else(|| anyhow!("execution reverted: no token metadata for {address}"))
    }
}

#[async_trait]
impl ChainReader for SnapshotChainReader {
    async fn position(&self, token_id: TokenId) -> Result<RawPosition> {
        self.snapshot
            .positions
            .iter()
            .find(|p| p.token_id == token_id)
            .map(|p| p.position.clone())
            .ok_or_else(|| anyhow!("Invalid token ID {token_id}"))
    }

    async fn pool_address(&self, token0: &str, token1: &str, fee: u32) -> Result<String> {
        Ok(self
            .snapshot
            .pools
            .iter()
            .find(|p| p.matches(token0, token1, fee))
            .map_or_else(|| ZERO_ADDRESS.to_string(), |p| p.address.clone()))
    }

    async fn slot0(&self, pool_address: &str) -> Result<Slot0> {
        self.snapshot
            .pools
            .iter()
            .find(|p| p.address.eq_ignore_ascii_case(pool_address))
            .map(|p| p.slot0.clone())
            .ok_or_else(|| anyhow!("no pool at {pool_address}"))
    }

    async fn token_ids_of(&self, owner: &str) -> Result<Vec<TokenId>> {
        Ok(self
            .snapshot
            .owners
            .iter()
            .find(|(address, _)| address.eq_ignore_ascii_case(owner))
            .map(|(_, ids)| ids.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl TokenMetadataProvider for SnapshotChainReader {
    async fn name(&self, address: &str) -> Result<String> {
        Ok(self.token(address)?.name.clone())
    }

    async fn symbol(&self, address: &str) -> Result<String> {
        Ok(self.token(address)?.symbol.clone())
    }

    async fn decimals(&self, address: &str) -> Result<u8> {
        Ok(self.token(address)?.decimals)
    }
}
