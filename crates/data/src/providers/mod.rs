//! Adapters behind the collaborator traits.

mod coinmetrics;
mod snapshot;
mod static_prices;

pub use coinmetrics::{CoinMetricsOracle, DEFAULT_API_URL, parse_reference_rates};
pub use snapshot::{PoolEntry, PositionEntry, Snapshot, SnapshotChainReader};
pub use static_prices::{StaticPriceOracle, WithOverrides};
