//! USD reference rates from the CoinMetrics asset-metrics endpoint.

use crate::PriceOracle;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lp_report_domain::metrics::{PriceBook, price_key};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Default API root.
pub const DEFAULT_API_URL: &str = "https://api.coinmetrics.io/v4";

const METRIC: &str = "ReferenceRateUSD";

#[derive(Debug, Deserialize)]
struct AssetMetricsResponse {
    #[serde(default)]
    data: Vec<AssetMetricRow>,
}

#[derive(Debug, Deserialize)]
struct AssetMetricRow {
    asset: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(rename = "ReferenceRateUSD", default)]
    reference_rate_usd: Option<String>,
}

/// Parses an asset-metrics response body into a [`PriceBook`].
///
/// Rows without a rate are skipped. When an asset appears more than once the
/// row with the latest `time` wins.
///
/// # Errors
/// Returns an error if the body is not an asset-metrics JSON document or a
/// rate is not a number.
pub fn parse_reference_rates(body: &str) -> Result<PriceBook> {
    let response: AssetMetricsResponse =
        serde_json::from_str(body).context("parsing CoinMetrics response")?;

    let mut latest: BTreeMap<String, (Option<DateTime<Utc>>, Decimal)> = BTreeMap::new();
    for row in response.data {
        let Some(raw) = row.reference_rate_usd else {
            continue;
        };
        let rate = Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|e| anyhow!("invalid {METRIC} {raw:?} for {}: {e}", row.asset))?;
        let time = row
            .time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));

        let key = price_key(&row.asset);
        match latest.get(&key) {
            Some((Some(seen), _)) if time.is_none_or(|t| t < *seen) => {}
            _ => {
                latest.insert(key, (time, rate));
            }
        }
    }

    Ok(latest.into_iter().map(|(asset, (_, rate))| (asset, rate)).collect())
}

/// [`PriceOracle`] backed by CoinMetrics `ReferenceRateUSD`.
#[derive(Debug, Clone)]
pub struct CoinMetricsOracle {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinMetricsOracle {
    /// Creates an oracle against [`DEFAULT_API_URL`].
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, api_key)
    }

    /// Creates an oracle against a custom API root.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/timeseries/asset-metrics", self.base_url)
    }
}

/// Lowercase CoinMetrics asset ids for `symbols`, deduplicated.
fn asset_ids(symbols: &[String]) -> Vec<String> {
    let mut assets: Vec<String> = symbols
        .iter()
        .map(|s| price_key(s).to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    assets.sort();
    assets.dedup();
    assets
}

#[async_trait]
impl PriceOracle for CoinMetricsOracle {
    async fn usd_prices(&self, symbols: &[String]) -> Result<PriceBook> {
        let assets = asset_ids(symbols);
        if assets.is_empty() {
            return Ok(PriceBook::new());
        }
        let assets = assets.join(",");
        debug!(assets = %assets, metric = METRIC, "requesting reference rates");

        let mut query = vec![
            ("assets", assets.clone()),
            ("metrics", METRIC.to_string()),
            ("frequency", "1d".to_string()),
            ("limit_per_asset", "1".to_string()),
            ("paging_from", "end".to_string()),
            ("ignore_unsupported_errors", "true".to_string()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.clone()));
        }

        let response = self
            .client
            .get(self.endpoint())
            .query(&query)
            .send()
            .await
            .context("requesting CoinMetrics reference rates")?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, assets = %assets, "CoinMetrics request failed");
            return Err(anyhow!("CoinMetrics request failed with status {status}"));
        }
        let body = response.text().await.context("reading CoinMetrics response")?;

        let book = parse_reference_rates(&body)?;
        info!(requested = %assets, priced = book.len(), "fetched reference rates");
        Ok(book)
    }
}
