use crate::enums::RangeStatus;
use crate::error::ValuationError;
use crate::metrics::usd::{PriceBook, UsdValuation};
use crate::valuation::{PositionValuation, ValuationOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline numbers across a batch of outcomes.
///
/// Failed outcomes are counted in `errors` and left out of every other figure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_positions: usize,
    pub active_positions: usize,
    pub in_range_positions: usize,
    pub errors: usize,
    pub unknown_metadata: usize,
    pub total_usd: Decimal,
    pub uncollected_fees_usd: Decimal,
    pub missing_prices: Vec<String>,
}

impl PortfolioSummary {
    pub fn from_outcomes(outcomes: &[ValuationOutcome], prices: &PriceBook) -> Result<Self, ValuationError> {
        let mut summary = Self {
            total_positions: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            let Some(valuation) = outcome.valuation() else {
                summary.errors += 1;
                continue;
            };
            if valuation.is_active() {
                summary.active_positions += 1;
            }
            if valuation.range_status() == RangeStatus::InRange {
                summary.in_range_positions += 1;
            }
            if valuation.has_unknown_metadata() {
                summary.unknown_metadata += 1;
            }

            let usd = UsdValuation::compute(valuation, prices)?;
            summary.total_usd = summary
                .total_usd
                .checked_add(usd.total_usd)
                .ok_or(ValuationError::Overflow("portfolio total"))?;
            summary.uncollected_fees_usd = summary
                .uncollected_fees_usd
                .checked_add(usd.uncollected_fees_usd)
                .ok_or(ValuationError::Overflow("portfolio total"))?;
            for symbol in usd.missing_prices {
                if !summary.missing_prices.contains(&symbol) {
                    summary.missing_prices.push(symbol);
                }
            }
        }

        Ok(summary)
    }
}

/// Successful valuations whose range status is [`RangeStatus::InRange`].
pub fn in_range_only(outcomes: &[ValuationOutcome]) -> impl Iterator<Item = &PositionValuation> {
    outcomes
        .iter()
        .filter_map(ValuationOutcome::valuation)
        .filter(|v| v.range_status() == RangeStatus::InRange)
}
