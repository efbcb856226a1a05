//! Terminal tables.

use bigdecimal::BigDecimal;
use lp_report_domain::enums::RangeStatus;
use lp_report_domain::metrics::{PortfolioSummary, PriceBook, UsdValuation};
use lp_report_domain::valuation::{PositionValuation, ValuationOutcome};
use lp_report_domain::value_objects::amount::to_decimal;
use prettytable::{Table, row};
use rust_decimal::Decimal;

fn usd(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("${v:.2}"))
}

/// Six decimal places; amounts too large for `Decimal` print exactly.
fn amount(value: &BigDecimal) -> String {
    to_decimal(value).map_or_else(|| value.round(6).to_string(), |d| format!("{d:.6}"))
}

/// "N/A" for closed positions, the range label otherwise.
fn price_status(valuation: &PositionValuation) -> String {
    match valuation.range_status() {
        RangeStatus::Closed => "N/A".to_string(),
        status => status.to_string(),
    }
}

/// One row per valued position.
pub fn positions_table<'a>(valuations: impl IntoIterator<Item = &'a PositionValuation>, prices: &PriceBook) -> Table {
    let mut table = Table::new();
    table.set_titles(row![
        "ID",
        "Tokens",
        "Token0",
        "Token1",
        "Token0 USD",
        "Token1 USD",
        "Total USD",
        "Fees USD",
        "Status",
        "Price Status",
        "Fee Tier",
        "Range"
    ]);

    for v in valuations {
        let value = UsdValuation::compute(v, prices).ok();
        let range = v
            .price_range
            .as_ref()
            .map_or_else(|| "-".to_string(), |r| r.price_range_text.clone());
        table.add_row(row![
            v.token_id,
            format!("{} - {}", v.token0.symbol, v.token1.symbol),
            amount(&v.token0.amount),
            amount(&v.token1.amount),
            usd(value.as_ref().and_then(|u| u.token0_usd)),
            usd(value.as_ref().and_then(|u| u.token1_usd)),
            usd(value.as_ref().map(|u| u.total_usd)),
            usd(value.as_ref().map(|u| u.uncollected_fees_usd)),
            v.position.status,
            price_status(v),
            format!("{}%", v.pool.fee.0),
            range
        ]);
    }
    table
}

/// Token id and message for each failed position.
pub fn errors_table(outcomes: &[ValuationOutcome]) -> Option<Table> {
    let mut table = Table::new();
    table.set_titles(row!["ID", "Error"]);
    for outcome in outcomes {
        if let Some(error) = outcome.error() {
            table.add_row(row![outcome.token_id(), error]);
        }
    }
    (!table.is_empty()).then_some(table)
}

pub fn summary_text(summary: &PortfolioSummary) -> String {
    let mut lines = vec![
        format!("Positions:       {}", summary.total_positions),
        format!("Active:          {}", summary.active_positions),
        format!("In range:        {}", summary.in_range_positions),
        format!("Errors:          {}", summary.errors),
        format!("Total value:     ${:.2}", summary.total_usd),
        format!("Uncollected fees:${:.2}", summary.uncollected_fees_usd),
    ];
    if summary.unknown_metadata > 0 {
        lines.push(format!("Unknown metadata:{}", summary.unknown_metadata));
    }
    if !summary.missing_prices.is_empty() {
        lines.push(format!("Missing prices:  {}", summary.missing_prices.join(", ")));
    }
    lines.join("\n")
}
