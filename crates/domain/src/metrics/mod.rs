//! USD figures derived from valued positions. Downstream of the core math:
//! prices come from the caller, nothing here feeds back into amounts.

pub mod portfolio;
pub mod usd;

pub use portfolio::{PortfolioSummary, in_range_only};
pub use usd::{PriceBook, UsdValuation, price_key};
