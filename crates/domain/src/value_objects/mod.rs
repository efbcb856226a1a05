pub mod amount;
pub mod percentage;
pub mod price;
pub mod price_range;

pub use amount::Amount;
pub use percentage::Percentage;
pub use price::Price;
pub use price_range::PriceRange;
