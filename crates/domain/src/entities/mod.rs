pub mod pool;
pub mod position;
pub mod token;

// Re-export for easier access
pub use pool::{Pool, Slot0, ZERO_ADDRESS, is_zero_address};
pub use position::{Position, RawPosition, TokenId};
pub use token::{TokenInfo, resolve_token_info, strip_wrapped_prefix};
