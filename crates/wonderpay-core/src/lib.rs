pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "capital")]
pub mod capital;

pub use error::WonderPayError;
pub use types::*;

/// Standard result type for all WonderPay calculations
pub type WonderPayResult<T> = Result<T, WonderPayError>;
