//! Validation-boundary errors (charter §7: the engine never sees an invalid order).

use thiserror::Error;

/// Rejected at construction; the engine itself never raises for expected flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("quantity must be positive")]
    NonPositiveQuantity,
    #[error("LIMIT order requires a price")]
    LimitRequiresPrice,
    #[error("MARKET order must not have a price")]
    MarketRequiresNoPrice,
    #[error("price must be positive")]
    NonPositivePrice,
}
