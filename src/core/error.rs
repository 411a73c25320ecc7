//! Error types for kitchen operations.
//!
//! Stock shortages and a full order queue are not errors: they are normal
//! backpressure and show up as [`Claim::Held`](crate::core::Claim::Held) or a
//! blocked producer. Everything here is either operator input that was
//! rejected without touching shared state, or an operation attempted after
//! shutdown began.

use thiserror::Error;

use crate::core::order::{IngredientId, WorkerId};

/// Errors produced by kitchen components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KitchenError {
    /// Worker id outside `0..workers`.
    #[error("invalid worker id {id}: kitchen has {workers} preparation lines")]
    InvalidWorkerId {
        /// Rejected id.
        id: WorkerId,
        /// Number of configured workers.
        workers: usize,
    },
    /// Ingredient id outside `0..ingredients`.
    #[error("invalid ingredient id {id}: inventory has {ingredients} ingredient types")]
    InvalidIngredientId {
        /// Rejected id.
        id: IngredientId,
        /// Number of configured ingredient types.
        ingredients: usize,
    },
    /// Quantity that is not strictly positive or would overflow a counter.
    #[error("invalid quantity {0}: must be positive")]
    InvalidQuantity(i64),
    /// The kitchen is shutting down and no longer accepts mutations.
    #[error("shutdown in progress")]
    ShutdownInProgress,
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Operator command could not be parsed.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
