//! Configuration models for the kitchen.

pub mod kitchen;

pub use kitchen::{
    IngredientConfig, KitchenConfig, DEFAULT_QUEUE_CAPACITY, MAX_INGREDIENTS, MAX_WORKERS,
};
