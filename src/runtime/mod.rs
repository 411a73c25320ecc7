//! Bootstrap, order production and the operator/display surface.

pub mod api;
pub mod kitchen;
pub mod producer;

pub use api::{ControlResponse, OperatorCommand};
pub use kitchen::{Kitchen, KitchenReport};
pub use producer::{OrderGenerator, Recipe, RecipeComponent};
