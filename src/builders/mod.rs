//! Builders to construct kitchen components from configuration.

pub mod kitchen_builder;

pub use kitchen_builder::{build_executor, build_generator, build_system};
