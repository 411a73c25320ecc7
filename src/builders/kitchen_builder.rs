//! Builders to construct the shared kitchen state from configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::config::KitchenConfig;
use crate::core::{EventSink, InventoryStore, KitchenError, SimulatedPrep, SystemState};
use crate::runtime::OrderGenerator;

/// Build the shared state described by `cfg`.
///
/// Ingredient ids follow the order of `cfg.ingredients`. The journal, when
/// given, is attached as is; `cfg.journal_capacity` only sizes journals the
/// caller creates.
///
/// # Errors
///
/// Returns `KitchenError::InvalidConfig` if validation fails.
pub fn build_system(
    cfg: &KitchenConfig,
    journal: Option<Box<dyn EventSink>>,
) -> Result<SystemState, KitchenError> {
    cfg.validate().map_err(KitchenError::InvalidConfig)?;

    let inventory = InventoryStore::new(
        cfg.ingredients
            .iter()
            .map(|ingredient| (ingredient.name.clone(), ingredient.count)),
    );
    let state = SystemState::new(
        inventory,
        cfg.worker_count,
        cfg.queue_capacity,
        cfg.policy,
        Duration::from_millis(cfg.backoff_ms),
    );
    Ok(match journal {
        Some(sink) => state.with_journal(sink),
        None => state,
    })
}

/// Simulated preparation taking `cfg.prep_duration_ms` per order.
#[must_use]
pub const fn build_executor(cfg: &KitchenConfig) -> SimulatedPrep {
    SimulatedPrep::new(Duration::from_millis(cfg.prep_duration_ms))
}

/// Order generator using `cfg`'s arrival range and the default burger recipe.
#[must_use]
pub fn build_generator(cfg: &KitchenConfig, system: Arc<SystemState>) -> OrderGenerator {
    OrderGenerator::new(system).with_arrival(
        Duration::from_millis(cfg.arrival_min_ms),
        Duration::from_millis(cfg.arrival_max_ms),
    )
}
