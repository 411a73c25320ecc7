//! Operator-facing control operations.
//!
//! Every operation validates its input before touching shared state and
//! reports the outcome synchronously. Nothing here blocks.

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::error::KitchenError;
use crate::core::journal::{EventAction, KitchenEvent};
use crate::core::order::{IngredientId, WorkerId};
use crate::core::system::SystemState;

/// Handle through which an operator surface mutates the kitchen.
#[derive(Clone)]
pub struct Controller {
    system: Arc<SystemState>,
}

impl Controller {
    /// Controller over `system`.
    #[must_use]
    pub const fn new(system: Arc<SystemState>) -> Self {
        Self { system }
    }

    /// Shared state this controller acts on.
    #[must_use]
    pub const fn system(&self) -> &Arc<SystemState> {
        &self.system
    }

    fn ensure_running(&self) -> Result<(), KitchenError> {
        if self.system.is_running() {
            Ok(())
        } else {
            Err(KitchenError::ShutdownInProgress)
        }
    }

    /// Suspend line `worker`. It finishes an order already in preparation and
    /// then parks until resumed. Pausing a paused line is a no-op.
    ///
    /// # Errors
    ///
    /// - `KitchenError::ShutdownInProgress` after shutdown
    /// - `KitchenError::InvalidWorkerId` for an out-of-range id
    pub fn pause(&self, worker: WorkerId) -> Result<(), KitchenError> {
        self.ensure_running()?;
        let record = self.system.worker(worker).inspect_err(|e| {
            warn!(worker_id = worker, error = %e, "pause rejected");
        })?;
        if record.request_pause() {
            info!(worker_id = worker, "line paused");
            self.system
                .record(KitchenEvent::new(EventAction::Paused).with_worker(worker));
        }
        Ok(())
    }

    /// Let a paused line continue; it returns to `Idle`. Resuming a line that
    /// is not paused is a no-op.
    ///
    /// # Errors
    ///
    /// - `KitchenError::ShutdownInProgress` after shutdown
    /// - `KitchenError::InvalidWorkerId` for an out-of-range id
    pub fn resume(&self, worker: WorkerId) -> Result<(), KitchenError> {
        self.ensure_running()?;
        let record = self.system.worker(worker).inspect_err(|e| {
            warn!(worker_id = worker, error = %e, "resume rejected");
        })?;
        if record.request_resume() {
            self.system.notify_control();
            info!(worker_id = worker, "line resumed");
            self.system
                .record(KitchenEvent::new(EventAction::Resumed).with_worker(worker));
        }
        Ok(())
    }

    /// Add `delta` units of `ingredient` and give every line a chance to
    /// retry its held order. Returns the new stock level.
    ///
    /// # Errors
    ///
    /// - `KitchenError::ShutdownInProgress` after shutdown
    /// - `KitchenError::InvalidIngredientId` for an out-of-range id
    /// - `KitchenError::InvalidQuantity` unless `delta` is positive and fits a counter
    pub fn adjust_inventory(&self, ingredient: IngredientId, delta: i64) -> Result<u32, KitchenError> {
        self.ensure_running()?;
        let result = self.validate_adjust(ingredient, delta).and_then(|qty| {
            self.system.replenish(ingredient, qty)
        });
        if let Err(e) = &result {
            warn!(ingredient_id = ingredient, delta, error = %e, "inventory adjustment rejected");
        }
        result.map_err(|e| match e {
            KitchenError::InvalidQuantity(_) => KitchenError::InvalidQuantity(delta),
            other => other,
        })
    }

    fn validate_adjust(&self, ingredient: IngredientId, delta: i64) -> Result<u32, KitchenError> {
        self.system.inventory().validate_id(ingredient)?;
        if delta <= 0 {
            return Err(KitchenError::InvalidQuantity(delta));
        }
        u32::try_from(delta).map_err(|_| KitchenError::InvalidQuantity(delta))
    }

    /// Begin shutdown.
    pub fn request_shutdown(&self) {
        self.system.request_shutdown();
    }
}
