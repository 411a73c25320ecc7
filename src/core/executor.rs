//! The work a preparation line performs once it holds an order's ingredients.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::order::{Order, WorkerId};

/// Abstraction for preparing an order whose ingredients are already allocated.
///
/// Each preparation line runs on its own OS thread with a single-threaded
/// tokio runtime and drives `prepare` to completion there, so an
/// implementation may freely await timers or I/O without blocking other lines.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prep_lines::core::{Order, PrepExecutor, WorkerId};
///
/// #[derive(Clone)]
/// struct Grill;
///
/// #[async_trait]
/// impl PrepExecutor for Grill {
///     async fn prepare(&self, order: &Order, line: WorkerId) {
///         tracing::info!(order_id = order.id, line, "grilling");
///     }
/// }
/// ```
#[async_trait]
pub trait PrepExecutor: Send + Sync + Clone + 'static {
    /// Prepare `order` on line `line`. Must finish in bounded time; shutdown
    /// waits for in-flight preparations.
    async fn prepare(&self, order: &Order, line: WorkerId);
}

/// Simulated preparation that just takes a fixed amount of time.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedPrep {
    duration: Duration,
}

impl SimulatedPrep {
    /// Preparation taking `duration` per order.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Configured duration per order.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

#[async_trait]
impl PrepExecutor for SimulatedPrep {
    async fn prepare(&self, order: &Order, line: WorkerId) {
        tracing::debug!(
            worker_id = line,
            order_id = order.id,
            items = order.needed().count(),
            "simulating preparation"
        );
        if !self.duration.is_zero() {
            tokio::time::sleep(self.duration).await;
        }
    }
}
