//! Read-only view of the kitchen for display surfaces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::inventory::IngredientSnapshot;
use crate::core::order::{OrderId, WorkerId};
use crate::core::worker::WorkerState;

/// One preparation line as seen by the display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    /// Line id.
    pub id: WorkerId,
    /// State at the time of the snapshot.
    pub state: WorkerState,
    /// Orders completed.
    pub processed: u64,
    /// Last order served or blocked on.
    pub current_order_id: Option<OrderId>,
    /// Failed allocation attempts.
    pub blocked_retries: u64,
}

/// Queue occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Orders waiting.
    pub len: usize,
    /// Fixed capacity.
    pub capacity: usize,
}

/// Whole-kitchen view. Parts are read one lock at a time, so the snapshot is
/// not a single atomic cut across components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenSnapshot {
    /// Whether the kitchen is still running.
    pub running: bool,
    /// Every preparation line.
    pub workers: Vec<WorkerSnapshot>,
    /// Order queue occupancy.
    pub queue: QueueSnapshot,
    /// Stock per ingredient.
    pub inventory: Vec<IngredientSnapshot>,
}

impl KitchenSnapshot {
    /// Total orders completed across all lines.
    #[must_use]
    pub fn total_processed(&self) -> u64 {
        self.workers.iter().map(|w| w.processed).sum()
    }
}

impl fmt::Display for KitchenSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Line | State          | Order  | Processed")?;
        writeln!(f, "-----+----------------+--------+----------")?;
        for w in &self.workers {
            let order = w
                .current_order_id
                .map_or_else(|| "-".to_string(), |id| format!("#{id}"));
            writeln!(
                f,
                "{:>4} | {:<14} | {:<6} | {}",
                w.id,
                w.state.label(),
                order,
                w.processed
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Order queue: {}/{}", self.queue.len, self.queue.capacity)?;
        writeln!(f, "Inventory:")?;
        for item in &self.inventory {
            writeln!(f, "  [{}] {:<10} {}", item.id, item.name, item.count)?;
        }
        Ok(())
    }
}
