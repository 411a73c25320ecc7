//! The synchronization engine: inventory, order queue, preparation lines and
//! the control plane that mutates them from outside a line's own loop.

pub mod controller;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod journal;
pub mod order;
pub mod order_queue;
pub mod snapshot;
pub mod system;
pub mod worker;

pub use controller::Controller;
pub use error::{AppResult, KitchenError};
pub use executor::{PrepExecutor, SimulatedPrep};
pub use inventory::{IngredientResource, IngredientSnapshot, InventoryStore};
pub use journal::{EventAction, EventSink, InMemoryEventSink, KitchenEvent};
pub use order::{IngredientId, Order, OrderId, WorkerId};
pub use order_queue::{Claim, OrderQueue, SchedulingPolicy};
pub use snapshot::{KitchenSnapshot, QueueSnapshot, WorkerSnapshot};
pub use system::SystemState;
pub use worker::{spawn_line, PrepLine, WorkerRecord, WorkerState};
