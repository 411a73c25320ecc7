//! Activity journal for kitchen events.
//!
//! Every state change worth showing an operator is logged through `tracing`;
//! when a sink is attached it is also recorded here, which lets tests assert on
//! the order in which things happened.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::order::{IngredientId, OrderId, WorkerId};
use crate::util::clock::now_ms;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// An order entered the queue.
    Enqueued,
    /// A line allocated ingredients for an order and took it off the queue.
    Served,
    /// A line finished preparing an order.
    Completed,
    /// A line could not allocate ingredients for the head order.
    Blocked,
    /// Stock was added to an ingredient.
    Replenished,
    /// A line was paused by the operator.
    Paused,
    /// A line was resumed by the operator.
    Resumed,
    /// Shutdown was requested.
    Shutdown,
}

/// A single journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenEvent {
    /// Event identifier.
    pub event_id: String,
    /// Action taken.
    pub action: EventAction,
    /// Related order, if any.
    pub order_id: Option<OrderId>,
    /// Related preparation line, if any.
    pub worker_id: Option<WorkerId>,
    /// Related ingredient, if any.
    pub ingredient_id: Option<IngredientId>,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

impl KitchenEvent {
    /// Build an event stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(action: EventAction) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            action,
            order_id: None,
            worker_id: None,
            ingredient_id: None,
            created_at_ms: now_ms(),
        }
    }

    /// Attach an order id.
    #[must_use]
    pub fn with_order(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Attach a worker id.
    #[must_use]
    pub fn with_worker(mut self, worker_id: WorkerId) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Attach an ingredient id.
    #[must_use]
    pub fn with_ingredient(mut self, ingredient_id: IngredientId) -> Self {
        self.ingredient_id = Some(ingredient_id);
        self
    }
}

/// Journal sink abstraction.
pub trait EventSink: Send {
    /// Record an event.
    fn record(&mut self, event: KitchenEvent);
}

/// Bounded in-memory sink. Clones share the same buffer, so a caller can keep
/// one handle for reading while the kitchen owns another.
#[derive(Debug, Clone)]
pub struct InMemoryEventSink {
    events: Arc<Mutex<VecDeque<KitchenEvent>>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a sink that keeps the most recent `max_events` entries.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(4096)))),
            max_events,
        }
    }

    /// Snapshot of stored events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<KitchenEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Stored events with the given action, oldest first.
    #[must_use]
    pub fn events_with(&self, action: EventAction) -> Vec<KitchenEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.action == action)
            .cloned()
            .collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&mut self, event: KitchenEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}
