//! The shared aggregate every producer, line and controller operates on.
//!
//! One `SystemState` is created at startup, shared behind an `Arc`, and dropped
//! only after every thread has observed `running == false` and exited. Each
//! independently mutable part carries its own lock: one per ingredient, one for
//! the queue ring, and one control lock that paused lines and timed backoffs
//! wait on.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info};

use crate::core::error::KitchenError;
use crate::core::inventory::InventoryStore;
use crate::core::journal::{EventAction, EventSink, KitchenEvent};
use crate::core::order::{IngredientId, Order, OrderId, WorkerId};
use crate::core::order_queue::{OrderQueue, SchedulingPolicy};
use crate::core::snapshot::{KitchenSnapshot, QueueSnapshot, WorkerSnapshot};
use crate::core::worker::WorkerRecord;

/// Shared kitchen state.
pub struct SystemState {
    running: AtomicBool,
    inventory: InventoryStore,
    workers: Vec<WorkerRecord>,
    queue: OrderQueue,
    policy: SchedulingPolicy,
    backoff: Duration,
    next_order_id: AtomicU64,
    control: Mutex<()>,
    control_signal: Condvar,
    journal: Option<Mutex<Box<dyn EventSink>>>,
}

impl SystemState {
    /// Create the aggregate with `worker_count` idle line records and an empty
    /// queue of `queue_capacity` slots.
    #[must_use]
    pub fn new(
        inventory: InventoryStore,
        worker_count: usize,
        queue_capacity: usize,
        policy: SchedulingPolicy,
        backoff: Duration,
    ) -> Self {
        Self {
            running: AtomicBool::new(true),
            inventory,
            workers: (0..worker_count).map(WorkerRecord::new).collect(),
            queue: OrderQueue::new(queue_capacity),
            policy,
            backoff,
            next_order_id: AtomicU64::new(1),
            control: Mutex::new(()),
            control_signal: Condvar::new(),
            journal: None,
        }
    }

    /// Attach a journal sink.
    #[must_use]
    pub fn with_journal(mut self, sink: Box<dyn EventSink>) -> Self {
        self.journal = Some(Mutex::new(sink));
        self
    }

    /// Whether shutdown has not been requested yet.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ingredient inventory.
    pub const fn inventory(&self) -> &InventoryStore {
        &self.inventory
    }

    /// Order queue.
    pub const fn queue(&self) -> &OrderQueue {
        &self.queue
    }

    /// All line records, indexed by line id.
    pub fn workers(&self) -> &[WorkerRecord] {
        &self.workers
    }

    /// Number of preparation lines.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Record for line `id`.
    ///
    /// # Errors
    ///
    /// Returns `KitchenError::InvalidWorkerId` for an out-of-range id.
    pub fn worker(&self, id: WorkerId) -> Result<&WorkerRecord, KitchenError> {
        self.workers.get(id).ok_or(KitchenError::InvalidWorkerId {
            id,
            workers: self.workers.len(),
        })
    }

    /// Queue service policy.
    pub const fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    /// Delay a line waits after failing to allocate the head order.
    pub const fn backoff(&self) -> Duration {
        self.backoff
    }

    fn new_order(
        &self,
        items: impl IntoIterator<Item = (IngredientId, u32)>,
    ) -> Result<Order, KitchenError> {
        if !self.is_running() {
            return Err(KitchenError::ShutdownInProgress);
        }
        let requested: BTreeMap<IngredientId, u32> = Order::new(0, items).requested;
        for &ingredient in requested.keys() {
            self.inventory.validate_id(ingredient)?;
        }
        let id = self.next_order_id.fetch_add(1, Ordering::Relaxed);
        Ok(Order { id, requested })
    }

    /// Create an order with the next id and enqueue it, blocking while the
    /// queue is full.
    ///
    /// # Errors
    ///
    /// - `KitchenError::InvalidIngredientId` if an item names an unknown ingredient
    /// - `KitchenError::ShutdownInProgress` if shutdown began before or while waiting
    pub fn submit_order(
        &self,
        items: impl IntoIterator<Item = (IngredientId, u32)>,
    ) -> Result<OrderId, KitchenError> {
        let order = self.new_order(items)?;
        let id = order.id;
        self.queue
            .enqueue(order)
            .map_err(|_| KitchenError::ShutdownInProgress)?;
        self.on_enqueued(id);
        Ok(id)
    }

    /// Like [`submit_order`](Self::submit_order) but never blocks. Returns
    /// `Ok(None)` when the queue is full; the order is discarded.
    ///
    /// # Errors
    ///
    /// Same as [`submit_order`](Self::submit_order).
    pub fn try_submit_order(
        &self,
        items: impl IntoIterator<Item = (IngredientId, u32)>,
    ) -> Result<Option<OrderId>, KitchenError> {
        let order = self.new_order(items)?;
        let id = order.id;
        if self.queue.try_enqueue(order).is_err() {
            if self.queue.is_closed() {
                return Err(KitchenError::ShutdownInProgress);
            }
            debug!(order_id = id, "queue full, order dropped");
            return Ok(None);
        }
        self.on_enqueued(id);
        Ok(Some(id))
    }

    fn on_enqueued(&self, id: OrderId) {
        info!(order_id = id, queued = self.queue.len(), "order created");
        self.record(KitchenEvent::new(EventAction::Enqueued).with_order(id));
    }

    /// Add stock to one ingredient, then raise one wake credit per line so
    /// every line blocked on the head order gets another attempt.
    ///
    /// # Errors
    ///
    /// - `KitchenError::ShutdownInProgress` after shutdown
    /// - `KitchenError::InvalidIngredientId` / `KitchenError::InvalidQuantity` from the inventory
    pub fn replenish(&self, ingredient: IngredientId, qty: u32) -> Result<u32, KitchenError> {
        if !self.is_running() {
            return Err(KitchenError::ShutdownInProgress);
        }
        let count = self.inventory.replenish(ingredient, qty)?;
        self.queue.signal_available(self.workers.len());
        info!(ingredient_id = ingredient, added = qty, count, "ingredient replenished");
        self.record(KitchenEvent::new(EventAction::Replenished).with_ingredient(ingredient));
        Ok(count)
    }

    /// Stop the kitchen: clear `running`, then release every thread blocked
    /// on the queue signals and every paused or backing-off line.
    ///
    /// Idempotent; only the first call has an effect.
    pub fn request_shutdown(&self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        info!("shutdown requested");
        self.queue.close();
        self.notify_control();
        self.record(KitchenEvent::new(EventAction::Shutdown));
    }

    /// Wake every thread parked on the control lock.
    pub(crate) fn notify_control(&self) {
        let _guard = self.control.lock();
        self.control_signal.notify_all();
    }

    /// Block while `record` is paused and the kitchen is running.
    pub fn wait_while_paused(&self, record: &WorkerRecord) {
        let mut guard = self.control.lock();
        while record.is_paused() && self.is_running() {
            self.control_signal.wait(&mut guard);
        }
    }

    /// Sleep for `duration`, returning early if shutdown is requested.
    pub fn sleep_unless_shutdown(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        let mut guard = self.control.lock();
        while self.is_running() {
            if self
                .control_signal
                .wait_until(&mut guard, deadline)
                .timed_out()
            {
                break;
            }
        }
    }

    /// Send an event to the journal, if one is attached.
    pub fn record(&self, event: KitchenEvent) {
        if let Some(journal) = &self.journal {
            journal.lock().record(event);
        }
    }

    /// Read-only view for display.
    pub fn snapshot(&self) -> KitchenSnapshot {
        KitchenSnapshot {
            running: self.is_running(),
            workers: self
                .workers
                .iter()
                .map(|record| WorkerSnapshot {
                    id: record.id(),
                    state: record.state(),
                    processed: record.processed(),
                    current_order_id: record.current_order_id(),
                    blocked_retries: record.blocked_retries(),
                })
                .collect(),
            queue: QueueSnapshot {
                len: self.queue.len(),
                capacity: self.queue.capacity(),
            },
            inventory: self.inventory.snapshot(),
        }
    }
}
