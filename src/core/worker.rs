//! Preparation lines: shared per-line records and the line state machine.
//!
//! A line's state is a single `AtomicU64` packing the state kind with the
//! order id it refers to, so readers never see a kind paired with a stale id.
//! The line itself is the only writer except for pause and resume, which the
//! controller applies with compare-and-swap. A line never overwrites `Paused`;
//! only `resume` clears it.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::core::executor::PrepExecutor;
use crate::core::journal::{EventAction, KitchenEvent};
use crate::core::order::{OrderId, WorkerId};
use crate::core::order_queue::Claim;
use crate::core::system::SystemState;

/// What a preparation line is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "order_id")]
pub enum WorkerState {
    /// Waiting for an order.
    Idle,
    /// Working on an order whose ingredients are allocated.
    Preparing(OrderId),
    /// Suspended by the operator.
    Paused,
    /// The head order could not be allocated; backing off before a retry.
    Blocked(OrderId),
}

const KIND_BITS: u32 = 2;
const KIND_MASK: u64 = (1 << KIND_BITS) - 1;
const IDLE: u64 = 0;
const PREPARING: u64 = 1;
const PAUSED: u64 = 2;
const BLOCKED: u64 = 3;

impl WorkerState {
    const fn encode(self) -> u64 {
        match self {
            Self::Idle => IDLE,
            Self::Paused => PAUSED,
            Self::Preparing(id) => (id << KIND_BITS) | PREPARING,
            Self::Blocked(id) => (id << KIND_BITS) | BLOCKED,
        }
    }

    const fn decode(word: u64) -> Self {
        let id = word >> KIND_BITS;
        match word & KIND_MASK {
            PREPARING => Self::Preparing(id),
            PAUSED => Self::Paused,
            BLOCKED => Self::Blocked(id),
            _ => Self::Idle,
        }
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Preparing(_) => "preparing",
            Self::Paused => "paused",
            Self::Blocked(_) => "no ingredients",
        }
    }
}

/// Shared, atomically readable record of one preparation line.
#[derive(Debug)]
pub struct WorkerRecord {
    id: WorkerId,
    state: AtomicU64,
    current_order: AtomicU64,
    processed: AtomicU64,
    blocked_retries: AtomicU64,
}

impl WorkerRecord {
    /// Fresh idle record.
    #[must_use]
    pub const fn new(id: WorkerId) -> Self {
        Self {
            id,
            state: AtomicU64::new(IDLE),
            current_order: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            blocked_retries: AtomicU64::new(0),
        }
    }

    /// Line id.
    #[must_use]
    pub const fn id(&self) -> WorkerId {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> WorkerState {
        WorkerState::decode(self.state.load(Ordering::Acquire))
    }

    /// Whether the operator has paused this line.
    pub fn is_paused(&self) -> bool {
        self.state() == WorkerState::Paused
    }

    /// Orders fully prepared by this line.
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Most recent order this line served or was blocked on, if any.
    pub fn current_order_id(&self) -> Option<OrderId> {
        match self.current_order.load(Ordering::Relaxed) {
            0 => None,
            id => Some(id),
        }
    }

    /// Failed allocation attempts so far.
    pub fn blocked_retries(&self) -> u64 {
        self.blocked_retries.load(Ordering::Relaxed)
    }

    /// Line-side transition. Leaves `Paused` untouched.
    fn transition(&self, next: WorkerState) {
        let encoded = next.encode();
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                (word & KIND_MASK != PAUSED).then_some(encoded)
            });
        if let WorkerState::Preparing(id) | WorkerState::Blocked(id) = next {
            self.current_order.store(id, Ordering::Relaxed);
        }
    }

    /// Mark the line paused. Returns `false` if it already was.
    pub(crate) fn request_pause(&self) -> bool {
        self.state.swap(PAUSED, Ordering::AcqRel) & KIND_MASK != PAUSED
    }

    /// Clear a pause. Returns `false` if the line was not paused.
    pub(crate) fn request_resume(&self) -> bool {
        self.state
            .compare_exchange(PAUSED, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// The loop run by one preparation line.
pub struct PrepLine<E> {
    id: WorkerId,
    system: Arc<SystemState>,
    executor: E,
}

impl<E: PrepExecutor> PrepLine<E> {
    /// Line `id` working against `system`.
    pub const fn new(id: WorkerId, system: Arc<SystemState>, executor: E) -> Self {
        Self {
            id,
            system,
            executor,
        }
    }

    /// Run until shutdown is observed.
    ///
    /// `running` is checked at the top of every iteration and right after
    /// every wake-up, before any shared structure is touched.
    pub fn run(self) {
        let id = self.id;
        let Some(record) = self.system.workers().get(id) else {
            error!(worker_id = id, "no record for preparation line");
            return;
        };

        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!(worker_id = id, error = %e, "failed to create line runtime");
                return;
            }
        };

        let queue = self.system.queue();
        let inventory = self.system.inventory();
        info!(worker_id = id, "preparation line ready");

        loop {
            if !self.system.is_running() {
                break;
            }

            if record.is_paused() {
                debug!(worker_id = id, "line paused");
                self.system.wait_while_paused(record);
                continue;
            }

            record.transition(WorkerState::Idle);
            debug!(worker_id = id, "waiting for an order");
            if !queue.wait_for_order() || !self.system.is_running() {
                break;
            }

            if record.is_paused() {
                // Paused while waiting; the credit belongs to some order.
                queue.return_credit();
                continue;
            }

            // A successful allocation always ends the claim with that order
            // served, so the event is journaled under the queue lock.
            match queue.claim(self.system.policy(), |order| {
                let allocated = inventory.try_allocate(&order.requested);
                if allocated {
                    self.system.record(
                        KitchenEvent::new(EventAction::Served)
                            .with_order(order.id)
                            .with_worker(id),
                    );
                }
                allocated
            }) {
                Claim::Empty => {
                    debug!(worker_id = id, "woke with an empty queue");
                }
                Claim::Held(order_id) => {
                    record.transition(WorkerState::Blocked(order_id));
                    record.blocked_retries.fetch_add(1, Ordering::Relaxed);
                    debug!(worker_id = id, order_id, "not enough ingredients, backing off");
                    self.system.record(
                        KitchenEvent::new(EventAction::Blocked)
                            .with_order(order_id)
                            .with_worker(id),
                    );
                    queue.return_credit();
                    self.system.sleep_unless_shutdown(self.system.backoff());
                }
                Claim::Served(order) => {
                    record.transition(WorkerState::Preparing(order.id));
                    info!(worker_id = id, order_id = order.id, "preparing order");

                    rt.block_on(self.executor.prepare(&order, id));

                    let total = record.processed.fetch_add(1, Ordering::Relaxed) + 1;
                    record.transition(WorkerState::Idle);
                    info!(worker_id = id, order_id = order.id, total, "order completed");
                    self.system.record(
                        KitchenEvent::new(EventAction::Completed)
                            .with_order(order.id)
                            .with_worker(id),
                    );
                }
            }
        }

        info!(worker_id = id, processed = record.processed(), "preparation line exiting");
    }
}

/// Spawn line `id` on a dedicated OS thread named `prep-line-{id}`.
///
/// # Errors
///
/// Returns the OS error if the thread could not be created.
pub fn spawn_line<E: PrepExecutor>(
    id: WorkerId,
    system: Arc<SystemState>,
    executor: E,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("prep-line-{id}"))
        .spawn(move || PrepLine::new(id, system, executor).run())
}
