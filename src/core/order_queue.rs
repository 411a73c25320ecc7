//! Bounded circular queue of pending orders with producer/consumer signaling.
//!
//! Two counting signals drive the queue:
//!
//! - **space**: starts at capacity, taken by [`OrderQueue::enqueue`], returned
//!   when an order leaves the queue.
//! - **orders**: starts at zero, raised by every enqueue and by a line that
//!   failed to allocate for the head order and hands its wake credit back.
//!
//! The orders signal therefore counts wake attempts, not queue length. The
//! same head order can wake several lines in turn while it waits for stock.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::order::{Order, OrderId};
use crate::semaphore::Semaphore;

/// Which order a preparation line may serve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// Only the head order is ever served. An order the inventory cannot
    /// satisfy blocks everything behind it.
    #[default]
    StrictFifo,
    /// Serve the first satisfiable order counting from the head; the rest
    /// keep their relative order.
    SkipAhead,
}

/// Outcome of [`OrderQueue::claim`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// Ingredients were allocated and the order has left the queue.
    Served(Order),
    /// No candidate could be allocated; the head order stays in place.
    Held(OrderId),
    /// The queue had no orders (a surplus wake credit).
    Empty,
}

/// Ring buffer state, only touched under the queue lock.
#[derive(Debug)]
struct Ring {
    slots: Vec<Option<Order>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn index(&self, offset: usize) -> usize {
        (self.head + offset) % self.capacity()
    }

    fn push_back(&mut self, order: Order) {
        debug_assert!(self.count < self.capacity(), "push into full ring");
        self.slots[self.tail] = Some(order);
        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;
    }

    fn front(&self) -> Option<&Order> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    fn pop_front(&mut self) -> Option<Order> {
        if self.count == 0 {
            return None;
        }
        let order = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        order
    }

    /// Remove the entry `offset` places behind the head, shifting later
    /// entries forward so the ring stays contiguous.
    fn remove_at(&mut self, offset: usize) -> Option<Order> {
        if offset >= self.count {
            return None;
        }
        if offset == 0 {
            return self.pop_front();
        }
        let at = self.index(offset);
        let removed = self.slots[at].take();
        for i in offset..self.count - 1 {
            let from = self.index(i + 1);
            let to = self.index(i);
            self.slots[to] = self.slots[from].take();
        }
        self.tail = (self.tail + self.capacity() - 1) % self.capacity();
        self.count -= 1;
        removed
    }

    fn iter(&self) -> impl Iterator<Item = &Order> + '_ {
        (0..self.count).filter_map(move |i| self.slots[self.index(i)].as_ref())
    }
}

/// Bounded FIFO of orders shared by the producer and every preparation line.
#[derive(Debug)]
pub struct OrderQueue {
    ring: Mutex<Ring>,
    capacity: usize,
    orders_available: Semaphore,
    space_available: Semaphore,
}

impl OrderQueue {
    /// Create an empty queue holding at most `capacity` orders.
    ///
    /// `capacity` is validated by the configuration layer; a zero capacity is
    /// bumped to one so the ring arithmetic stays defined.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: Mutex::new(Ring::new(capacity)),
            capacity,
            orders_available: Semaphore::new(0),
            space_available: Semaphore::new(capacity),
        }
    }

    /// Append an order, blocking while the queue is full.
    ///
    /// Raises the orders signal exactly once on success.
    ///
    /// # Errors
    ///
    /// Hands the order back if the queue was closed before a slot freed up.
    pub fn enqueue(&self, order: Order) -> Result<(), Order> {
        if !self.space_available.acquire() {
            return Err(order);
        }
        self.push(order);
        Ok(())
    }

    /// Append an order only if a slot is free right now.
    ///
    /// # Errors
    ///
    /// Hands the order back when the queue is full or closed.
    pub fn try_enqueue(&self, order: Order) -> Result<(), Order> {
        if !self.space_available.try_acquire() {
            return Err(order);
        }
        self.push(order);
        Ok(())
    }

    fn push(&self, order: Order) {
        {
            let mut ring = self.ring.lock();
            ring.push_back(order);
        }
        self.orders_available.release();
    }

    /// Block until a wake credit is available and consume it.
    ///
    /// Returns `false` once the queue has been closed.
    pub fn wait_for_order(&self) -> bool {
        self.orders_available.acquire()
    }

    /// Give a consumed wake credit back so another line retries.
    pub fn return_credit(&self) {
        self.orders_available.release();
    }

    /// Raise `n` extra wake credits, one per line that should retry.
    pub fn signal_available(&self, n: usize) {
        self.orders_available.release_n(n);
    }

    /// Copy of the head order without changing queue state.
    pub fn peek_front(&self) -> Option<Order> {
        self.ring.lock().front().cloned()
    }

    /// Remove the head order and free its slot.
    ///
    /// Only meant to follow a successful allocation for that same order. Lines
    /// use [`claim`](Self::claim), which does both under one lock.
    pub fn dequeue_front(&self) -> Option<Order> {
        let order = self.ring.lock().pop_front();
        if order.is_some() {
            self.space_available.release();
        }
        order
    }

    /// Pick a candidate per `policy`, try to allocate it, and remove it on
    /// success, all while holding the queue lock.
    ///
    /// `allocate` is called with the queue lock held; it may take ingredient
    /// locks but must never take the queue lock.
    /// The first `true` it returns is final: that order is removed and
    /// returned as [`Claim::Served`].
    pub fn claim<F>(&self, policy: SchedulingPolicy, mut allocate: F) -> Claim
    where
        F: FnMut(&Order) -> bool,
    {
        let mut ring = self.ring.lock();
        let Some(head_id) = ring.front().map(|order| order.id) else {
            return Claim::Empty;
        };

        let offset = match policy {
            SchedulingPolicy::StrictFifo => ring.front().is_some_and(&mut allocate).then_some(0),
            SchedulingPolicy::SkipAhead => ring.iter().position(&mut allocate),
        };

        let Some(offset) = offset else {
            return Claim::Held(head_id);
        };
        let served = ring.remove_at(offset);
        drop(ring);

        match served {
            Some(order) => {
                self.space_available.release();
                Claim::Served(order)
            }
            None => Claim::Held(head_id),
        }
    }

    /// Number of queued orders.
    pub fn len(&self) -> usize {
        self.ring.lock().count
    }

    /// Whether the queue holds no orders.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every slot is taken.
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Fixed capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ids of queued orders from head to tail.
    pub fn order_ids(&self) -> Vec<OrderId> {
        self.ring.lock().iter().map(|order| order.id).collect()
    }

    /// Wake credits currently outstanding.
    pub fn pending_credits(&self) -> usize {
        self.orders_available.available()
    }

    /// Release every thread blocked in `enqueue` or `wait_for_order`; later
    /// calls return immediately.
    pub fn close(&self) {
        self.orders_available.close();
        self.space_available.close();
    }

    /// Whether the queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.orders_available.is_closed()
    }
}
