//! Counting signal built on `parking_lot`.
//!
//! The order queue uses two of these: one counting free slots and one counting
//! wake attempts for preparation lines. A waiter blocks on the condition
//! variable instead of polling, and [`Semaphore::close`] releases every waiter
//! at once so that shutdown can never leave a thread parked on a permit that
//! will not arrive.
//!
//! # Examples
//!
//! ```
//! use prep_lines::Semaphore;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let sem = Arc::new(Semaphore::new(0));
//! let sem2 = Arc::clone(&sem);
//!
//! let waiter = thread::spawn(move || sem2.acquire());
//! sem.release();
//!
//! assert!(waiter.join().unwrap());
//! assert_eq!(sem.available(), 0);
//! ```

use parking_lot::{Condvar, Mutex};
use std::time::Duration;

#[derive(Debug)]
struct Permits {
    count: usize,
    closed: bool,
}

/// A closable counting semaphore.
///
/// Unlike a plain condition variable, releases are buffered: a `release` that
/// happens before anybody waits is still observed by the next `acquire`.
#[derive(Debug)]
pub struct Semaphore {
    permits: Mutex<Permits>,
    signal: Condvar,
}

impl Semaphore {
    /// Creates a semaphore holding `initial` permits.
    #[must_use]
    pub const fn new(initial: usize) -> Self {
        Self {
            permits: Mutex::new(Permits {
                count: initial,
                closed: false,
            }),
            signal: Condvar::new(),
        }
    }

    /// Blocks until a permit is available and takes it.
    ///
    /// Returns `false` without taking a permit once the semaphore is closed,
    /// including when the close happens while this thread is waiting.
    pub fn acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        self.signal
            .wait_while(&mut permits, |p| p.count == 0 && !p.closed);
        if permits.closed {
            return false;
        }
        permits.count -= 1;
        true
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`.
    ///
    /// Returns `false` on timeout or when closed.
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        let mut permits = self.permits.lock();
        let result = self
            .signal
            .wait_while_for(&mut permits, |p| p.count == 0 && !p.closed, timeout);
        if permits.closed || (result.timed_out() && permits.count == 0) {
            return false;
        }
        permits.count -= 1;
        true
    }

    /// Takes a permit if one is immediately available.
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if permits.closed || permits.count == 0 {
            return false;
        }
        permits.count -= 1;
        true
    }

    /// Adds one permit and wakes one waiter.
    pub fn release(&self) {
        self.release_n(1);
    }

    /// Adds `n` permits and wakes up to `n` waiters.
    pub fn release_n(&self, n: usize) {
        if n == 0 {
            return;
        }
        let mut permits = self.permits.lock();
        permits.count = permits.count.saturating_add(n);
        drop(permits);
        if n == 1 {
            self.signal.notify_one();
        } else {
            self.signal.notify_all();
        }
    }

    /// Closes the semaphore and wakes every waiter.
    ///
    /// Permits still counted are kept for inspection but can no longer be
    /// acquired.
    pub fn close(&self) {
        let mut permits = self.permits.lock();
        permits.closed = true;
        drop(permits);
        self.signal.notify_all();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.permits.lock().closed
    }

    /// Number of permits currently available.
    pub fn available(&self) -> usize {
        self.permits.lock().count
    }
}
