//! Integration tests for Semaphore
//!
//! These tests exercise the counting signal in producer/consumer shapes.

use prep_lines::Semaphore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Each release wakes exactly one acquirer.
#[test]
fn test_release_hands_out_permits() {
    const WAITERS: usize = 8;

    let sem = Arc::new(Semaphore::new(0));
    let acquired = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..WAITERS)
        .map(|_| {
            let sem = Arc::clone(&sem);
            let acquired = Arc::clone(&acquired);
            thread::spawn(move || {
                if sem.acquire() {
                    acquired.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    sem.release_n(WAITERS / 2);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(acquired.load(Ordering::SeqCst), WAITERS / 2);

    sem.release_n(WAITERS / 2);
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(acquired.load(Ordering::SeqCst), WAITERS);
    assert_eq!(sem.available(), 0);
}

/// Closing releases every blocked waiter with `false`.
#[test]
fn test_close_releases_waiters() {
    let sem = Arc::new(Semaphore::new(0));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sem = Arc::clone(&sem);
            thread::spawn(move || sem.acquire())
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    sem.close();
    for h in handles {
        assert!(!h.join().unwrap());
    }
    assert!(sem.is_closed());
    assert!(!sem.try_acquire());
}

#[test]
fn test_acquire_timeout() {
    let sem = Semaphore::new(0);
    let start = Instant::now();
    assert!(!sem.acquire_timeout(Duration::from_millis(30)));
    assert!(start.elapsed() >= Duration::from_millis(30));

    sem.release();
    assert!(sem.acquire_timeout(Duration::from_millis(30)));
}

/// Bounded buffer built from two semaphores never exceeds its capacity.
#[test]
fn test_bounded_buffer_pattern() {
    const CAPACITY: usize = 3;
    const ITEMS: usize = 200;

    let slots = Arc::new(Semaphore::new(CAPACITY));
    let items = Arc::new(Semaphore::new(0));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let producer = {
        let (slots, items, in_flight, peak) = (
            Arc::clone(&slots),
            Arc::clone(&items),
            Arc::clone(&in_flight),
            Arc::clone(&peak),
        );
        thread::spawn(move || {
            for _ in 0..ITEMS {
                assert!(slots.acquire());
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                items.release();
            }
        })
    };

    for _ in 0..ITEMS {
        assert!(items.acquire());
        in_flight.fetch_sub(1, Ordering::SeqCst);
        slots.release();
    }
    producer.join().unwrap();
    assert!(peak.load(Ordering::SeqCst) <= CAPACITY);
}
