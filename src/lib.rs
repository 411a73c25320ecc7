//! # Prep Lines
//!
//! A concurrent kitchen simulation: one producer enqueues orders into a bounded
//! FIFO queue, a fixed set of preparation lines serve them against a shared
//! ingredient inventory, and an operator pauses lines, resumes them and
//! replenishes stock while everything runs.
//!
//! ## Guarantees
//!
//! - **All-or-nothing allocation**: an order takes every ingredient it needs
//!   or none. Ingredient locks are always taken in ascending id order and
//!   released in reverse, so overlapping requests cannot deadlock.
//! - **No oversell**: stock never goes negative under any interleaving.
//! - **Backpressure**: the producer blocks while the queue is full; lines block
//!   while it is empty. Nothing polls.
//! - **Head-of-line blocking**: under the default policy an order that cannot
//!   be satisfied stays at the head until a replenish makes it satisfiable.
//! - **Prompt shutdown**: every blocked thread wakes and exits.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use prep_lines::config::KitchenConfig;
//! use prep_lines::runtime::Kitchen;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = KitchenConfig::default().with_worker_count(3);
//! let kitchen = Kitchen::from_config(&cfg, None)?;
//! kitchen.controller().adjust_inventory(0, 20)?;
//! let report = kitchen.shutdown();
//! println!("{}", report.snapshot);
//! # Ok(())
//! # }
//! ```
//!
//! For the full scenarios, see `tests/kitchen_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Inventory, order queue, preparation lines and the controller.
pub mod core;
/// Configuration models for the kitchen.
pub mod config;
/// Builders to construct kitchen components from configuration.
pub mod builders;
/// Bootstrap, order production and operator commands.
pub mod runtime;
/// Closable counting semaphore.
pub mod semaphore;
/// Shared utilities.
pub mod util;

pub use semaphore::Semaphore;
