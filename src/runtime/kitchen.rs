//! Running kitchen: line threads, the optional producer and their shutdown.
//!
//! Dropping a `Kitchen` requests shutdown but does not join; call
//! [`Kitchen::shutdown`] or [`Kitchen::join`] for a graceful stop.

use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::builders::{build_executor, build_generator, build_system};
use crate::config::KitchenConfig;
use crate::core::{
    spawn_line, AppResult, Controller, EventSink, KitchenSnapshot, PrepExecutor, SystemState,
};
use crate::runtime::producer::OrderGenerator;

/// Final counts after every thread has exited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitchenReport {
    /// Orders produced by the generator, if one ran.
    pub orders_generated: Option<u64>,
    /// Lines that panicked instead of exiting cleanly.
    pub panicked_lines: usize,
    /// State after shutdown.
    pub snapshot: KitchenSnapshot,
}

/// Handle on a started kitchen.
pub struct Kitchen {
    system: Arc<SystemState>,
    controller: Controller,
    lines: Vec<JoinHandle<()>>,
    producer: Option<JoinHandle<u64>>,
}

impl Kitchen {
    /// Spawn one line per worker record and, if given, the order generator.
    ///
    /// # Errors
    ///
    /// Fails if a thread cannot be created. Threads already started are
    /// shut down and joined first.
    pub fn start<E: PrepExecutor>(
        system: Arc<SystemState>,
        executor: E,
        generator: Option<OrderGenerator>,
    ) -> AppResult<Self> {
        let mut kitchen = Self {
            controller: Controller::new(Arc::clone(&system)),
            system,
            lines: Vec::new(),
            producer: None,
        };

        for id in 0..kitchen.system.worker_count() {
            match spawn_line(id, Arc::clone(&kitchen.system), executor.clone()) {
                Ok(handle) => kitchen.lines.push(handle),
                Err(e) => {
                    kitchen.shutdown();
                    return Err(e).with_context(|| format!("failed to spawn prep-line-{id}"));
                }
            }
        }

        if let Some(generator) = generator {
            match generator.spawn() {
                Ok(handle) => kitchen.producer = Some(handle),
                Err(e) => {
                    kitchen.shutdown();
                    return Err(e).context("failed to spawn order generator");
                }
            }
        }

        info!(
            lines = kitchen.lines.len(),
            producer = kitchen.producer.is_some(),
            "kitchen started"
        );
        Ok(kitchen)
    }

    /// Build state, executor and generator from `cfg` and start.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or thread creation failure.
    pub fn from_config(cfg: &KitchenConfig, journal: Option<Box<dyn EventSink>>) -> AppResult<Self> {
        let system = Arc::new(build_system(cfg, journal)?);
        let generator = build_generator(cfg, Arc::clone(&system));
        Self::start(system, build_executor(cfg), Some(generator))
    }

    /// Shared state.
    #[must_use]
    pub const fn system(&self) -> &Arc<SystemState> {
        &self.system
    }

    /// Operator controller.
    #[must_use]
    pub const fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Begin shutdown without waiting.
    pub fn request_shutdown(&self) {
        self.system.request_shutdown();
    }

    /// Wait for every thread to exit. Does not request shutdown itself; the
    /// producer may finish on its own limit but lines run until shutdown.
    #[must_use]
    pub fn join(mut self) -> KitchenReport {
        let orders_generated = self.producer.take().and_then(|handle| match handle.join() {
            Ok(count) => Some(count),
            Err(_) => {
                warn!("order generator panicked");
                None
            }
        });

        let mut panicked_lines = 0;
        for (id, handle) in std::mem::take(&mut self.lines).into_iter().enumerate() {
            if handle.join().is_err() {
                warn!(worker_id = id, "preparation line panicked");
                panicked_lines += 1;
            } else {
                debug!(worker_id = id, "preparation line joined");
            }
        }

        let snapshot = self.system.snapshot();
        info!(processed = snapshot.total_processed(), "kitchen stopped");
        KitchenReport {
            orders_generated,
            panicked_lines,
            snapshot,
        }
    }

    /// Request shutdown and wait for every thread.
    pub fn shutdown(self) -> KitchenReport {
        self.request_shutdown();
        self.join()
    }
}

impl Drop for Kitchen {
    fn drop(&mut self) {
        if !self.lines.is_empty() || self.producer.is_some() {
            debug!("kitchen dropped without join, threads detached");
        }
        self.system.request_shutdown();
    }
}
