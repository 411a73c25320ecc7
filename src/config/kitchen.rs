//! Kitchen configuration structures.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::SchedulingPolicy;

/// Upper bound on preparation lines.
pub const MAX_WORKERS: usize = 20;
/// Upper bound on ingredient types.
pub const MAX_INGREDIENTS: usize = 10;
/// Default order queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "PREP_LINES_CONFIG";
/// Environment override for `worker_count`.
pub const WORKERS_ENV: &str = "PREP_LINES_WORKERS";
/// Environment override for `queue_capacity`.
pub const QUEUE_CAPACITY_ENV: &str = "PREP_LINES_QUEUE_CAPACITY";

/// Initial stock of one ingredient type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientConfig {
    /// Display name.
    pub name: String,
    /// Starting count.
    pub count: u32,
}

impl IngredientConfig {
    /// Ingredient `name` starting with `count` units.
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Kitchen configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Number of preparation lines.
    pub worker_count: usize,
    /// Maximum queued orders before the producer blocks.
    pub queue_capacity: usize,
    /// Ingredient types in id order.
    pub ingredients: Vec<IngredientConfig>,
    /// Simulated preparation time per order, in milliseconds.
    pub prep_duration_ms: u64,
    /// Delay before retrying an order that could not be allocated, in milliseconds.
    pub backoff_ms: u64,
    /// Minimum delay between generated orders, in milliseconds.
    pub arrival_min_ms: u64,
    /// Maximum delay between generated orders, in milliseconds.
    pub arrival_max_ms: u64,
    /// Queue service policy.
    pub policy: SchedulingPolicy,
    /// Journal entries kept in memory; zero disables the journal.
    pub journal_capacity: usize,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            worker_count: 5,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            ingredients: vec![
                IngredientConfig::new("Bun", 50),
                IngredientConfig::new("Patty", 40),
                IngredientConfig::new("Lettuce", 100),
                IngredientConfig::new("Tomato", 80),
                IngredientConfig::new("Onion", 90),
                IngredientConfig::new("Cheese", 60),
            ],
            prep_duration_ms: 2000,
            backoff_ms: 3000,
            arrival_min_ms: 1000,
            arrival_max_ms: 3000,
            policy: SchedulingPolicy::StrictFifo,
            journal_capacity: 1024,
        }
    }
}

impl KitchenConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of preparation lines.
    #[must_use]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the order queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Replace the ingredient table.
    #[must_use]
    pub fn with_ingredients<S: Into<String>>(
        mut self,
        ingredients: impl IntoIterator<Item = (S, u32)>,
    ) -> Self {
        self.ingredients = ingredients
            .into_iter()
            .map(|(name, count)| IngredientConfig::new(name, count))
            .collect();
        self
    }

    /// Set the simulated preparation time.
    #[must_use]
    pub fn with_prep_duration_ms(mut self, ms: u64) -> Self {
        self.prep_duration_ms = ms;
        self
    }

    /// Set the retry backoff.
    #[must_use]
    pub fn with_backoff_ms(mut self, ms: u64) -> Self {
        self.backoff_ms = ms;
        self
    }

    /// Set the order inter-arrival range.
    #[must_use]
    pub fn with_arrival_ms(mut self, min: u64, max: u64) -> Self {
        self.arrival_min_ms = min;
        self.arrival_max_ms = max;
        self
    }

    /// Set the queue service policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the journal capacity.
    #[must_use]
    pub fn with_journal_capacity(mut self, capacity: usize) -> Self {
        self.journal_capacity = capacity;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be greater than 0".into());
        }
        if self.worker_count > MAX_WORKERS {
            return Err(format!("worker_count must be at most {MAX_WORKERS}"));
        }
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be greater than 0".into());
        }
        if self.ingredients.is_empty() {
            return Err("at least one ingredient must be defined".into());
        }
        if self.ingredients.len() > MAX_INGREDIENTS {
            return Err(format!("at most {MAX_INGREDIENTS} ingredients are supported"));
        }
        if let Some(pos) = self.ingredients.iter().position(|i| i.name.trim().is_empty()) {
            return Err(format!("ingredient {pos} has an empty name"));
        }
        if self.backoff_ms == 0 {
            return Err("backoff_ms must be greater than 0".into());
        }
        if self.arrival_min_ms > self.arrival_max_ms {
            return Err("arrival_min_ms must not exceed arrival_max_ms".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their default values.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns a description of the I/O, parse or validation failure.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        Self::from_json_str(&input)
    }

    /// Build configuration from the environment.
    ///
    /// Loads a `.env` file if present, starts from the JSON file named by
    /// `PREP_LINES_CONFIG` (or the defaults), then applies the
    /// `PREP_LINES_WORKERS` and `PREP_LINES_QUEUE_CAPACITY` overrides.
    ///
    /// # Errors
    ///
    /// Returns a description of the first unreadable, unparsable or invalid value.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_json_file(path)?,
            Err(_) => Self::default(),
        };
        if let Some(workers) = env_usize(WORKERS_ENV)? {
            cfg.worker_count = workers;
        }
        if let Some(capacity) = env_usize(QUEUE_CAPACITY_ENV)? {
            cfg.queue_capacity = capacity;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn env_usize(key: &str) -> Result<Option<usize>, String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| format!("{key}={raw:?}: {e}")),
        Err(_) => Ok(None),
    }
}
