//! Order producer simulating customer arrivals.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::core::{IngredientId, KitchenError, SystemState};

/// One ingredient in a recipe, included with some probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecipeComponent {
    /// Ingredient id.
    pub ingredient: IngredientId,
    /// Units requested when included.
    pub quantity: u32,
    /// Probability of inclusion in `[0, 1]`.
    pub probability: f64,
}

/// A randomized order template.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    components: Vec<RecipeComponent>,
}

impl Recipe {
    /// Recipe from explicit components. Probabilities are clamped to
    /// `[0, 1]`; a non-finite probability becomes 0.
    #[must_use]
    pub fn new(mut components: Vec<RecipeComponent>) -> Self {
        for c in &mut components {
            c.probability = inclusion_probability(c.probability);
        }
        Self { components }
    }

    /// Two buns and a patty always; lettuce, tomato, onion and cheese with
    /// probability 0.8, 0.7, 0.6 and 0.9. Ids match the default ingredient
    /// table (Bun=0 … Cheese=5).
    #[must_use]
    pub fn burger() -> Self {
        let item = |ingredient, quantity, probability| RecipeComponent {
            ingredient,
            quantity,
            probability,
        };
        Self::new(vec![
            item(0, 2, 1.0),
            item(1, 1, 1.0),
            item(2, 1, 0.8),
            item(3, 1, 0.7),
            item(4, 1, 0.6),
            item(5, 1, 0.9),
        ])
    }

    /// Draw one order's items. Components naming ingredients at or beyond
    /// `ingredient_count` are skipped.
    pub fn sample<R: Rng>(
        &self,
        rng: &mut R,
        ingredient_count: usize,
    ) -> Vec<(IngredientId, u32)> {
        self.components
            .iter()
            .filter(|c| c.ingredient < ingredient_count)
            .filter(|c| rng.random_bool(inclusion_probability(c.probability)))
            .map(|c| (c.ingredient, c.quantity))
            .collect()
    }
}

fn inclusion_probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl Default for Recipe {
    fn default() -> Self {
        Self::burger()
    }
}

/// Produces orders at random intervals until shutdown or an optional limit.
pub struct OrderGenerator {
    system: Arc<SystemState>,
    recipe: Recipe,
    rng: StdRng,
    arrival_min: Duration,
    arrival_max: Duration,
    limit: Option<u64>,
}

impl OrderGenerator {
    /// Generator for `system` with the burger recipe, 1–3 s arrivals and an
    /// OS-seeded RNG.
    #[must_use]
    pub fn new(system: Arc<SystemState>) -> Self {
        Self {
            system,
            recipe: Recipe::burger(),
            rng: StdRng::from_os_rng(),
            arrival_min: Duration::from_secs(1),
            arrival_max: Duration::from_secs(3),
            limit: None,
        }
    }

    /// Use `recipe` for generated orders.
    #[must_use]
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = recipe;
        self
    }

    /// Deterministic RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Inter-arrival delay range. A reversed range is swapped.
    #[must_use]
    pub fn with_arrival(mut self, min: Duration, max: Duration) -> Self {
        self.arrival_min = min.min(max);
        self.arrival_max = max.max(min);
        self
    }

    /// Stop after `limit` orders.
    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn next_delay(&mut self) -> Duration {
        let min = u64::try_from(self.arrival_min.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.arrival_max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(self.rng.random_range(min..=max))
    }

    /// Run until shutdown or the limit is reached. Returns the number of
    /// orders enqueued.
    pub fn run(mut self) -> u64 {
        info!("order generator ready");
        let mut produced = 0u64;
        while self.system.is_running() && self.limit.is_none_or(|limit| produced < limit) {
            let delay = self.next_delay();
            self.system.sleep_unless_shutdown(delay);
            if !self.system.is_running() {
                break;
            }

            let items = self
                .recipe
                .sample(&mut self.rng, self.system.inventory().len());
            match self.system.submit_order(items) {
                Ok(_) => produced += 1,
                Err(KitchenError::ShutdownInProgress) => break,
                Err(e) => {
                    warn!(error = %e, "recipe does not match inventory, generator stopping");
                    break;
                }
            }
        }
        info!(produced, "order generator exiting");
        produced
    }

    /// Run on a dedicated thread named `order-generator`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread could not be created.
    pub fn spawn(self) -> io::Result<JoinHandle<u64>> {
        thread::Builder::new()
            .name("order-generator".into())
            .spawn(move || self.run())
    }
}
