//! Ingredient inventory with one lock per ingredient type.
//!
//! Multi-ingredient allocation is all-or-nothing. Every caller acquires the
//! locks it needs in ascending ingredient id, so two allocations can never
//! wait on each other in a cycle. Locks are released in reverse acquisition
//! order whatever the outcome.

use std::collections::BTreeMap;

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use crate::core::error::KitchenError;
use crate::core::order::IngredientId;

/// One ingredient type and its stock counter.
#[derive(Debug)]
pub struct IngredientResource {
    id: IngredientId,
    name: String,
    count: Mutex<u32>,
}

impl IngredientResource {
    /// Ingredient id (its index in the store).
    #[must_use]
    pub const fn id(&self) -> IngredientId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current stock, read under the ingredient lock.
    pub fn count(&self) -> u32 {
        *self.count.lock()
    }
}

/// Read-only view of one ingredient for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSnapshot {
    /// Ingredient id.
    pub id: IngredientId,
    /// Display name.
    pub name: String,
    /// Stock at the time of the snapshot.
    pub count: u32,
}

/// Per-ingredient counters with independent locks.
#[derive(Debug)]
pub struct InventoryStore {
    ingredients: Vec<IngredientResource>,
}

impl InventoryStore {
    /// Create a store from `(name, initial count)` pairs. Ids follow the
    /// iteration order starting at 0.
    pub fn new<S: Into<String>>(stock: impl IntoIterator<Item = (S, u32)>) -> Self {
        let ingredients = stock
            .into_iter()
            .enumerate()
            .map(|(id, (name, count))| IngredientResource {
                id,
                name: name.into(),
                count: Mutex::new(count),
            })
            .collect();
        Self { ingredients }
    }

    /// Number of ingredient types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Whether the store has no ingredient types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Look up an ingredient by id.
    #[must_use]
    pub fn get(&self, id: IngredientId) -> Option<&IngredientResource> {
        self.ingredients.get(id)
    }

    /// Current stock of `id`, `None` for an unknown id.
    pub fn count(&self, id: IngredientId) -> Option<u32> {
        self.get(id).map(IngredientResource::count)
    }

    /// Check that `id` names an ingredient in this store.
    ///
    /// # Errors
    ///
    /// Returns `KitchenError::InvalidIngredientId` for an out-of-range id.
    pub fn validate_id(&self, id: IngredientId) -> Result<(), KitchenError> {
        if id < self.ingredients.len() {
            Ok(())
        } else {
            Err(KitchenError::InvalidIngredientId {
                id,
                ingredients: self.ingredients.len(),
            })
        }
    }

    /// Atomically take every requested quantity, or nothing.
    ///
    /// Never waits for stock: returns `false` immediately when any requested
    /// ingredient is short, and in that case no counter has changed. Zero
    /// quantities are ignored. A request naming an unknown ingredient can never
    /// be satisfied and also returns `false`.
    pub fn try_allocate(&self, request: &BTreeMap<IngredientId, u32>) -> bool {
        // BTreeMap iterates in ascending key order, which is the lock order.
        let mut held: Vec<(MutexGuard<'_, u32>, u32)> = Vec::with_capacity(request.len());
        for (&id, &qty) in request {
            if qty == 0 {
                continue;
            }
            let Some(ingredient) = self.ingredients.get(id) else {
                tracing::warn!(ingredient_id = id, "allocation names unknown ingredient");
                release_in_reverse(held);
                return false;
            };
            held.push((ingredient.count.lock(), qty));
        }

        let feasible = held.iter().all(|(count, qty)| **count >= *qty);
        if feasible {
            for (count, qty) in &mut held {
                **count -= *qty;
            }
        }

        release_in_reverse(held);
        feasible
    }

    /// Add `qty` units of `id`, holding only that ingredient's lock.
    ///
    /// Returns the new stock level. Waking blocked preparation lines is the
    /// caller's job, see [`SystemState::replenish`](crate::core::SystemState::replenish).
    ///
    /// # Errors
    ///
    /// - `KitchenError::InvalidIngredientId` for an unknown id
    /// - `KitchenError::InvalidQuantity` for `qty == 0` or counter overflow
    pub fn replenish(&self, id: IngredientId, qty: u32) -> Result<u32, KitchenError> {
        self.validate_id(id)?;
        if qty == 0 {
            return Err(KitchenError::InvalidQuantity(0));
        }
        let ingredient = &self.ingredients[id];
        let mut count = ingredient.count.lock();
        let updated = count
            .checked_add(qty)
            .ok_or(KitchenError::InvalidQuantity(i64::from(qty)))?;
        *count = updated;
        Ok(updated)
    }

    /// Per-ingredient stock levels. Each counter is read under its own lock;
    /// the list as a whole is not a single atomic cut.
    pub fn snapshot(&self) -> Vec<IngredientSnapshot> {
        self.ingredients
            .iter()
            .map(|ingredient| IngredientSnapshot {
                id: ingredient.id,
                name: ingredient.name.clone(),
                count: ingredient.count(),
            })
            .collect()
    }
}

fn release_in_reverse(mut held: Vec<(MutexGuard<'_, u32>, u32)>) {
    while let Some((guard, _)) = held.pop() {
        drop(guard);
    }
}
