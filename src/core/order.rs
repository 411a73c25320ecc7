//! Orders and the identifiers shared across the kitchen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unique, monotonically increasing order identifier.
pub type OrderId = u64;
/// Index of an ingredient type in the inventory.
pub type IngredientId = usize;
/// Index of a preparation line.
pub type WorkerId = usize;

/// A request for specific quantities of one or more ingredients.
///
/// The request map is ordered by ingredient id, which is also the order in
/// which the inventory acquires ingredient locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier, assigned at submission.
    pub id: OrderId,
    /// Requested quantity per ingredient id. Zero quantities are ignored.
    pub requested: BTreeMap<IngredientId, u32>,
}

impl Order {
    /// Create an order from `(ingredient, quantity)` pairs.
    ///
    /// Repeated ingredients are summed.
    pub fn new(id: OrderId, items: impl IntoIterator<Item = (IngredientId, u32)>) -> Self {
        let mut requested = BTreeMap::new();
        for (ingredient, qty) in items {
            let total = requested.entry(ingredient).or_insert(0u32);
            *total = total.saturating_add(qty);
        }
        Self { id, requested }
    }

    /// Ingredients with a non-zero quantity, in ascending id order.
    pub fn needed(&self) -> impl Iterator<Item = (IngredientId, u32)> + '_ {
        self.requested
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(id, qty)| (*id, *qty))
    }

    /// Quantity requested for `ingredient`, zero if absent.
    #[must_use]
    pub fn quantity(&self, ingredient: IngredientId) -> u32 {
        self.requested.get(&ingredient).copied().unwrap_or(0)
    }
}
