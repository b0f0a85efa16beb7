//! # Stock Pool
//!
//! The engine's working view over the collaborator-owned stock list, plus
//! the callback seam through which finalized deductions reach the owner.
//!
//! ## Ownership Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stock Ownership                                  │
//! │                                                                         │
//! │  Stock collaborator (inventory screens + persistence)                  │
//! │       │ provides Vec<StockEntry> at batch start                        │
//! │       ▼                                                                 │
//! │  StockPool (THIS MODULE)                                               │
//! │       │ • sellable() snapshots feed each search                        │
//! │       │ • deduct() keeps availability non-negative                     │
//! │       │ • bill N's deductions are visible to bill N+1's search         │
//! │       ▼                                                                 │
//! │  StockLedger callback                                                  │
//! │       • notified once per finalized line item                          │
//! │       • may refuse; the bill stands and the divergence is logged       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use khata_core::error::{CoreError, CoreResult};
use khata_core::types::StockEntry;

// =============================================================================
// Stock Ledger Callback
// =============================================================================

/// External deduction callback, invoked once per finalized line item.
///
/// Returns `true` when the owner applied the deduction. A `false` return is
/// logged by the batch driver and otherwise ignored: the bill is already
/// final, and reconciling the divergence is the stock owner's concern.
pub trait StockLedger {
    /// Applies a deduction of `quantity` units of `item_id`.
    fn deduct(&mut self, item_id: &str, quantity: i64) -> bool;
}

/// Closures work as ledgers: `|item_id, qty| { ... true }`.
impl<F> StockLedger for F
where
    F: FnMut(&str, i64) -> bool,
{
    fn deduct(&mut self, item_id: &str, quantity: i64) -> bool {
        self(item_id, quantity)
    }
}

// =============================================================================
// Stock Pool
// =============================================================================

/// Mutable working copy of the stock list for one batch run.
///
/// The pool is the single source of availability during the batch:
/// searches read snapshots of it, finalized bills deduct from it, and the
/// invariant that no entry goes negative is enforced here.
#[derive(Debug, Clone)]
pub struct StockPool {
    entries: Vec<StockEntry>,
}

impl StockPool {
    /// Creates a pool from the collaborator's stock list.
    pub fn new(entries: Vec<StockEntry>) -> Self {
        StockPool { entries }
    }

    /// Number of entries, sellable or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the pool holds no entries at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, including blocked and out-of-stock ones.
    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    /// Looks up an entry by id.
    pub fn get(&self, item_id: &str) -> Option<&StockEntry> {
        self.entries.iter().find(|entry| entry.id == item_id)
    }

    /// Snapshot of the currently sellable entries: positive price, stock on
    /// hand, not blocked. Each search trial speculates against this
    /// snapshot; only finalized bills mutate the pool.
    pub fn sellable(&self) -> Vec<StockEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.is_sellable())
            .cloned()
            .collect()
    }

    /// Deducts `quantity` units from an entry.
    ///
    /// Fails without mutating when the entry is missing or the deduction
    /// would drive availability negative. The batch driver never trips
    /// either failure (the search only selects in-stock quantities), but
    /// the guard keeps the invariant safe for direct callers.
    pub fn deduct(&mut self, item_id: &str, quantity: i64) -> CoreResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;

        if !entry.can_deduct(quantity) {
            return Err(CoreError::InsufficientStock {
                name: entry.name.clone(),
                available: entry.available_quantity,
                requested: quantity,
            });
        }

        entry.available_quantity -= quantity;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pool() -> StockPool {
        StockPool::new(vec![
            StockEntry::new("Rice", 80, 150),
            StockEntry::new("Flour", 45, 200),
            StockEntry::new("Sugar", 60, 0),
        ])
    }

    #[test]
    fn test_sellable_filters_out_of_stock() {
        let pool = sample_pool();
        let sellable = pool.sellable();

        assert_eq!(sellable.len(), 2);
        assert!(sellable.iter().all(|entry| entry.name != "Sugar"));
    }

    #[test]
    fn test_sellable_filters_blocked() {
        let mut entries = vec![
            StockEntry::new("Rice", 80, 150),
            StockEntry::new("Ghee", 120, 20),
        ];
        entries[1].is_blocked = true;

        let pool = StockPool::new(entries);
        let sellable = pool.sellable();

        assert_eq!(sellable.len(), 1);
        assert_eq!(sellable[0].name, "Rice");
    }

    #[test]
    fn test_deduct_reduces_availability() {
        let mut pool = sample_pool();
        let rice_id = pool.entries()[0].id.clone();

        pool.deduct(&rice_id, 2).unwrap();
        assert_eq!(pool.get(&rice_id).unwrap().available_quantity, 148);
    }

    #[test]
    fn test_deduct_never_goes_negative() {
        let mut pool = StockPool::new(vec![StockEntry::new("Salt", 20, 1)]);
        let salt_id = pool.entries()[0].id.clone();

        let err = pool.deduct(&salt_id, 2).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(pool.get(&salt_id).unwrap().available_quantity, 1);
    }

    #[test]
    fn test_deduct_unknown_item() {
        let mut pool = sample_pool();
        let err = pool.deduct("no-such-id", 1).unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound(_)));
    }

    #[test]
    fn test_closure_is_a_ledger() {
        let mut seen: Vec<(String, i64)> = Vec::new();
        let mut ledger = |item_id: &str, quantity: i64| {
            seen.push((item_id.to_string(), quantity));
            true
        };

        assert!(StockLedger::deduct(&mut ledger, "abc", 2));
        assert_eq!(seen.len(), 1);
    }
}
