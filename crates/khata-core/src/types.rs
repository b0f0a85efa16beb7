//! # Domain Types
//!
//! Core domain types used throughout Khata Billing.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌───────────────────┐   ┌──────────────────┐    │
//! │  │   StockEntry    │   │ TransactionRecord │   │  GeneratedBill   │    │
//! │  │  ─────────────  │   │  ───────────────  │   │  ──────────────  │    │
//! │  │  id (UUID)      │   │  id (UUID)        │   │  id (UUID)       │    │
//! │  │  name           │   │  customer_name    │   │  bill_number     │    │
//! │  │  unit_price     │   │  target_total     │   │  line_items      │    │
//! │  │  available_qty  │   │  payment_mode     │   │  achieved_total  │    │
//! │  │  is_blocked     │   │  date             │   │  difference      │    │
//! │  └─────────────────┘   └───────────────────┘   └──────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  BillLineItem   │   │  PaymentMode    │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  item snapshot  │   │  Cash / Card    │                             │
//! │  │  qty (1 or 2)   │   │  Upi / Credit   │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations
//! - Business ID: (bill_number, item name) - human-readable, shop-facing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Stock Entry
// =============================================================================

/// An inventory item available for billing.
///
/// Owned by the stock collaborator (the inventory screens and their
/// persistence); the engine reads it and deducts from it during batch
/// finalization. `available_quantity` must never go negative.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the bill.
    pub name: String,

    /// Price per unit in whole rupees. Must be positive to be billable.
    pub unit_price_rupees: i64,

    /// Units currently on hand. Never negative.
    pub available_quantity: i64,

    /// Blocked items are excluded from selection entirely
    /// (discontinued lines, items reserved for a regular customer).
    pub is_blocked: bool,
}

impl StockEntry {
    /// Creates a new unblocked stock entry with a fresh UUID.
    pub fn new(name: impl Into<String>, unit_price_rupees: i64, available_quantity: i64) -> Self {
        StockEntry {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            unit_price_rupees,
            available_quantity,
            is_blocked: false,
        }
    }

    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_rupees(self.unit_price_rupees)
    }

    /// Checks whether the entry can appear on a synthesized bill:
    /// positive price, stock on hand, not blocked.
    pub fn is_sellable(&self) -> bool {
        self.unit_price_rupees > 0 && self.available_quantity > 0 && !self.is_blocked
    }

    /// Checks whether `quantity` units can be deducted without going negative.
    pub fn can_deduct(&self, quantity: i64) -> bool {
        quantity > 0 && self.available_quantity >= quantity
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How the customer settled the transaction.
///
/// Carried through from the transaction record onto the bill unchanged;
/// the engine never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// UPI / wallet transfer.
    Upi,
    /// Udhaar - settled later on the customer's ledger page.
    Credit,
}

impl Default for PaymentMode {
    fn default() -> Self {
        PaymentMode::Cash
    }
}

// =============================================================================
// Transaction Record
// =============================================================================

/// A recorded transaction declaring the total a synthesized bill should hit.
///
/// Read-only input to the engine. A record with a non-positive target is
/// skipped during batch processing and produces no bill.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Date the transaction was taken.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    /// Customer the bill is made out to.
    pub customer_name: String,

    /// The total the synthesized bill should approximate, in whole rupees.
    pub target_total_rupees: i64,

    /// How the customer paid.
    pub payment_mode: PaymentMode,
}

impl TransactionRecord {
    /// Creates a new transaction record with a fresh UUID.
    pub fn new(
        date: DateTime<Utc>,
        customer_name: impl Into<String>,
        target_total_rupees: i64,
        payment_mode: PaymentMode,
    ) -> Self {
        TransactionRecord {
            id: Uuid::new_v4().to_string(),
            date,
            customer_name: customer_name.into(),
            target_total_rupees,
            payment_mode,
        }
    }

    /// Returns the target total as Money.
    #[inline]
    pub fn target_total(&self) -> Money {
        Money::from_rupees(self.target_total_rupees)
    }

    /// A transaction is billable only when its target is positive.
    #[inline]
    pub fn is_billable(&self) -> bool {
        self.target_total_rupees > 0
    }
}

// =============================================================================
// Bill Line Item
// =============================================================================

/// A line item on a synthesized bill.
/// Uses snapshot pattern to freeze item data at time of billing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillLineItem {
    /// Stock entry this line was drawn from.
    pub item_id: String,
    /// Item name at time of billing (frozen).
    pub name: String,
    /// Unit price in rupees at time of billing (frozen).
    pub unit_price_rupees: i64,
    /// Quantity billed (1 or 2).
    pub quantity: i64,
    /// Line total (unit_price × quantity).
    pub line_total_rupees: i64,
}

impl BillLineItem {
    /// Snapshots a stock entry into a bill line at the given quantity.
    pub fn snapshot(item: &StockEntry, quantity: i64) -> Self {
        BillLineItem {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price_rupees: item.unit_price_rupees,
            quantity,
            line_total_rupees: item.unit_price_rupees * quantity,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_rupees(self.unit_price_rupees)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_rupees(self.line_total_rupees)
    }
}

// =============================================================================
// Generated Bill
// =============================================================================

/// A synthesized bill, immutable once emitted by the engine.
///
/// ## Invariants
/// - `achieved_total_rupees` is the exact sum of line totals
/// - `difference_rupees` = |achieved − target|
/// - `bill_number` is strictly increasing across a batch and never a
///   blocked number
/// - `line_items` holds ≥2 lines whenever the stock pool allowed it;
///   a starved pool yields an empty bill that keeps the batch aligned
///   1:1 with its transactions
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeneratedBill {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Sequential shop-facing bill number.
    pub bill_number: i64,

    /// Bill date, taken from the transaction.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    /// Customer the bill is made out to.
    pub customer_name: String,

    /// Synthesized line items.
    pub line_items: Vec<BillLineItem>,

    /// Exact sum of line totals, in rupees.
    pub achieved_total_rupees: i64,

    /// |achieved − target|, in rupees.
    pub difference_rupees: i64,

    /// How the customer paid.
    pub payment_mode: PaymentMode,
}

impl GeneratedBill {
    /// Assembles a bill from synthesized line items and transaction metadata.
    ///
    /// The achieved total is recomputed here from the lines so the
    /// "achieved = exact sum of line totals" invariant cannot drift from
    /// whatever the search accumulated.
    pub fn assemble(
        bill_number: i64,
        transaction: &TransactionRecord,
        line_items: Vec<BillLineItem>,
    ) -> Self {
        let achieved: Money = line_items.iter().map(|line| line.line_total()).sum();
        let difference = achieved.abs_diff(transaction.target_total());

        GeneratedBill {
            id: Uuid::new_v4().to_string(),
            bill_number,
            date: transaction.date,
            customer_name: transaction.customer_name.clone(),
            line_items,
            achieved_total_rupees: achieved.rupees(),
            difference_rupees: difference.rupees(),
            payment_mode: transaction.payment_mode,
        }
    }

    /// Returns the achieved total as Money.
    #[inline]
    pub fn achieved_total(&self) -> Money {
        Money::from_rupees(self.achieved_total_rupees)
    }

    /// Returns the difference from target as Money.
    #[inline]
    pub fn difference(&self) -> Money {
        Money::from_rupees(self.difference_rupees)
    }

    /// Number of distinct line items.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.line_items.len()
    }

    /// True for the zero-item bill emitted when the pool was starved.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Checks the bill against a tolerance.
    pub fn is_within(&self, tolerance: Money) -> bool {
        self.difference() <= tolerance
    }

    /// Names of the items on this bill, in line order.
    ///
    /// Fed back into the next search as the anti-repetition exclusion set.
    pub fn item_names(&self) -> Vec<String> {
        self.line_items.iter().map(|line| line.name.clone()).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transaction(target: i64) -> TransactionRecord {
        TransactionRecord::new(Utc::now(), "Ali Traders", target, PaymentMode::Cash)
    }

    #[test]
    fn test_stock_entry_sellable() {
        let rice = StockEntry::new("Rice", 80, 150);
        assert!(rice.is_sellable());

        let free = StockEntry::new("Sample Pack", 0, 10);
        assert!(!free.is_sellable());

        let out = StockEntry::new("Flour", 45, 0);
        assert!(!out.is_sellable());

        let mut reserved = StockEntry::new("Ghee", 120, 20);
        reserved.is_blocked = true;
        assert!(!reserved.is_sellable());
    }

    #[test]
    fn test_stock_entry_can_deduct() {
        let sugar = StockEntry::new("Sugar", 60, 2);
        assert!(sugar.can_deduct(1));
        assert!(sugar.can_deduct(2));
        assert!(!sugar.can_deduct(3));
        assert!(!sugar.can_deduct(0));
    }

    #[test]
    fn test_line_item_snapshot() {
        let rice = StockEntry::new("Rice", 80, 150);
        let line = BillLineItem::snapshot(&rice, 2);

        assert_eq!(line.item_id, rice.id);
        assert_eq!(line.name, "Rice");
        assert_eq!(line.line_total_rupees, 160);
        assert_eq!(line.line_total(), Money::from_rupees(160));
    }

    #[test]
    fn test_transaction_billable() {
        assert!(sample_transaction(450).is_billable());
        assert!(!sample_transaction(0).is_billable());
        assert!(!sample_transaction(-20).is_billable());
    }

    #[test]
    fn test_bill_assemble_recomputes_totals() {
        let txn = sample_transaction(450);
        let rice = StockEntry::new("Rice", 80, 150);
        let flour = StockEntry::new("Flour", 45, 200);

        let bill = GeneratedBill::assemble(
            1006,
            &txn,
            vec![
                BillLineItem::snapshot(&rice, 2),
                BillLineItem::snapshot(&flour, 2),
            ],
        );

        assert_eq!(bill.bill_number, 1006);
        assert_eq!(bill.achieved_total_rupees, 250);
        assert_eq!(bill.difference_rupees, 200);
        assert_eq!(bill.item_count(), 2);
        assert_eq!(bill.customer_name, "Ali Traders");
        assert_eq!(bill.item_names(), vec!["Rice", "Flour"]);
        assert!(!bill.is_within(Money::from_rupees(5)));
    }

    #[test]
    fn test_empty_bill_difference_is_target() {
        let txn = sample_transaction(300);
        let bill = GeneratedBill::assemble(17, &txn, Vec::new());

        assert!(bill.is_empty());
        assert_eq!(bill.achieved_total_rupees, 0);
        assert_eq!(bill.difference_rupees, 300);
    }

    #[test]
    fn test_payment_mode_default() {
        assert_eq!(PaymentMode::default(), PaymentMode::Cash);
    }

    #[test]
    fn test_payment_mode_serde_snake_case() {
        let json = serde_json::to_string(&PaymentMode::Upi).unwrap();
        assert_eq!(json, "\"upi\"");
    }
}
