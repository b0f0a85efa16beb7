//! # Anomaly Taxonomy
//!
//! Non-fatal conditions observed during a batch run.
//!
//! ## Why Anomalies, Not Errors
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Batch Anomaly Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  InvalidTarget  │  │   StarvedPool   │  │    ToleranceBreach      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  target ≤ 0     │  │  < 2 sellable   │  │  |achieved − target|    │ │
//! │  │  txn skipped,   │  │  items; empty   │  │  > ±5 after escalation; │ │
//! │  │  no bill        │  │  bill emitted   │  │  bill emitted anyway    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────┐                                               │
//! │  │  DeductionRejected  │   ledger callback returned false; the bill    │
//! │  │                     │   stands as computed and the divergence is    │
//! │  │                     │   left to the stock owner to reconcile        │
//! │  └─────────────────────┘                                               │
//! │                                                                         │
//! │  None of these aborts the batch. Every transaction is attempted        │
//! │  exactly once; anomalies are logged with full context and counted.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use khata_core::money::Money;
use thiserror::Error;

/// A non-fatal condition recorded while synthesizing a batch.
///
/// ## Design Principles
/// - Each variant includes enough context to find the affected bill
/// - Anomalies are logged and surfaced through telemetry, never thrown
#[derive(Debug, Error)]
pub enum SynthesisAnomaly {
    /// Transaction target is zero or negative; skipped without a bill.
    #[error("transaction {transaction_id} skipped: target total {target} is not billable")]
    InvalidTarget {
        transaction_id: String,
        target: Money,
    },

    /// Fewer than the minimum sellable items remain; an empty bill keeps
    /// the output aligned 1:1 with the input transactions.
    #[error("bill {bill_number}: fewer than {minimum} sellable items in pool, emitting empty bill")]
    StarvedPool { bill_number: i64, minimum: usize },

    /// Best candidate still misses the target by more than the tolerance
    /// after escalation; the bill carries the actual difference.
    #[error("bill {bill_number}: difference {difference} exceeds tolerance {tolerance}")]
    ToleranceBreach {
        bill_number: i64,
        difference: Money,
        tolerance: Money,
    },

    /// The external stock ledger refused a deduction. The bill is already
    /// final; bill contents and true stock state now diverge.
    #[error("bill {bill_number}: stock ledger rejected deduction of {quantity} x {item_name}")]
    DeductionRejected {
        bill_number: i64,
        item_name: String,
        quantity: i64,
    },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_messages() {
        let anomaly = SynthesisAnomaly::ToleranceBreach {
            bill_number: 1006,
            difference: Money::from_rupees(80),
            tolerance: Money::from_rupees(5),
        };
        assert_eq!(
            anomaly.to_string(),
            "bill 1006: difference Rs 80 exceeds tolerance Rs 5"
        );

        let anomaly = SynthesisAnomaly::DeductionRejected {
            bill_number: 1007,
            item_name: "Rice".to_string(),
            quantity: 2,
        };
        assert_eq!(
            anomaly.to_string(),
            "bill 1007: stock ledger rejected deduction of 2 x Rice"
        );
    }
}
