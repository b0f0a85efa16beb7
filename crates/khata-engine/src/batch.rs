//! # Batch Synthesis
//!
//! Drives the search, escalation and allocator across an ordered list of
//! transactions, threading stock depletion and anti-repetition memory.
//!
//! ## Per-Transaction Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Batch Loop (strictly in order)                       │
//! │                                                                         │
//! │  1. target ≤ 0 ──► skip: no bill, no side effects, logged              │
//! │  2. search the current pool with the previous bill's exclusion set     │
//! │  3. distance > ±5 ──► escalation, keep the better candidate            │
//! │  4. assemble the bill (allocated number + transaction metadata)        │
//! │  5. deduct every line from the pool, notify the ledger callback        │
//! │  6. telemetry completion event                                         │
//! │  7. exclusion memory := this bill's item names; number advances        │
//! │                                                                         │
//! │  Ordering is required, not incidental: bill N's deductions must be     │
//! │  visible to bill N+1's search, because both read the same per-item     │
//! │  availability counters.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The exclusion memory is an explicit accumulator threaded through the
//! loop, not shared mutable state, so the search stays pure and testable
//! in isolation.

use std::collections::HashSet;

use rand::Rng;
use tracing::{error, info, warn};
use uuid::Uuid;

use khata_core::types::{GeneratedBill, StockEntry, TransactionRecord};

use crate::allocator::BillNumberAllocator;
use crate::config::SearchConfig;
use crate::error::SynthesisAnomaly;
use crate::escalation::RetryEscalation;
use crate::pool::{StockLedger, StockPool};
use crate::search::CombinationSearch;
use crate::telemetry::ProgressMonitor;

// =============================================================================
// Batch Synthesizer
// =============================================================================

/// Processes an ordered transaction list into an ordered bill list.
///
/// Owns the working stock pool and the bill number allocator for the
/// duration of a batch; the search and escalation components are stateless
/// and shared across transactions.
pub struct BatchSynthesizer {
    config: SearchConfig,
    pool: StockPool,
    allocator: BillNumberAllocator,
}

impl BatchSynthesizer {
    /// Creates a synthesizer over the collaborator's stock list.
    ///
    /// `starting_number` seeds the allocator; `blocked_numbers` holds the
    /// bill numbers that must never be assigned.
    pub fn new(
        config: SearchConfig,
        stock: Vec<StockEntry>,
        starting_number: i64,
        blocked_numbers: HashSet<i64>,
    ) -> Self {
        BatchSynthesizer {
            config,
            pool: StockPool::new(stock),
            allocator: BillNumberAllocator::new(starting_number, blocked_numbers),
        }
    }

    /// The working pool, reflecting every deduction finalized so far.
    pub fn pool(&self) -> &StockPool {
        &self.pool
    }

    /// Runs the batch with the process-wide RNG.
    pub fn run(
        &mut self,
        transactions: &[TransactionRecord],
        ledger: &mut dyn StockLedger,
        monitor: &mut dyn ProgressMonitor,
    ) -> Vec<GeneratedBill> {
        self.run_with_rng(&mut rand::thread_rng(), transactions, ledger, monitor)
    }

    /// Runs the batch with an injected RNG.
    ///
    /// One transaction's full search and finalization completes before the
    /// next begins; every transaction is attempted exactly once and nothing
    /// aborts the batch.
    pub fn run_with_rng<R: Rng>(
        &mut self,
        rng: &mut R,
        transactions: &[TransactionRecord],
        ledger: &mut dyn StockLedger,
        monitor: &mut dyn ProgressMonitor,
    ) -> Vec<GeneratedBill> {
        let search = CombinationSearch::new(self.config.clone());
        let escalation = RetryEscalation::new(self.config.clone());

        let mut bills: Vec<GeneratedBill> = Vec::with_capacity(transactions.len());
        let mut previous_items: HashSet<String> = HashSet::new();
        let mut skipped = 0usize;
        let mut breaches = 0usize;
        let mut rejections = 0usize;

        for transaction in transactions {
            if !transaction.is_billable() {
                let anomaly = SynthesisAnomaly::InvalidTarget {
                    transaction_id: transaction.id.clone(),
                    target: transaction.target_total(),
                };
                warn!(%anomaly, customer = %transaction.customer_name, "transaction skipped");
                skipped += 1;
                continue;
            }

            let run_id = Uuid::new_v4().to_string();
            let bill_number = self.allocator.assign();
            let target = transaction.target_total();
            monitor.bill_started(&run_id, bill_number, target);

            // Trials speculate against a snapshot; only the finalized bill
            // commits deductions below.
            let snapshot = self.pool.sellable();
            let mut candidate =
                search.run(rng, target, &snapshot, &previous_items, &run_id, monitor);

            if !candidate.is_within(self.config.base_tolerance) {
                candidate = escalation.refine(
                    rng,
                    target,
                    &snapshot,
                    &previous_items,
                    candidate,
                    &run_id,
                    monitor,
                );
            }

            if candidate.is_empty() {
                let anomaly = SynthesisAnomaly::StarvedPool {
                    bill_number,
                    minimum: self.config.min_line_items,
                };
                warn!(%anomaly, "emitting empty bill");
            } else if !candidate.is_within(self.config.base_tolerance) {
                let anomaly = SynthesisAnomaly::ToleranceBreach {
                    bill_number,
                    difference: candidate.distance,
                    tolerance: self.config.base_tolerance,
                };
                warn!(%anomaly, "tolerance breach stands");
                breaches += 1;
            }

            let bill =
                GeneratedBill::assemble(bill_number, transaction, candidate.line_items.clone());

            // Finalized deductions: pool first (bill N+1 must see them),
            // then the owner's ledger. No rollback on either path.
            for line in &bill.line_items {
                if let Err(err) = self.pool.deduct(&line.item_id, line.quantity) {
                    error!(%err, bill_number, item = %line.name, "pool deduction failed");
                }
                if !ledger.deduct(&line.item_id, line.quantity) {
                    let anomaly = SynthesisAnomaly::DeductionRejected {
                        bill_number,
                        item_name: line.name.clone(),
                        quantity: line.quantity,
                    };
                    warn!(%anomaly, "bill stands as computed");
                    rejections += 1;
                }
            }

            let outcome = if candidate.is_empty() {
                None
            } else {
                Some(&candidate)
            };
            monitor.bill_completed(&run_id, outcome, self.config.trials);

            previous_items = bill.item_names().into_iter().collect();
            info!(
                bill_number,
                customer = %bill.customer_name,
                achieved = %bill.achieved_total(),
                difference = %bill.difference(),
                items = bill.item_count(),
                "bill synthesized"
            );
            bills.push(bill);
        }

        info!(
            bills = bills.len(),
            skipped, breaches, rejections, "batch finished"
        );
        bills
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
