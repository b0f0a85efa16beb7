//! # khata-engine: Bill Synthesis for Khata Billing
//!
//! This crate turns recorded transactions into plausible itemized bills.
//! Given a transaction that declares a target total, it searches the stock
//! pool for a small set of line items whose price×quantity sum approximates
//! that target, then threads bill numbering, stock depletion and
//! anti-repetition memory across an ordered batch.
//!
//! ## Component Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Batch Synthesis Flow                             │
//! │                                                                         │
//! │  transactions ──► BatchSynthesizer                                      │
//! │                        │  (per transaction, in order)                   │
//! │                        ▼                                                │
//! │              ┌──────────────────────┐                                   │
//! │              │  CombinationSearch   │  200 shuffle-and-pack trials      │
//! │              └──────────┬───────────┘                                   │
//! │                         │ distance > ±5?                                │
//! │                         ▼                                               │
//! │              ┌──────────────────────┐                                   │
//! │              │   RetryEscalation    │  strategy A: drop exclusions      │
//! │              └──────────┬───────────┘  strategy B: premium items only   │
//! │                         ▼                                               │
//! │              ┌──────────────────────┐                                   │
//! │              │ BillNumberAllocator  │  skips blocked numbers            │
//! │              └──────────┬───────────┘                                   │
//! │                         ▼                                               │
//! │       bill finalized ── stock deducted ── ledger callback notified      │
//! │                         │                                               │
//! │                         ▼                                               │
//! │       exclusion memory := this bill's item names ──► next transaction   │
//! │                                                                         │
//! │  ProgressMonitor (injected sink) observes start / trial / completion    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - `SearchConfig`: every tunable in one place
//! - [`search`] - the 200-trial randomized combination search
//! - [`escalation`] - alternate re-searches after a tolerance breach
//! - [`allocator`] - blocked-number-aware bill numbering
//! - [`batch`] - the ordered batch driver
//! - [`pool`] - working stock view + external deduction callback seam
//! - [`telemetry`] - injected progress-monitor interface
//! - [`error`] - non-fatal anomaly taxonomy
//!
//! ## Design Principles
//!
//! 1. **Single-threaded, synchronous**: bill N's deductions must be visible
//!    to bill N+1's search, so transactions are processed strictly in order
//! 2. **Bounded heuristic**: the search is 200 shuffle-and-pack trials, not
//!    a subset-sum solver; cost is O(trials × pool size) per transaction
//! 3. **Nothing aborts a batch**: invalid targets are skipped, starved pools
//!    yield empty bills, tolerance breaches and rejected deductions are
//!    logged and recorded on the bill
//! 4. **Non-deterministic**: identical inputs may yield different
//!    bills across calls; no caller may assume reproducibility
//!
//! ## Example Usage
//!
//! ```rust
//! use std::collections::HashSet;
//! use chrono::Utc;
//! use khata_core::{PaymentMode, StockEntry, TransactionRecord};
//! use khata_engine::batch::BatchSynthesizer;
//! use khata_engine::config::SearchConfig;
//! use khata_engine::telemetry::NoopMonitor;
//!
//! let stock = vec![
//!     StockEntry::new("Rice", 80, 150),
//!     StockEntry::new("Flour", 45, 200),
//!     StockEntry::new("Sugar", 60, 100),
//! ];
//! let transactions = vec![TransactionRecord::new(
//!     Utc::now(),
//!     "Ali Traders",
//!     450,
//!     PaymentMode::Cash,
//! )];
//!
//! let mut synthesizer =
//!     BatchSynthesizer::new(SearchConfig::default(), stock, 1001, HashSet::new());
//! let mut ledger = |_item_id: &str, _quantity: i64| true;
//! let bills = synthesizer.run(&transactions, &mut ledger, &mut NoopMonitor);
//!
//! assert_eq!(bills.len(), 1);
//! assert!(bills[0].item_count() >= 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocator;
pub mod batch;
pub mod config;
pub mod error;
pub mod escalation;
pub mod pool;
pub mod search;
pub mod telemetry;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocator::BillNumberAllocator;
pub use batch::BatchSynthesizer;
pub use config::SearchConfig;
pub use error::SynthesisAnomaly;
pub use escalation::RetryEscalation;
pub use pool::{StockLedger, StockPool};
pub use search::{BillCandidate, CombinationSearch};
pub use telemetry::{LogSeverity, NoopMonitor, ProgressMonitor, TracingMonitor};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of shuffle-and-pack trials per search run.
///
/// The search always runs all of them, even after finding an exact match;
/// a later trial can only replace the best candidate by strictly improving
/// its distance.
pub const TRIALS_PER_SEARCH: u32 = 200;

/// Base tolerance: a bill within ±5 rupees of its target is acceptable.
pub const BASE_TOLERANCE_RUPEES: i64 = 5;

/// Wide-band factor applied while a trial holds fewer than the minimum
/// item count (6 × base = ±30), so the two-item minimum stays reachable
/// even when every price overshoots the remaining gap.
pub const WIDE_TOLERANCE_FACTOR: i64 = 6;

/// Bounds for the per-trial desired item count K, sampled uniformly.
pub const MIN_DESIRED_ITEMS: usize = 2;
pub const MAX_DESIRED_ITEMS: usize = 7;

/// Targets above this trigger the premium-items escalation strategy.
pub const LARGE_TARGET_FLOOR_RUPEES: i64 = 300;

/// Unit-price floor for the premium-items escalation strategy. Fewer,
/// larger-denomination items reduce rounding slack on big totals.
pub const PREMIUM_PRICE_FLOOR_RUPEES: i64 = 50;
