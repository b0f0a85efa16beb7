//! # khata-core: Pure Domain Model for Khata Billing
//!
//! This crate is the shared vocabulary of Khata Billing. It contains the
//! domain types and business rules as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Khata Billing Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Application Shell                        │   │
//! │  │    Stock CRUD ──► Transaction Entry ──► Bill Review ──► Print   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    khata-engine                                 │   │
//! │  │    Combination search, retry escalation, batch synthesis        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ khata-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────────┐              │   │
//! │  │   │   types   │  │   money   │  │  validation   │              │   │
//! │  │   │ StockEntry│  │   Money   │  │    rules      │              │   │
//! │  │   │ Bill, Txn │  │  (rupees) │  │    checks     │              │   │
//! │  │   └───────────┘  └───────────┘  └───────────────┘              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (StockEntry, TransactionRecord, GeneratedBill)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole rupees (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use khata_core::money::Money;
//! use khata_core::types::{BillLineItem, StockEntry};
//!
//! let rice = StockEntry::new("Rice", 80, 150);
//!
//! // A line snapshots the item's name and price at bill time
//! let line = BillLineItem::snapshot(&rice, 2);
//! assert_eq!(line.line_total(), Money::from_rupees(160));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use khata_core::Money` instead of
// `use khata_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum number of distinct line items a synthesized bill must carry.
///
/// ## Business Reason
/// A one-line bill looks machine-generated. Two or more lines read like a
/// real shop purchase, so the engine forces at least two whenever the stock
/// pool makes that possible.
pub const MIN_BILL_ITEMS: usize = 2;

/// Maximum quantity of a single item on a synthesized bill line.
///
/// ## Business Reason
/// Large quantities of one item are conspicuous on a counter bill. Capping
/// at 2 keeps bills plausible and spreads consumption across the stock pool.
pub const MAX_LINE_QUANTITY: i64 = 2;
