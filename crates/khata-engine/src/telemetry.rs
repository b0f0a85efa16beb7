//! # Telemetry Interface
//!
//! The injected progress-monitor seam for the synthesis engine.
//!
//! ## Event Stream
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Per-Transaction Event Stream                         │
//! │                                                                         │
//! │  bill_started(run_id, bill_number, target)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  trial_logged(run_id, trial, severity, message)   × 0..n               │
//! │       │     (new best candidates, dropped exclusion sets)              │
//! │       ▼                                                                 │
//! │  bill_completed(run_id, outcome, trials_executed)                      │
//! │                                                                         │
//! │  run_id is an opaque per-transaction UUID so a frontend can key a      │
//! │  progress row before the bill itself exists.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! - The monitor is an injected sink, never a hidden side channel, so the
//!   search runs headlessly in tests
//! - Purely observational: a monitor must never alter search outcomes
//! - `NoopMonitor` for headless runs, `TracingMonitor` to feed the log
//!   stream, custom impls for frontend progress dialogs

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use khata_core::money::Money;

use crate::search::BillCandidate;

// =============================================================================
// Log Severity
// =============================================================================

/// Severity of a trial-level log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSeverity {
    /// Progress notes (a trial improved the best candidate).
    Info,
    /// Degraded-mode notes (exclusion set dropped, forced minimum fill).
    Warning,
    /// Conditions worth surfacing prominently.
    Error,
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSeverity::Info => write!(f, "info"),
            LogSeverity::Warning => write!(f, "warning"),
            LogSeverity::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Progress Monitor
// =============================================================================

/// Passive sink for synthesis progress events.
///
/// One implementation is wired in per batch run; the engine calls it
/// synchronously, so implementations should be cheap and must not panic.
pub trait ProgressMonitor {
    /// A transaction run began: the bill number is already assigned and the
    /// search is about to start.
    fn bill_started(&mut self, run_id: &str, bill_number: i64, target: Money);

    /// A trial-level note from inside a search run.
    fn trial_logged(&mut self, run_id: &str, trial: u32, severity: LogSeverity, message: &str);

    /// The run finished. `outcome` is `None` when the pool was starved and
    /// the bill will be empty; `trials_executed` is the full trial budget,
    /// since the search never exits early.
    fn bill_completed(&mut self, run_id: &str, outcome: Option<&BillCandidate>, trials_executed: u32);
}

// =============================================================================
// Noop Monitor
// =============================================================================

/// Monitor that discards every event. The default for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl ProgressMonitor for NoopMonitor {
    fn bill_started(&mut self, _run_id: &str, _bill_number: i64, _target: Money) {}

    fn trial_logged(&mut self, _run_id: &str, _trial: u32, _severity: LogSeverity, _message: &str) {}

    fn bill_completed(
        &mut self,
        _run_id: &str,
        _outcome: Option<&BillCandidate>,
        _trials_executed: u32,
    ) {
    }
}

// =============================================================================
// Tracing Monitor
// =============================================================================

/// Monitor that forwards events into the `tracing` log stream.
///
/// Useful wiring for deployments without a frontend progress dialog: the
/// event stream lands in the same place as the engine's own logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMonitor;

impl ProgressMonitor for TracingMonitor {
    fn bill_started(&mut self, run_id: &str, bill_number: i64, target: Money) {
        info!(run_id, bill_number, %target, "bill synthesis started");
    }

    fn trial_logged(&mut self, run_id: &str, trial: u32, severity: LogSeverity, message: &str) {
        match severity {
            LogSeverity::Info => debug!(run_id, trial, message, "trial"),
            LogSeverity::Warning | LogSeverity::Error => warn!(run_id, trial, message, "trial"),
        }
    }

    fn bill_completed(
        &mut self,
        run_id: &str,
        outcome: Option<&BillCandidate>,
        trials_executed: u32,
    ) {
        match outcome {
            Some(candidate) => info!(
                run_id,
                trials_executed,
                achieved = %candidate.achieved_total,
                distance = %candidate.distance,
                items = candidate.line_items.len(),
                "bill synthesis completed"
            ),
            None => warn!(run_id, trials_executed, "bill synthesis completed empty"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(LogSeverity::Info.to_string(), "info");
        assert_eq!(LogSeverity::Warning.to_string(), "warning");
        assert_eq!(LogSeverity::Error.to_string(), "error");
    }

    #[test]
    fn test_severity_serde_snake_case() {
        let json = serde_json::to_string(&LogSeverity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn test_noop_monitor_accepts_events() {
        let mut monitor = NoopMonitor;
        monitor.bill_started("run-1", 1001, Money::from_rupees(450));
        monitor.trial_logged("run-1", 3, LogSeverity::Info, "improved");
        monitor.bill_completed("run-1", None, 200);
    }
}
