//! # Search Configuration
//!
//! Every tunable of the synthesis engine in one struct.
//!
//! ## Tunables At A Glance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SearchConfig Defaults                             │
//! │                                                                         │
//! │  trials ................ 200   full trials per search, no early exit   │
//! │  base_tolerance ........ ±5    acceptable |achieved − target|          │
//! │  wide_tolerance ........ ±30   band while below the item minimum       │
//! │  min_line_items ........ 2     hard minimum per bill (when feasible)   │
//! │  max_line_quantity ..... 2     per-line quantity cap                   │
//! │  desired item count K .. 2..7  sampled uniformly per trial             │
//! │  large_target_floor .... 300   targets above this may escalate to      │
//! │  premium_price_floor ... 50    ... items priced above this             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use khata_core::error::ValidationError;
use khata_core::money::Money;
use khata_core::validation::ValidationResult;
use khata_core::{MAX_LINE_QUANTITY, MIN_BILL_ITEMS};

use crate::{
    BASE_TOLERANCE_RUPEES, LARGE_TARGET_FLOOR_RUPEES, MAX_DESIRED_ITEMS, MIN_DESIRED_ITEMS,
    PREMIUM_PRICE_FLOOR_RUPEES, TRIALS_PER_SEARCH, WIDE_TOLERANCE_FACTOR,
};

// =============================================================================
// Search Configuration
// =============================================================================

/// Configuration for the combination search, escalation and batch driver.
///
/// The defaults are the production values; tests occasionally narrow them
/// (fewer trials for statistical loops, different tolerances for boundary
/// cases).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Shuffle-and-pack trials per search run.
    pub trials: u32,

    /// Acceptable |achieved − target| on a finished bill.
    pub base_tolerance: Money,

    /// Band applied while a trial holds fewer than `min_line_items`.
    pub wide_tolerance: Money,

    /// Hard minimum line items per bill, enforced whenever the pool allows.
    pub min_line_items: usize,

    /// Per-line quantity cap.
    pub max_line_quantity: i64,

    /// Lower bound of the per-trial desired item count K.
    pub min_desired_items: usize,

    /// Upper bound of the per-trial desired item count K.
    pub max_desired_items: usize,

    /// Targets above this floor enable the premium-items retry strategy.
    pub large_target_floor: Money,

    /// Unit-price floor used by the premium-items retry strategy.
    pub premium_price_floor: Money,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            trials: TRIALS_PER_SEARCH,
            base_tolerance: Money::from_rupees(BASE_TOLERANCE_RUPEES),
            wide_tolerance: Money::from_rupees(BASE_TOLERANCE_RUPEES * WIDE_TOLERANCE_FACTOR),
            min_line_items: MIN_BILL_ITEMS,
            max_line_quantity: MAX_LINE_QUANTITY,
            min_desired_items: MIN_DESIRED_ITEMS,
            max_desired_items: MAX_DESIRED_ITEMS,
            large_target_floor: Money::from_rupees(LARGE_TARGET_FLOOR_RUPEES),
            premium_price_floor: Money::from_rupees(PREMIUM_PRICE_FLOOR_RUPEES),
        }
    }
}

impl SearchConfig {
    /// Creates a config with a custom base tolerance, keeping the wide band
    /// at its 6× relation.
    pub fn with_base_tolerance(tolerance: Money) -> Self {
        SearchConfig {
            base_tolerance: tolerance,
            wide_tolerance: tolerance * WIDE_TOLERANCE_FACTOR,
            ..SearchConfig::default()
        }
    }

    /// Creates a config with a custom trial count.
    pub fn with_trials(trials: u32) -> Self {
        SearchConfig {
            trials,
            ..SearchConfig::default()
        }
    }

    /// Checks the config for values the search cannot work with.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.trials == 0 {
            return Err(ValidationError::MustBePositive {
                field: "trials".to_string(),
            });
        }

        if !self.base_tolerance.is_positive() || !self.wide_tolerance.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "tolerance".to_string(),
            });
        }

        if self.wide_tolerance < self.base_tolerance {
            return Err(ValidationError::OutOfRange {
                field: "wide_tolerance".to_string(),
                min: self.base_tolerance.rupees(),
                max: i64::MAX,
            });
        }

        if self.min_line_items == 0 {
            return Err(ValidationError::MustBePositive {
                field: "min_line_items".to_string(),
            });
        }

        if self.max_line_quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "max_line_quantity".to_string(),
            });
        }

        if self.min_desired_items > self.max_desired_items {
            return Err(ValidationError::OutOfRange {
                field: "min_desired_items".to_string(),
                min: 1,
                max: self.max_desired_items as i64,
            });
        }

        if self.min_desired_items < self.min_line_items {
            return Err(ValidationError::OutOfRange {
                field: "min_desired_items".to_string(),
                min: self.min_line_items as i64,
                max: self.max_desired_items as i64,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trials, 200);
        assert_eq!(config.base_tolerance, Money::from_rupees(5));
        assert_eq!(config.wide_tolerance, Money::from_rupees(30));
        assert_eq!(config.min_desired_items, 2);
        assert_eq!(config.max_desired_items, 7);
    }

    #[test]
    fn test_with_base_tolerance_keeps_wide_relation() {
        let config = SearchConfig::with_base_tolerance(Money::from_rupees(10));
        assert_eq!(config.wide_tolerance, Money::from_rupees(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_trials() {
        let config = SearchConfig::with_trials(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_item_bounds() {
        let config = SearchConfig {
            min_desired_items: 8,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_tolerance() {
        let config = SearchConfig {
            base_tolerance: Money::zero(),
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wide_band_below_base() {
        let config = SearchConfig {
            wide_tolerance: Money::from_rupees(2),
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
