//! Configuration for a Curio exchange instance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunable parameters fixed at exchange construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Minimum native-currency tip required to list an order.
    pub min_listing_tip: Decimal,
    /// Maximum legs accepted in a single batch execution.
    pub max_batch_legs: usize,
    /// Maximum identifiers in one order's eligible set.
    pub max_token_ids: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            // 1e-9 of the native currency: a symbolic, non-zero listing tip.
            min_listing_tip: Decimal::new(1, 9),
            max_batch_legs: constants::DEFAULT_MAX_BATCH_LEGS,
            max_token_ids: constants::DEFAULT_MAX_TOKEN_IDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tip_is_nonzero() {
        let cfg = ExchangeConfig::default();
        assert!(cfg.min_listing_tip > Decimal::ZERO);
        assert_eq!(cfg.max_batch_legs, 32);
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = ExchangeConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ExchangeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.min_listing_tip, back.min_listing_tip);
        assert_eq!(cfg.max_token_ids, back.max_token_ids);
    }
}
