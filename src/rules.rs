use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Upper bound for `bust_threshold`, keeping every reachable total inside a `u8`.
pub const MAX_BUST_THRESHOLD: u8 = 64;

/// Thresholds the engine judges against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    /// A hand total at or above this value is a bust
    pub bust_threshold: u8,

    /// Exact total that ends the round on the initial deal
    pub blackjack_value: u8,

    /// Dealer keeps drawing while strictly below this value
    pub dealer_draw_threshold: u8,

    /// Apply the Ace 11 -> 1 correction to the dealer hand as well.
    /// Off by default: the dealer hand is never corrected.
    pub dealer_ace_correction: bool,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            bust_threshold: 22,
            blackjack_value: 21,
            dealer_draw_threshold: 17,
            dealer_ace_correction: false,
        }
    }
}

impl TableRules {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.bust_threshold == 0 || self.blackjack_value == 0 || self.dealer_draw_threshold == 0
        {
            return Err(EngineError::InvalidRules(
                "thresholds must be non-zero".to_string(),
            ));
        }
        if self.bust_threshold > MAX_BUST_THRESHOLD {
            return Err(EngineError::InvalidRules(format!(
                "bust threshold {} exceeds {MAX_BUST_THRESHOLD}",
                self.bust_threshold
            )));
        }
        if self.blackjack_value >= self.bust_threshold {
            return Err(EngineError::InvalidRules(format!(
                "blackjack value {} must be below the bust threshold {}",
                self.blackjack_value, self.bust_threshold
            )));
        }
        if self.dealer_draw_threshold > self.blackjack_value {
            return Err(EngineError::InvalidRules(format!(
                "dealer draw threshold {} exceeds the blackjack value {}",
                self.dealer_draw_threshold, self.blackjack_value
            )));
        }
        Ok(())
    }

    pub fn is_bust(&self, total: u8) -> bool {
        total >= self.bust_threshold
    }

    pub fn dealer_must_draw(&self, total: u8) -> bool {
        total < self.dealer_draw_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = TableRules::default();
        assert_eq!(rules.bust_threshold, 22);
        assert_eq!(rules.blackjack_value, 21);
        assert_eq!(rules.dealer_draw_threshold, 17);
        assert!(!rules.dealer_ace_correction);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_bust_is_inclusive() {
        let rules = TableRules::default();
        assert!(!rules.is_bust(21));
        assert!(rules.is_bust(22));
    }

    #[test]
    fn test_dealer_stands_on_threshold() {
        let rules = TableRules::default();
        assert!(rules.dealer_must_draw(16));
        assert!(!rules.dealer_must_draw(17));
    }

    #[test]
    fn test_invalid_blackjack_above_bust() {
        let rules = TableRules {
            blackjack_value: 22,
            ..TableRules::default()
        };
        assert!(matches!(rules.validate(), Err(EngineError::InvalidRules(_))));
    }

    #[test]
    fn test_invalid_dealer_threshold() {
        let rules = TableRules {
            dealer_draw_threshold: 25,
            ..TableRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_invalid_zero_threshold() {
        let rules = TableRules {
            dealer_draw_threshold: 0,
            ..TableRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_invalid_huge_bust_threshold() {
        let rules = TableRules {
            bust_threshold: 200,
            ..TableRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_partial_rules_from_json() {
        let rules: TableRules = serde_json::from_str(r#"{"dealer_draw_threshold": 16}"#).unwrap();
        assert_eq!(rules.dealer_draw_threshold, 16);
        assert_eq!(rules.bust_threshold, 22);
    }
}
