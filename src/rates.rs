//! Referral bonus rates.
//!
//! Rates are stored in basis points (1/100th of a percent) so the bonus is
//! computed with integer arithmetic: `floor(base * bps / 10_000)`. The table is
//! plain data injected at ledger construction; adding an action type with a new
//! rate is a data change, not a code change.

use std::collections::HashMap;

use crate::model::ActionType;

/// Scale of a full (100%) rate in basis points.
const BPS_SCALE: u128 = 10_000;

/// Referral bonus rate table, mapping action types to basis points.
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: HashMap<ActionType, u32>,
}

impl RateTable {
    /// Build a table from explicit (action, basis points) pairs.
    ///
    /// Actions absent from the table fall back to the `Other` rate; if `Other`
    /// itself is absent, the fallback rate is 0.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ActionType, u32)>) -> Self {
        Self {
            rates: pairs.into_iter().collect(),
        }
    }

    /// Basis points for an action, falling back to the `Other` rate.
    pub fn basis_points(&self, action: ActionType) -> u32 {
        self.rates
            .get(&action)
            .or_else(|| self.rates.get(&ActionType::Other))
            .copied()
            .unwrap_or(0)
    }

    /// Referral bonus for an action: `floor(base * rate)`, truncating toward
    /// zero, never rounding up. Pure and deterministic.
    pub fn bonus(&self, action: ActionType, base: u64) -> u64 {
        let bps = self.basis_points(action) as u128;
        (base as u128 * bps / BPS_SCALE) as u64
    }
}

impl Default for RateTable {
    /// The standard rate table: enrollment 20%, social post 10%, tech module
    /// 15%, spend multiplier 25%, coffee wall 5%, other 10%.
    fn default() -> Self {
        Self::from_pairs([
            (ActionType::Enrollment, 2_000),
            (ActionType::SocialPost, 1_000),
            (ActionType::TechModule, 1_500),
            (ActionType::SpendMultiplier, 2_500),
            (ActionType::CoffeeWall, 500),
            (ActionType::Other, 1_000),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_standard_rates() {
        let rates = RateTable::default();
        assert_eq!(rates.basis_points(ActionType::Enrollment), 2_000);
        assert_eq!(rates.basis_points(ActionType::SocialPost), 1_000);
        assert_eq!(rates.basis_points(ActionType::TechModule), 1_500);
        assert_eq!(rates.basis_points(ActionType::SpendMultiplier), 2_500);
        assert_eq!(rates.basis_points(ActionType::CoffeeWall), 500);
        assert_eq!(rates.basis_points(ActionType::Other), 1_000);
    }

    #[test]
    fn bonus_is_floor_of_base_times_rate() {
        let rates = RateTable::default();
        assert_eq!(rates.bonus(ActionType::Enrollment, 150), 30);
        assert_eq!(rates.bonus(ActionType::SocialPost, 100), 10);
        assert_eq!(rates.bonus(ActionType::TechModule, 100), 15);
        assert_eq!(rates.bonus(ActionType::SpendMultiplier, 100), 25);
        assert_eq!(rates.bonus(ActionType::CoffeeWall, 100), 5);
        assert_eq!(rates.bonus(ActionType::Other, 100), 10);
    }

    #[test]
    fn bonus_truncates_toward_zero() {
        let rates = RateTable::default();
        // floor(19 * 0.05) = floor(0.95) = 0
        assert_eq!(rates.bonus(ActionType::CoffeeWall, 19), 0);
        // floor(7 * 0.15) = floor(1.05) = 1
        assert_eq!(rates.bonus(ActionType::TechModule, 7), 1);
        // floor(99 * 0.10) = floor(9.9) = 9
        assert_eq!(rates.bonus(ActionType::Other, 99), 9);
    }

    #[test]
    fn zero_base_yields_zero_bonus() {
        let rates = RateTable::default();
        assert_eq!(rates.bonus(ActionType::Enrollment, 0), 0);
        assert_eq!(rates.bonus(ActionType::SpendMultiplier, 0), 0);
    }

    #[test]
    fn missing_action_falls_back_to_other_rate() {
        let rates = RateTable::from_pairs([(ActionType::Other, 1_000)]);
        assert_eq!(rates.basis_points(ActionType::Enrollment), 1_000);
        assert_eq!(rates.bonus(ActionType::Enrollment, 150), 15);
    }

    #[test]
    fn empty_table_yields_zero() {
        let rates = RateTable::from_pairs([]);
        assert_eq!(rates.bonus(ActionType::Enrollment, 1_000), 0);
    }

    #[test]
    fn large_base_does_not_overflow() {
        let rates = RateTable::default();
        assert_eq!(
            rates.bonus(ActionType::SpendMultiplier, u64::MAX),
            u64::MAX / 4
        );
    }
}
