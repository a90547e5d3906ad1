//! Attribute point pricing.
//!
//! A [`CostLadder`] stores marginal step prices on each side of the baseline.
//! Costs are the cumulative sums of those steps: positive above the baseline,
//! a refund (negative) below it, and zero at the baseline. Because steps are
//! non-negative, the magnitude never shrinks as a value moves away from the
//! baseline on either side.

use super::attributes::{AttributeType, Attributes};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLadder {
    pub baseline: i32,
    /// `raise_steps[i]` is the price of moving from `baseline + i` to `baseline + i + 1`.
    pub raise_steps: Vec<i32>,
    /// `lower_steps[i]` is the refund for moving from `baseline - i` to `baseline - i - 1`.
    pub lower_steps: Vec<i32>,
}

impl CostLadder {
    pub fn min_value(&self) -> i32 {
        self.baseline - self.lower_steps.len() as i32
    }

    pub fn max_value(&self) -> i32 {
        self.baseline + self.raise_steps.len() as i32
    }

    /// Cumulative cost of `value`. Callers validate the range first.
    pub fn cost(&self, value: i32) -> i32 {
        if value >= self.baseline {
            let steps = (value - self.baseline) as usize;
            self.raise_steps.iter().take(steps).sum()
        } else {
            let steps = (self.baseline - value) as usize;
            -self.lower_steps.iter().take(steps).sum::<i32>()
        }
    }

    /// Checks that the ladder is well formed for an attribute with the given
    /// baseline and inclusive range.
    pub fn validate(
        &self,
        label: &str,
        baseline: i32,
        range: (i32, i32),
    ) -> Result<(), ConfigError> {
        if self.baseline != baseline {
            return Err(ConfigError::invalid(format!(
                "{label} ladder baseline {} does not match attribute baseline {baseline}",
                self.baseline
            )));
        }
        if self.min_value() != range.0 || self.max_value() != range.1 {
            return Err(ConfigError::invalid(format!(
                "{label} ladder covers [{}, {}] but the attribute range is [{}, {}]",
                self.min_value(),
                self.max_value(),
                range.0,
                range.1
            )));
        }
        if let Some(step) = self
            .raise_steps
            .iter()
            .chain(self.lower_steps.iter())
            .find(|s| **s < 0)
        {
            return Err(ConfigError::invalid(format!(
                "{label} ladder has a negative step ({step})"
            )));
        }
        Ok(())
    }
}

/// Prices attribute values with one ladder for the six standard attributes
/// and a separate ladder for luck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeCostModel {
    pub standard: CostLadder,
    pub luck: CostLadder,
}

impl Default for AttributeCostModel {
    fn default() -> Self {
        Self {
            standard: CostLadder {
                baseline: 6,
                // 7-10: 1 each, 11-14: 2 each, 15-17: 3 each, 18-20: 4 each
                raise_steps: vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 4, 4, 4],
                lower_steps: vec![1, 1, 1, 1, 1, 1],
            },
            luck: CostLadder {
                baseline: 0,
                raise_steps: vec![2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 6, 6, 7],
                lower_steps: vec![2, 2, 1, 1, 1, 1],
            },
        }
    }
}

impl AttributeCostModel {
    pub fn ladder(&self, attr: AttributeType) -> &CostLadder {
        if attr.is_luck() {
            &self.luck
        } else {
            &self.standard
        }
    }

    pub fn cost(&self, attr: AttributeType, value: i32) -> i32 {
        self.ladder(attr).cost(value)
    }

    /// Sum of all seven attribute costs.
    pub fn total(&self, attrs: &Attributes) -> i32 {
        attrs.iter().map(|(attr, value)| self.cost(attr, value)).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let standard = AttributeType::Constitution;
        self.standard
            .validate("standard", standard.baseline(), standard.range())?;
        let luck = AttributeType::Luck;
        self.luck.validate("luck", luck.baseline(), luck.range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_costs_zero() {
        let model = AttributeCostModel::default();
        for attr in AttributeType::all() {
            assert_eq!(model.cost(attr, attr.baseline()), 0, "{:?}", attr);
        }
    }

    #[test]
    fn test_standard_ladder_values() {
        let model = AttributeCostModel::default();
        let attr = AttributeType::Comprehension;
        assert_eq!(model.cost(attr, 7), 1);
        assert_eq!(model.cost(attr, 10), 4);
        assert_eq!(model.cost(attr, 12), 8);
        assert_eq!(model.cost(attr, 20), 33);
        assert_eq!(model.cost(attr, 5), -1);
        assert_eq!(model.cost(attr, 0), -6);
    }

    #[test]
    fn test_luck_ladder_is_asymmetric() {
        let model = AttributeCostModel::default();
        assert_eq!(model.cost(AttributeType::Luck, 1), 2);
        assert_eq!(model.cost(AttributeType::Luck, -1), -2);
        assert_eq!(model.cost(AttributeType::Luck, 14), 56);
        assert_eq!(model.cost(AttributeType::Luck, -6), -8);
    }

    #[test]
    fn test_magnitude_monotonic_on_each_side() {
        let model = AttributeCostModel::default();
        for attr in AttributeType::all() {
            let (min, max) = attr.range();
            let base = attr.baseline();
            for v in base..max {
                assert!(model.cost(attr, v + 1) >= model.cost(attr, v));
            }
            for v in (min + 1..=base).rev() {
                assert!(model.cost(attr, v - 1).abs() >= model.cost(attr, v).abs());
                assert!(model.cost(attr, v - 1) <= 0);
            }
        }
    }

    #[test]
    fn test_total_sums_every_attribute() {
        let model = AttributeCostModel::default();
        let mut attrs = Attributes::new();
        assert_eq!(model.total(&attrs), 0);
        attrs.set(AttributeType::Spirit, 12).unwrap();
        attrs.set(AttributeType::Luck, -1).unwrap();
        assert_eq!(model.total(&attrs), 8 - 2);
    }

    #[test]
    fn test_default_model_validates() {
        assert!(AttributeCostModel::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_or_negative_ladders() {
        let mut model = AttributeCostModel::default();
        model.standard.raise_steps.pop();
        assert!(model.validate().is_err());

        let mut model = AttributeCostModel::default();
        model.luck.lower_steps[0] = -1;
        assert!(model.validate().is_err());
    }
}
