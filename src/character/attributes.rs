use crate::core::constants::{
    LUCK_BASELINE, LUCK_MAX, LUCK_MIN, NUM_ATTRIBUTES, STANDARD_ATTRIBUTE_BASELINE,
    STANDARD_ATTRIBUTE_MAX, STANDARD_ATTRIBUTE_MIN,
};
use crate::error::RulesError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Constitution,
    Comprehension,
    Spirit,
    Physique,
    Agility,
    Charm,
    Luck,
}

impl AttributeType {
    pub fn all() -> [AttributeType; NUM_ATTRIBUTES] {
        [
            AttributeType::Constitution,
            AttributeType::Comprehension,
            AttributeType::Spirit,
            AttributeType::Physique,
            AttributeType::Agility,
            AttributeType::Charm,
            AttributeType::Luck,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::Constitution => "根骨",
            AttributeType::Comprehension => "悟性",
            AttributeType::Spirit => "神识",
            AttributeType::Physique => "体魄",
            AttributeType::Agility => "身法",
            AttributeType::Charm => "魅力",
            AttributeType::Luck => "气运",
        }
    }

    /// Stable key used in persisted attribute tables.
    pub fn key(&self) -> &'static str {
        match self {
            AttributeType::Constitution => "constitution",
            AttributeType::Comprehension => "comprehension",
            AttributeType::Spirit => "spirit",
            AttributeType::Physique => "physique",
            AttributeType::Agility => "agility",
            AttributeType::Charm => "charm",
            AttributeType::Luck => "luck",
        }
    }

    pub fn from_key(key: &str) -> Option<AttributeType> {
        AttributeType::all().into_iter().find(|a| a.key() == key)
    }

    pub fn index(&self) -> usize {
        match self {
            AttributeType::Constitution => 0,
            AttributeType::Comprehension => 1,
            AttributeType::Spirit => 2,
            AttributeType::Physique => 3,
            AttributeType::Agility => 4,
            AttributeType::Charm => 5,
            AttributeType::Luck => 6,
        }
    }

    pub fn is_luck(&self) -> bool {
        matches!(self, AttributeType::Luck)
    }

    /// Inclusive (min, max) range.
    pub fn range(&self) -> (i32, i32) {
        if self.is_luck() {
            (LUCK_MIN, LUCK_MAX)
        } else {
            (STANDARD_ATTRIBUTE_MIN, STANDARD_ATTRIBUTE_MAX)
        }
    }

    pub fn baseline(&self) -> i32 {
        if self.is_luck() {
            LUCK_BASELINE
        } else {
            STANDARD_ATTRIBUTE_BASELINE
        }
    }

    /// Rejects values outside the declared range before they reach the cost model.
    pub fn validate(&self, value: i32) -> Result<i32, RulesError> {
        let (min, max) = self.range();
        if value < min || value > max {
            return Err(RulesError::OutOfRange {
                attribute: *self,
                value,
                min,
                max,
            });
        }
        Ok(value)
    }

    pub fn clamp_value(&self, value: i32) -> i32 {
        let (min, max) = self.range();
        value.clamp(min, max)
    }
}

/// The seven build attributes. Values always lie within each attribute's range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    values: [i32; NUM_ATTRIBUTES],
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    /// All attributes at baseline.
    pub fn new() -> Self {
        let mut values = [0; NUM_ATTRIBUTES];
        for attr in AttributeType::all() {
            values[attr.index()] = attr.baseline();
        }
        Self { values }
    }

    pub fn get(&self, attr: AttributeType) -> i32 {
        self.values[attr.index()]
    }

    /// Sets a value after range validation; the set is untouched on error.
    pub fn set(&mut self, attr: AttributeType, value: i32) -> Result<(), RulesError> {
        self.values[attr.index()] = attr.validate(value)?;
        Ok(())
    }

    /// Copy with one attribute replaced.
    pub fn with(&self, attr: AttributeType, value: i32) -> Result<Attributes, RulesError> {
        let mut next = *self;
        next.set(attr, value)?;
        Ok(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeType, i32)> + '_ {
        AttributeType::all()
            .into_iter()
            .map(move |attr| (attr, self.get(attr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attributes_at_baseline() {
        let attrs = Attributes::new();
        for attr in AttributeType::all() {
            if attr.is_luck() {
                assert_eq!(attrs.get(attr), 0);
            } else {
                assert_eq!(attrs.get(attr), 6);
            }
        }
    }

    #[test]
    fn test_get_set() {
        let mut attrs = Attributes::new();
        attrs.set(AttributeType::Comprehension, 16).unwrap();
        assert_eq!(attrs.get(AttributeType::Comprehension), 16);
        assert_eq!(attrs.get(AttributeType::Spirit), 6);
    }

    #[test]
    fn test_set_out_of_range_leaves_value() {
        let mut attrs = Attributes::new();
        let err = attrs.set(AttributeType::Physique, 21).unwrap_err();
        assert!(matches!(
            err,
            RulesError::OutOfRange {
                attribute: AttributeType::Physique,
                value: 21,
                ..
            }
        ));
        assert_eq!(attrs.get(AttributeType::Physique), 6);
        assert!(attrs.set(AttributeType::Physique, -1).is_err());
    }

    #[test]
    fn test_luck_range_is_asymmetric() {
        let mut attrs = Attributes::new();
        assert!(attrs.set(AttributeType::Luck, -6).is_ok());
        assert!(attrs.set(AttributeType::Luck, -7).is_err());
        assert!(attrs.set(AttributeType::Luck, 14).is_ok());
        assert!(attrs.set(AttributeType::Luck, 15).is_err());
    }

    #[test]
    fn test_key_roundtrip() {
        for attr in AttributeType::all() {
            assert_eq!(AttributeType::from_key(attr.key()), Some(attr));
        }
        assert_eq!(AttributeType::from_key("strength"), None);
    }

    #[test]
    fn test_index_returns_unique_values() {
        for (i, attr) in AttributeType::all().iter().enumerate() {
            assert_eq!(attr.index(), i);
        }
    }

    #[test]
    fn test_clamp_value_stays_in_range() {
        assert_eq!(AttributeType::Luck.clamp_value(-10), -6);
        assert_eq!(AttributeType::Charm.clamp_value(99), 20);
        assert_eq!(AttributeType::Charm.clamp_value(7), 7);
    }
}
