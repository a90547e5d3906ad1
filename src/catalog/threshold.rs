//! Attribute-triggered entries.
//!
//! Membership is a pure function of the current attributes. Nothing is
//! recorded when an entry appears or disappears; callers re-evaluate instead.

use super::registry::Catalog;
use super::types::{CatalogEntry, Category};
use crate::character::Attributes;

pub struct ThresholdEngine;

impl ThresholdEngine {
    /// Every threshold entry (traits first, then skills, in catalog order)
    /// whose band contains the current attribute value.
    pub fn evaluate<'c>(catalog: &'c Catalog, attrs: &Attributes) -> Vec<&'c CatalogEntry> {
        Category::ALL
            .iter()
            .flat_map(|category| catalog.list_triggered(*category, attrs))
            .collect()
    }

    /// Ids granted under `after` but not `before`, and ids lost.
    pub fn diff<'c>(
        catalog: &'c Catalog,
        before: &Attributes,
        after: &Attributes,
    ) -> (Vec<&'c str>, Vec<&'c str>) {
        let old = Self::evaluate(catalog, before);
        let new = Self::evaluate(catalog, after);
        let gained = new
            .iter()
            .copied()
            .filter(|e| !old.iter().any(|o| o.id == e.id))
            .map(|e| e.id.as_str())
            .collect();
        let lost = old
            .iter()
            .copied()
            .filter(|e| !new.iter().any(|n| n.id == e.id))
            .map(|e| e.id.as_str())
            .collect();
        (gained, lost)
    }
}
