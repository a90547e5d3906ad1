use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an entry came to be part of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrigin {
    Direct,
    Drawn,
    Triggered,
}

impl SelectionOrigin {
    /// Only directly chosen entries may be removed.
    pub fn is_removable(&self) -> bool {
        matches!(self, SelectionOrigin::Direct)
    }
}

/// Stored choices for one category. Holds direct and drawn entries only;
/// triggered entries are derived from attributes on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    entries: BTreeMap<String, SelectionOrigin>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn origin(&self, id: &str) -> Option<SelectionOrigin> {
        self.entries.get(id).copied()
    }

    /// Records a stored choice. Triggered origins are never stored.
    pub(crate) fn insert(&mut self, id: &str, origin: SelectionOrigin) {
        debug_assert!(origin != SelectionOrigin::Triggered);
        self.entries.insert(id.to_string(), origin);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<SelectionOrigin> {
        self.entries.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SelectionOrigin)> {
        self.entries.iter().map(|(id, origin)| (id.as_str(), *origin))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row of a selection view: a stored or triggered entry with its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedEntry {
    pub id: String,
    pub name: String,
    pub origin: SelectionOrigin,
    pub cost: i32,
}
