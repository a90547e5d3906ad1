use super::schema::BuildRecord;
use crate::build::{BuildId, CharacterBuild};
use crate::error::StoreError;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// Key-value save/load contract for finalized builds.
pub trait BuildStore {
    /// Stores `build`, assigning a fresh id when it has none. Returns the id
    /// it was stored under.
    fn save_build(&mut self, build: &CharacterBuild) -> Result<BuildId, StoreError>;

    fn load_build(&self, id: &str) -> Result<CharacterBuild, StoreError>;

    /// Every stored build, most recently updated first.
    fn list_builds(&self) -> Result<Vec<CharacterBuild>, StoreError>;

    fn delete_build(&mut self, id: &str) -> Result<(), StoreError>;
}

pub(crate) fn record_for_save(build: &CharacterBuild) -> (BuildId, BuildRecord) {
    let mut record = BuildRecord::from_build(build);
    let id = if build.id.trim().is_empty() {
        Uuid::new_v4().to_string()
    } else {
        build.id.clone()
    };
    record.id = Some(id.clone());
    (id, record)
}

pub(crate) fn sort_recent_first(builds: &mut [CharacterBuild]) {
    builds.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// In-process store. Records still go through the schema so it behaves like
/// the file store.
#[derive(Debug, Default)]
pub struct MemoryBuildStore {
    records: HashMap<BuildId, BuildRecord>,
}

impl MemoryBuildStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw record, as a file store would find it on disk.
    pub fn insert_record(&mut self, id: &str, record: BuildRecord) {
        self.records.insert(id.to_string(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl BuildStore for MemoryBuildStore {
    fn save_build(&mut self, build: &CharacterBuild) -> Result<BuildId, StoreError> {
        let (id, record) = record_for_save(build);
        self.records.insert(id.clone(), record);
        Ok(id)
    }

    fn load_build(&self, id: &str) -> Result<CharacterBuild, StoreError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .into_build()
    }

    /// Malformed records are skipped with a warning, as the file store does.
    fn list_builds(&self) -> Result<Vec<CharacterBuild>, StoreError> {
        let mut builds = Vec::with_capacity(self.records.len());
        for (id, record) in &self.records {
            match record.clone().into_build() {
                Ok(build) => builds.push(build),
                Err(e) => warn!(build_id = %id, error = %e, "skipping unreadable build"),
            }
        }
        sort_recent_first(&mut builds);
        Ok(builds)
    }

    fn delete_build(&mut self, id: &str) -> Result<(), StoreError> {
        self.records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
