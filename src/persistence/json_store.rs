use super::data_dir;
use super::schema::BuildRecord;
use super::store::{record_for_save, sort_recent_first, BuildStore};
use crate::build::{BuildId, CharacterBuild};
use crate::error::StoreError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One pretty-printed JSON file per build, named `<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonBuildStore {
    dir: PathBuf,
}

impl JsonBuildStore {
    /// Store under `~/.xiuxian/builds`.
    pub fn new() -> Result<Self, StoreError> {
        Self::with_dir(data_dir()?.join("builds"))
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids are used as file names, so only uuid-like ids resolve.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{id}.json")))
    }

    fn read_record(path: &Path) -> Result<BuildRecord, StoreError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl BuildStore for JsonBuildStore {
    fn save_build(&mut self, build: &CharacterBuild) -> Result<BuildId, StoreError> {
        let (id, record) = record_for_save(build);
        let path = self
            .path_for(&id)
            .ok_or_else(|| StoreError::MalformedBuild(format!("unusable build id '{id}'")))?;
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json)?;
        info!(build_id = %id, path = %path.display(), "build saved");
        Ok(id)
    }

    fn load_build(&self, id: &str) -> Result<CharacterBuild, StoreError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let record = match Self::read_record(&path) {
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()));
            }
            other => other?,
        };
        record.into_build()
    }

    /// Unreadable or malformed files are skipped with a warning.
    fn list_builds(&self) -> Result<Vec<CharacterBuild>, StoreError> {
        let mut builds = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_record(&path).and_then(BuildRecord::into_build) {
                Ok(build) => builds.push(build),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable build"),
            }
        }
        sort_recent_first(&mut builds);
        debug!(count = builds.len(), "listed builds");
        Ok(builds)
    }

    fn delete_build(&mut self, id: &str) -> Result<(), StoreError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(build_id = %id, "build deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildSession;
    use crate::catalog::Catalog;
    use crate::core::RulesConfig;
    use tempfile::TempDir;

    fn sample() -> CharacterBuild {
        let catalog = Catalog::builtin();
        let config = RulesConfig::default();
        let mut session = BuildSession::new(&catalog, &config, "liang_pin").unwrap();
        session.set_name("紫灵").unwrap();
        session.select("ling_mu").unwrap();
        session.finalize().unwrap()
    }

    #[test]
    fn test_round_trip_through_files() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonBuildStore::with_dir(dir.path()).unwrap();
        let build = sample();

        let id = store.save_build(&build).unwrap();
        assert!(dir.path().join(format!("{id}.json")).exists());
        assert_eq!(store.load_build(&id).unwrap(), build);
    }

    #[test]
    fn test_list_skips_corrupted_files() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonBuildStore::with_dir(dir.path()).unwrap();
        store.save_build(&sample()).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("anonymous.json"), r#"{"name": "x"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list_builds().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_and_hostile_ids_are_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonBuildStore::with_dir(dir.path()).unwrap();
        assert!(matches!(store.load_build("nope"), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.load_build("../etc/passwd"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete_build("nope"), Err(StoreError::NotFound(_))));
    }
}
