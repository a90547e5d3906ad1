use crate::build::sanitize_name;
use crate::core::constants::PROGRESS_SAVE_MAGIC;
use crate::error::StoreError;
use crate::progression::Cultivator;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Saves and loads cultivation progress in a checksummed binary format, one
/// file per build.
pub struct ProgressSaveManager {
    dir: PathBuf,
}

impl ProgressSaveManager {
    /// Uses the platform config directory (via the `directories` crate).
    pub fn new() -> Result<Self, StoreError> {
        let project_dirs = ProjectDirs::from("", "", "xiuxian").ok_or(StoreError::NoDataDir)?;
        Self::with_dir(project_dirs.config_dir().join("progress"))
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn save_path(&self, build_id: &str) -> PathBuf {
        let stem = sanitize_name(build_id);
        let stem = if stem.is_empty() { "default".to_string() } else { stem };
        self.dir.join(format!("{stem}.dat"))
    }

    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - bincode-encoded `Cultivator` (variable length)
    /// - SHA256 over all of the above (32 bytes)
    pub fn save(&self, cultivator: &Cultivator) -> Result<(), StoreError> {
        let data = bincode::serialize(cultivator)?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(PROGRESS_SAVE_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let path = self.save_path(&cultivator.build_id);
        let mut file = fs::File::create(&path)?;
        file.write_all(&PROGRESS_SAVE_MAGIC.to_le_bytes())?;
        file.write_all(&data_len.to_le_bytes())?;
        file.write_all(&data)?;
        file.write_all(&checksum)?;

        info!(build_id = %cultivator.build_id, stage = %cultivator.stage(), "progress saved");
        Ok(())
    }

    pub fn load(&self, build_id: &str) -> Result<Cultivator, StoreError> {
        let path = self.save_path(build_id);
        if !path.exists() {
            return Err(StoreError::NotFound(build_id.to_string()));
        }
        let mut file = fs::File::open(&path)?;

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != PROGRESS_SAVE_MAGIC {
            return Err(StoreError::BadMagic {
                expected: PROGRESS_SAVE_MAGIC,
                found: version,
            });
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        if stored_checksum != hasher.finalize().as_slice() {
            return Err(StoreError::ChecksumMismatch);
        }

        Ok(bincode::deserialize(&data)?)
    }

    pub fn exists(&self, build_id: &str) -> bool {
        self.save_path(build_id).exists()
    }

    pub fn delete(&self, build_id: &str) -> Result<(), StoreError> {
        let path = self.save_path(build_id);
        if !path.exists() {
            return Err(StoreError::NotFound(build_id.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::core::RulesConfig;
    use crate::progression::RealmStage;
    use tempfile::TempDir;

    fn progressed() -> Cultivator {
        let catalog = Catalog::builtin();
        let config = RulesConfig::default();
        let mut cultivator = Cultivator::new(RealmStage::new(0, 1).unwrap());
        cultivator.build_id = "0b5c1c9e-test".to_string();
        cultivator.learn_skill("qing_yuan_jian_jue", &catalog).unwrap();
        cultivator.award(2_000);
        cultivator
            .upgrade_skill("qing_yuan_jian_jue", &catalog, &config)
            .unwrap();
        cultivator.advance_realm(&config).unwrap();
        cultivator
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let manager = ProgressSaveManager::with_dir(dir.path()).unwrap();
        let cultivator = progressed();

        assert!(!manager.exists(&cultivator.build_id));
        manager.save(&cultivator).unwrap();
        assert!(manager.exists(&cultivator.build_id));
        assert_eq!(manager.load(&cultivator.build_id).unwrap(), cultivator);
    }

    #[test]
    fn test_tampered_file_fails_checksum() {
        let dir = TempDir::new().unwrap();
        let manager = ProgressSaveManager::with_dir(dir.path()).unwrap();
        let cultivator = progressed();
        manager.save(&cultivator).unwrap();

        let path = manager.save_path(&cultivator.build_id);
        let mut bytes = fs::read(&path).unwrap();
        bytes[14] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        assert!(matches!(
            manager.load(&cultivator.build_id),
            Err(StoreError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_wrong_magic_is_rejected() {
        let dir = TempDir::new().unwrap();
        let manager = ProgressSaveManager::with_dir(dir.path()).unwrap();
        fs::write(manager.save_path("x"), [0u8; 64]).unwrap();
        assert!(matches!(
            manager.load("x"),
            Err(StoreError::BadMagic { found: 0, .. })
        ));
    }

    #[test]
    fn test_missing_save_is_not_found() {
        let dir = TempDir::new().unwrap();
        let manager = ProgressSaveManager::with_dir(dir.path()).unwrap();
        assert!(matches!(manager.load("nobody"), Err(StoreError::NotFound(_))));
        assert!(matches!(manager.delete("nobody"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_stage_outside_ladder_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let manager = ProgressSaveManager::with_dir(dir.path()).unwrap();
        let mut cultivator = progressed();
        cultivator.realm.stage = RealmStage { major: 9, minor: 0 };
        manager.save(&cultivator).unwrap();

        assert!(matches!(
            manager.load(&cultivator.build_id),
            Err(StoreError::Codec(_))
        ));
    }
}
