//! Save/load collaborators: builds as JSON records, progress as checksummed
//! binary.

pub mod json_store;
pub mod progress_save;
pub mod schema;
pub mod store;

pub use json_store::JsonBuildStore;
pub use progress_save::ProgressSaveManager;
pub use schema::BuildRecord;
pub use store::{BuildStore, MemoryBuildStore};

use crate::core::constants::DATA_DIR_NAME;
use crate::error::StoreError;
use std::fs;
use std::path::PathBuf;

/// `~/.xiuxian`, created if needed.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let home_dir = dirs::home_dir().ok_or(StoreError::NoDataDir)?;
    let dir = home_dir.join(DATA_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
