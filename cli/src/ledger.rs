//! Ledger snapshot file handling.

use anyhow::Context;
use cohort_store_mem::MemStore;
use std::fs;
use std::path::Path;

/// Load the ledger at `path`, or start an empty one if the file is missing.
pub fn load(path: &Path) -> anyhow::Result<MemStore> {
    if !path.exists() {
        tracing::info!("no ledger at {}, starting empty", path.display());
        return Ok(MemStore::new());
    }
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    MemStore::restore(&bytes).with_context(|| format!("decoding ledger {}", path.display()))
}

/// Write the ledger to `path` via a temporary file and a rename.
pub fn save(path: &Path, store: &MemStore) -> anyhow::Result<()> {
    let bytes = store.snapshot()?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    tracing::debug!(bytes = bytes.len(), "ledger saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_store_mem::MemStore;

    #[test]
    fn missing_file_is_an_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = load(&dir.path().join("ledger.bin")).unwrap();
        assert_eq!(store.snapshot().unwrap(), MemStore::new().snapshot().unwrap());
    }

    #[test]
    fn save_then_load_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");
        let store = MemStore::new();
        save(&path, &store).unwrap();
        assert!(!path.with_extension("tmp").exists());
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.snapshot().unwrap(), store.snapshot().unwrap());
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");
        fs::write(&path, b"\xff\xff\xff").unwrap();
        assert!(load(&path).is_err());
    }
}
