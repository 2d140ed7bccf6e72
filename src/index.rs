use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The staging area: a flat mapping from repository-relative forward-slash
/// paths to blob ids, persisted as a JSON object with sorted keys.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    entries: BTreeMap<String, String>,
}

impl Index {
    /// Loads the index file. A missing or unparseable file yields an empty
    /// index rather than an error.
    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    /// Rewrites the whole index file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(&self).context("Failed to serialize index")?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write index file {}", path.display()))?;
        Ok(())
    }

    pub fn add_entry(&mut self, path: String, hash: String) {
        self.entries.insert(path, hash);
    }

    pub fn get(&self, path: &str) -> Option<&String> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let index = Index::load(&dir.path().join("index"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_unparseable_file_loads_empty() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("index");
        fs::write(&path, "not json at all")?;

        let index = Index::load(&path);
        assert!(index.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_load_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("index");

        let mut index = Index::default();
        index.add_entry("src/main.rs".to_string(), "a".repeat(40));
        index.add_entry("readme".to_string(), "b".repeat(40));
        index.save(&path)?;

        let loaded = Index::load(&path);
        assert_eq!(loaded.entries(), index.entries());
        Ok(())
    }

    #[test]
    fn test_keys_serialized_in_sorted_order() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("index");

        let mut index = Index::default();
        index.add_entry("zzz".to_string(), "a".repeat(40));
        index.add_entry("aaa".to_string(), "b".repeat(40));
        index.save(&path)?;

        let data = fs::read_to_string(&path)?;
        let zzz = data.find("zzz").unwrap();
        let aaa = data.find("aaa").unwrap();
        assert!(aaa < zzz);
        Ok(())
    }

    #[test]
    fn test_empty_index_serializes_as_bare_object() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("index");
        Index::default().save(&path)?;

        assert_eq!(fs::read_to_string(&path)?, "{}");
        Ok(())
    }
}
