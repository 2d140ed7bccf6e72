use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{read_object, GitObject, Loadable, ObjectKind};

/// Raw bytes of a file, stored verbatim.
#[derive(Debug)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Blob { data }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data =
            fs::read(path).with_context(|| format!("Failed to read file {}", path.display()))?;
        Ok(Blob::new(data))
    }
}

impl GitObject for Blob {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Blob
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

impl Loadable for Blob {
    fn load(hash: &str, objects_dir: &Path) -> Result<Self> {
        let (kind, payload) = read_object(objects_dir, hash)?;
        if kind != ObjectKind::Blob {
            return Err(anyhow::anyhow!("Object {} is a {}, not a blob", hash, kind));
        }
        Ok(Blob::new(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Storable;
    use tempfile::tempdir;

    #[test]
    fn test_blob_hash_matches_git() -> Result<()> {
        let blob = Blob::new(b"hi\n".to_vec());
        assert_eq!(blob.hash()?, "32f95c3cf70b7aa19ca88912c84d0cbf7d9e62ae");
        Ok(())
    }

    #[test]
    fn test_blob_save_load() -> Result<()> {
        let dir = tempdir()?;
        let blob = Blob::new(b"some file contents".to_vec());
        let hash = blob.save(dir.path())?;

        let loaded = Blob::load(&hash, dir.path())?;
        assert_eq!(loaded.data, b"some file contents");
        Ok(())
    }

    #[test]
    fn test_load_rejects_wrong_kind() -> Result<()> {
        let dir = tempdir()?;
        let hash = crate::objects::write_object(dir.path(), ObjectKind::Tree, b"")?;

        let result = Blob::load(&hash, dir.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a blob"));
        Ok(())
    }
}
