use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

use crate::index::Index;
use crate::objects::{Blob, Storable};
use crate::repo::{Repository, GIT_DIR};
use crate::worktree::normalize_path;

pub fn add_command(paths: &[String]) -> Result<()> {
    let repo = Repository::open()?;
    let mut index = Index::load(&repo.index_file());

    for raw in paths {
        let path = Path::new(raw);
        if path.is_file() {
            add_file(&repo, &mut index, path)?;
        } else if path.is_dir() {
            add_directory(&repo, &mut index, path)?;
        } else if !path.exists() {
            return Err(anyhow::anyhow!(
                "pathspec '{}' did not match any files",
                raw
            ));
        } else {
            return Err(anyhow::anyhow!(
                "'{}' is neither a regular file nor a directory",
                raw
            ));
        }
    }

    index.save(&repo.index_file())?;
    Ok(())
}

/// Hashes a file into the object store and stages it under its normalized
/// repository-relative path. Paths inside the metadata directory are
/// silently skipped.
fn add_file(repo: &Repository, index: &mut Index, path: &Path) -> Result<()> {
    let Some(key) = normalize_path(path) else {
        return Ok(());
    };

    let blob = Blob::from_file(path)?;
    let hash = blob.save(&repo.objects_dir())?;
    index.add_entry(key, hash);
    Ok(())
}

fn add_directory(repo: &Repository, index: &mut Index, dir: &Path) -> Result<()> {
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != GIT_DIR)
    {
        let entry = entry.context("Failed to read directory entry")?;
        if entry.file_type().is_file() {
            add_file(repo, index, entry.path())?;
        }
    }
    Ok(())
}
