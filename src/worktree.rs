use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

use crate::objects::{Blob, Loadable, Tree};
use crate::repo::{Repository, GIT_DIR};

/// Converts a repository-relative path to the forward-slash form used as an
/// index key. Returns `None` for paths that touch the metadata directory.
pub fn normalize_path(path: &Path) -> Option<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::Normal(segment) => {
                let segment = segment.to_str()?;
                if segment == GIT_DIR {
                    return None;
                }
                segments.push(segment);
            }
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Enumerates every regular file under the working directory, skipping the
/// metadata directory, as sorted repository-relative forward-slash paths.
pub fn working_files(repo: &Repository) -> Result<Vec<String>> {
    let root = repo.workdir();
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != GIT_DIR)
    {
        let entry = entry.context("Failed to read directory entry")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .context("Walked outside the working directory")?;
        if let Some(path) = normalize_path(relative) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Materializes a stored tree under `dir`: blobs become files (parents
/// created as needed), subtrees become directories restored recursively.
pub fn restore_tree(repo: &Repository, tree_hash: &str, dir: &Path) -> Result<()> {
    let tree = Tree::load(tree_hash, &repo.objects_dir())?;

    for entry in tree.entries {
        let path = dir.join(&entry.name);
        if entry.is_tree() {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory {}", path.display()))?;
            restore_tree(repo, &entry.hash, &path)?;
        } else {
            let blob = Blob::load(&entry.hash, &repo.objects_dir())?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, &blob.data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }
    Ok(())
}

/// Deletes each path that exists as a regular file. Missing paths are
/// ignored and directories are never removed, so emptied parents stay
/// behind.
pub fn clear_files<'a>(repo: &Repository, paths: impl IntoIterator<Item = &'a String>) -> Result<()> {
    for path in paths {
        let full = repo.workdir().join(path);
        if full.is_file() {
            fs::remove_file(&full)
                .with_context(|| format!("Failed to remove {}", full.display()))?;
        }
    }
    Ok(())
}
