use anyhow::{Context, Result};
use std::fs;

use crate::repo::Repository;

/// Branch checked out after `init`.
pub const DEFAULT_BRANCH: &str = "master";

/// Returned by [`current_branch`] when HEAD is not a symbolic reference.
/// This engine never writes such a HEAD but tolerates one on read.
pub const DETACHED_HEAD: &str = "HEAD";

/// Reads the branch name out of the symbolic HEAD.
pub fn current_branch(repo: &Repository) -> Result<String> {
    let content = fs::read_to_string(repo.head_file()).context("Failed to read HEAD file")?;

    match content.strip_prefix("ref: refs/heads/") {
        Some(name) => Ok(name.trim().to_string()),
        None => Ok(DETACHED_HEAD.to_string()),
    }
}

/// Points HEAD at a branch, born or not.
pub fn set_head(repo: &Repository, branch: &str) -> Result<()> {
    fs::write(repo.head_file(), format!("ref: refs/heads/{}\n", branch))
        .context("Failed to write HEAD file")?;
    Ok(())
}

/// Returns the commit id a branch points at, or `None` for a branch whose
/// ref file does not exist yet (an unborn branch).
pub fn branch_commit(repo: &Repository, name: &str) -> Result<Option<String>> {
    let ref_path = repo.heads_dir().join(name);
    if !ref_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&ref_path)
        .with_context(|| format!("Failed to read ref for branch '{}'", name))?;
    Ok(Some(content.trim().to_string()))
}

/// Overwrites a branch ref with a commit id.
pub fn set_branch(repo: &Repository, name: &str, commit_hash: &str) -> Result<()> {
    let ref_path = repo.heads_dir().join(name);
    if let Some(parent) = ref_path.parent() {
        fs::create_dir_all(parent).context("Failed to create refs directory")?;
    }
    fs::write(&ref_path, format!("{}\n", commit_hash))
        .with_context(|| format!("Failed to update ref for branch '{}'", name))?;
    Ok(())
}

/// Removes a branch ref. Returns whether it existed.
pub fn delete_branch(repo: &Repository, name: &str) -> Result<bool> {
    let ref_path = repo.heads_dir().join(name);
    if !ref_path.exists() {
        return Ok(false);
    }
    fs::remove_file(&ref_path)
        .with_context(|| format!("Failed to delete ref for branch '{}'", name))?;
    Ok(true)
}

/// Lists branch names in sorted order.
pub fn list_branches(repo: &Repository) -> Result<Vec<String>> {
    let heads = repo.heads_dir();
    if !heads.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&heads).context("Failed to read refs/heads")? {
        let entry = entry?;
        if entry.path().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Commit id of the current branch, or `None` before the first commit.
pub fn head_commit(repo: &Repository) -> Result<Option<String>> {
    let branch = current_branch(repo)?;
    branch_commit(repo, &branch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = Repository::at(dir.path());
        (dir, repo)
    }

    #[test]
    fn test_head_names_default_branch() -> Result<()> {
        let (_dir, repo) = test_repo();
        assert_eq!(current_branch(&repo)?, "master");
        Ok(())
    }

    #[test]
    fn test_non_symbolic_head_tolerated() -> Result<()> {
        let (_dir, repo) = test_repo();
        fs::write(repo.head_file(), format!("{}\n", "a".repeat(40)))?;
        assert_eq!(current_branch(&repo)?, DETACHED_HEAD);
        Ok(())
    }

    #[test]
    fn test_branch_write_read_round_trip() -> Result<()> {
        let (_dir, repo) = test_repo();
        let hash = "d".repeat(40);

        set_branch(&repo, "feature", &hash)?;
        assert_eq!(branch_commit(&repo, "feature")?, Some(hash.clone()));

        let raw = fs::read_to_string(repo.heads_dir().join("feature"))?;
        assert_eq!(raw, format!("{}\n", hash));
        Ok(())
    }

    #[test]
    fn test_unborn_branch_reads_none() -> Result<()> {
        let (_dir, repo) = test_repo();
        assert_eq!(branch_commit(&repo, "master")?, None);
        assert_eq!(head_commit(&repo)?, None);
        Ok(())
    }

    #[test]
    fn test_list_branches_sorted() -> Result<()> {
        let (_dir, repo) = test_repo();
        set_branch(&repo, "zeta", &"1".repeat(40))?;
        set_branch(&repo, "alpha", &"2".repeat(40))?;
        set_branch(&repo, "master", &"3".repeat(40))?;

        assert_eq!(list_branches(&repo)?, vec!["alpha", "master", "zeta"]);
        Ok(())
    }

    #[test]
    fn test_delete_branch_reports_presence() -> Result<()> {
        let (_dir, repo) = test_repo();
        set_branch(&repo, "gone", &"4".repeat(40))?;

        assert!(delete_branch(&repo, "gone")?);
        assert!(!delete_branch(&repo, "gone")?);
        Ok(())
    }
}
