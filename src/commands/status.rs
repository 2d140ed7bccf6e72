use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeMap;

use crate::index::Index;
use crate::objects::tree::flatten_tree;
use crate::objects::{hash_object, Commit, Loadable, ObjectKind};
use crate::refs;
use crate::repo::Repository;
use crate::worktree::working_files;

/// Working-directory status relative to the index and the head commit.
#[derive(Debug, Default)]
pub struct Status {
    /// Staged paths whose blob differs from (or is absent from) the head
    /// tree. The flag is true for paths the head tree does not know.
    pub staged: Vec<(String, bool)>,
    /// Tracked paths whose on-disk content differs from the staged or
    /// committed blob.
    pub not_staged: Vec<String>,
    /// Tracked paths with no file in the working directory.
    pub deleted: Vec<String>,
    /// Working files known to neither the index nor the head tree.
    pub untracked: Vec<String>,
}

pub fn status_command() -> Result<()> {
    let repo = Repository::open()?;
    let branch = refs::current_branch(&repo)?;
    let status = get_status(&repo)?;
    print_status(&branch, &status);
    Ok(())
}

pub fn get_status(repo: &Repository) -> Result<Status> {
    let index = Index::load(&repo.index_file());
    let head_tree = head_tree_index(repo);

    // Blob hash of every file on disk, computed without storing anything.
    let mut working: BTreeMap<String, String> = BTreeMap::new();
    for path in working_files(repo)? {
        let data = std::fs::read(repo.workdir().join(&path))
            .with_context(|| format!("Failed to read {}", path))?;
        working.insert(path, hash_object(ObjectKind::Blob, &data));
    }

    // What the repository currently tracks: the head snapshot overlaid with
    // staged entries, staged entries winning.
    let mut tracked = head_tree.clone();
    for (path, hash) in index.entries() {
        tracked.insert(path.clone(), hash.clone());
    }

    let mut status = Status::default();

    for (path, hash) in index.entries() {
        if head_tree.get(path) != Some(hash) {
            status
                .staged
                .push((path.clone(), !head_tree.contains_key(path)));
        }
    }

    for (path, hash) in &tracked {
        match working.get(path) {
            Some(working_hash) if working_hash != hash => {
                status.not_staged.push(path.clone());
            }
            Some(_) => {}
            None => status.deleted.push(path.clone()),
        }
    }

    for path in working.keys() {
        if !tracked.contains_key(path) {
            status.untracked.push(path.clone());
        }
    }

    Ok(status)
}

/// Flattened tree of the current branch's commit, or empty when the branch
/// is unborn. Walk failures are reported as a warning; status carries on
/// with an empty snapshot.
fn head_tree_index(repo: &Repository) -> BTreeMap<String, String> {
    let walk = || -> Result<BTreeMap<String, String>> {
        match refs::head_commit(repo)? {
            Some(hash) => {
                let commit = Commit::load(&hash, &repo.objects_dir())?;
                flatten_tree(&commit.tree, &repo.objects_dir())
            }
            None => Ok(BTreeMap::new()),
        }
    };

    match walk() {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{} {:#}", "warning: failed to walk head tree:".yellow(), e);
            BTreeMap::new()
        }
    }
}

fn print_status(branch: &str, status: &Status) {
    println!("On branch {}", branch);

    if status.staged.is_empty()
        && status.not_staged.is_empty()
        && status.deleted.is_empty()
        && status.untracked.is_empty()
    {
        println!("nothing to commit, working tree clean");
        return;
    }

    if !status.staged.is_empty() {
        println!("Changes to be committed:");
        for (path, is_new) in &status.staged {
            let label = if *is_new { "new file:" } else { "modified:" };
            println!("\t{}", format!("{:<12}{}", label, path).green());
        }
        println!();
    }

    if !status.not_staged.is_empty() || !status.deleted.is_empty() {
        println!("Changes not staged for commit:");
        for path in &status.not_staged {
            println!("\t{}", format!("{:<12}{}", "modified:", path).red());
        }
        for path in &status.deleted {
            println!("\t{}", format!("{:<12}{}", "deleted:", path).red());
        }
        println!();
    }

    if !status.untracked.is_empty() {
        println!("Untracked files:");
        for path in &status.untracked {
            println!("\t{}", path.red());
        }
        println!();
    }
}
