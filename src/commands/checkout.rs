use anyhow::Result;
use std::collections::BTreeMap;

use crate::index::Index;
use crate::objects::tree::flatten_tree;
use crate::objects::{Commit, Loadable};
use crate::refs;
use crate::repo::Repository;
use crate::worktree;

/// Switches to `branch`, replacing the working tree with its snapshot.
///
/// The file set reachable from the previous branch's commit is removed
/// before the target tree is materialized, so files that exist only on the
/// previous branch disappear. Uncommitted edits to tracked files are
/// discarded without a guard; `status` is the tool to consult first. The
/// staging index is reset to empty.
pub fn checkout_command(branch: &str, create: bool) -> Result<()> {
    let repo = Repository::open()?;
    let prev_branch = refs::current_branch(&repo)?;
    let prev_commit = refs::branch_commit(&repo, &prev_branch)?;

    let files_to_clear = match &prev_commit {
        Some(hash) => {
            let commit = Commit::load(hash, &repo.objects_dir())?;
            flatten_tree(&commit.tree, &repo.objects_dir())?
        }
        None => BTreeMap::new(),
    };

    let mut target_commit = refs::branch_commit(&repo, branch)?;
    if target_commit.is_none() {
        if !create {
            return Err(anyhow::anyhow!("Branch '{}' not found", branch));
        }
        match &prev_commit {
            Some(hash) => {
                refs::set_branch(&repo, branch, hash)?;
                target_commit = Some(hash.clone());
            }
            None => return Err(anyhow::anyhow!("No commits yet")),
        }
    }

    refs::set_head(&repo, branch)?;
    worktree::clear_files(&repo, files_to_clear.keys())?;

    if let Some(hash) = &target_commit {
        let commit = Commit::load(hash, &repo.objects_dir())?;
        worktree::restore_tree(&repo, &commit.tree, repo.workdir())?;
    }

    Index::default().save(&repo.index_file())?;

    println!("Switched to branch '{}'", branch);
    Ok(())
}
