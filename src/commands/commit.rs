use anyhow::Result;
use colored::Colorize;

use crate::index::Index;
use crate::objects::tree::build_tree;
use crate::objects::{Commit, Loadable, Storable};
use crate::refs;
use crate::repo::Repository;

/// Identity recorded when `--author` is not given.
pub const DEFAULT_AUTHOR: &str = "PyGit user <user@pygit.com>";

/// Records the staged snapshot as a commit on the current branch.
///
/// Two situations are informational no-ops rather than errors: an empty
/// staging index, and a staged snapshot whose root tree matches the parent
/// commit's. In both cases nothing is written and the branch ref is left
/// alone. Otherwise the index is flattened into trees, the commit object is
/// stored, the branch advances and the index is cleared.
pub fn commit_command(message: &str, author: Option<String>) -> Result<()> {
    let repo = Repository::open()?;
    let mut index = Index::load(&repo.index_file());
    let branch = refs::current_branch(&repo)?;
    let parent = refs::head_commit(&repo)?;

    if index.is_empty() {
        println!("{}", "nothing to commit".yellow());
        return Ok(());
    }

    // Dry run first so an unchanged snapshot writes no tree objects.
    let root = build_tree(index.entries(), &repo.objects_dir(), false)?;
    if let Some(parent_hash) = &parent {
        let parent_commit = Commit::load(parent_hash, &repo.objects_dir())?;
        if parent_commit.tree == root {
            println!("{}", "nothing to commit".yellow());
            return Ok(());
        }
    }

    let root = build_tree(index.entries(), &repo.objects_dir(), true)?;
    let author = author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
    let commit = Commit::new(
        root,
        parent.into_iter().collect(),
        author,
        message.to_string(),
    );
    let hash = commit.save(&repo.objects_dir())?;

    refs::set_branch(&repo, &branch, &hash)?;
    index.clear();
    index.save(&repo.index_file())?;

    println!("[{} {}] {}", branch, &hash[..7], commit.message);
    Ok(())
}
