use anyhow::{Context, Result};
use chrono::DateTime;
use colored::Colorize;

use crate::objects::{Commit, Loadable};
use crate::refs;
use crate::repo::Repository;

/// Walks history from the current branch's commit, following first parents,
/// printing at most `count` entries.
pub fn log_command(count: usize) -> Result<()> {
    let repo = Repository::open()?;
    let mut current = refs::head_commit(&repo)?;

    if current.is_none() {
        println!("{}", "No commits yet".yellow());
        return Ok(());
    }

    let mut shown = 0;
    while let Some(hash) = current {
        if shown >= count {
            break;
        }

        let commit = Commit::load(&hash, &repo.objects_dir())?;
        if shown > 0 {
            println!();
        }
        print_commit(&hash, &commit)?;

        current = commit.parents.first().cloned();
        shown += 1;
    }

    Ok(())
}

fn print_commit(hash: &str, commit: &Commit) -> Result<()> {
    let date = DateTime::from_timestamp(commit.timestamp, 0)
        .with_context(|| format!("Commit {} has an invalid timestamp", hash))?;

    println!("{} {}", "commit".yellow(), hash.yellow());
    println!("Author: {}", commit.author);
    println!("Date:   {}", date.format("%a %b %e %H:%M:%S %Y +0000"));
    println!();
    for line in commit.message.lines() {
        println!("    {}", line);
    }
    Ok(())
}
