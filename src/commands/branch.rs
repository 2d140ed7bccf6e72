use anyhow::Result;
use colored::Colorize;

use crate::refs;
use crate::repo::Repository;

pub fn branch_command(name: Option<String>, delete: bool) -> Result<()> {
    let repo = Repository::open()?;

    match (name, delete) {
        (Some(name), true) => {
            if refs::delete_branch(&repo, &name)? {
                println!("Deleted branch '{}'", name);
            }
        }
        (None, true) => {
            return Err(anyhow::anyhow!("Branch name required for deletion"));
        }
        (Some(name), false) => {
            let commit = refs::head_commit(&repo)?
                .ok_or_else(|| anyhow::anyhow!("No commits yet"))?;
            refs::set_branch(&repo, &name, &commit)?;
            println!("Created branch '{}'", name.green());
        }
        (None, false) => {
            let current = refs::current_branch(&repo)?;
            for branch in refs::list_branches(&repo)? {
                if branch == current {
                    println!("* {}", branch.green());
                } else {
                    println!("  {}", branch);
                }
            }
        }
    }
    Ok(())
}
