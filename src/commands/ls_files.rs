use anyhow::Result;

use crate::index::Index;
use crate::objects::tree::MODE_FILE;
use crate::repo::Repository;

pub fn ls_files_command(stage: bool) -> Result<()> {
    let repo = Repository::open()?;
    let index = Index::load(&repo.index_file());

    for (path, hash) in index.entries() {
        if stage {
            println!("{} {}\t{}", MODE_FILE, hash, path);
        } else {
            println!("{}", path);
        }
    }

    Ok(())
}
