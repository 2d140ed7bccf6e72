use anyhow::Result;
use std::path::Path;

use crate::repo::{Repository, GIT_DIR};

pub fn init_command() -> Result<()> {
    if Repository::init(Path::new("."))? {
        println!("Initialized empty repository in {}", GIT_DIR);
    } else {
        println!("Repository already initialized");
    }
    Ok(())
}
