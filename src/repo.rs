use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::index::Index;
use crate::refs::DEFAULT_BRANCH;

/// Name of the metadata directory at the repository root.
pub const GIT_DIR: &str = ".git";

/// Handle to a repository rooted at a working directory.
///
/// All on-disk layout decisions live here: the objects directory with its
/// two-level fan-out, the refs/heads directory, the HEAD file and the
/// staging index file are all resolved relative to `workdir`.
#[derive(Debug, Clone)]
pub struct Repository {
    workdir: PathBuf,
}

impl Repository {
    pub fn at(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Opens the repository in the current directory.
    ///
    /// Fails when there is no `.git` directory, which is the case for every
    /// command except `init`.
    pub fn open() -> Result<Self> {
        let repo = Self::at(".");
        if !repo.git_dir().is_dir() {
            return Err(anyhow::anyhow!("Not a git repository"));
        }
        Ok(repo)
    }

    /// Creates the repository skeleton under `workdir`.
    ///
    /// Returns `false` without touching anything when the metadata directory
    /// already exists, `true` after creating `.git/objects`,
    /// `.git/refs/heads`, the symbolic HEAD and an empty index.
    pub fn init(workdir: &Path) -> Result<bool> {
        let repo = Self::at(workdir);
        if repo.git_dir().exists() {
            return Ok(false);
        }

        fs::create_dir_all(repo.objects_dir()).context("Failed to create objects directory")?;
        fs::create_dir_all(repo.heads_dir()).context("Failed to create refs/heads directory")?;
        fs::write(
            repo.head_file(),
            format!("ref: refs/heads/{}\n", DEFAULT_BRANCH),
        )
        .context("Failed to write HEAD file")?;

        Index::default()
            .save(&repo.index_file())
            .context("Failed to create index file")?;

        Ok(true)
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn git_dir(&self) -> PathBuf {
        self.workdir.join(GIT_DIR)
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.git_dir().join("objects")
    }

    pub fn heads_dir(&self) -> PathBuf {
        self.git_dir().join("refs").join("heads")
    }

    pub fn head_file(&self) -> PathBuf {
        self.git_dir().join("HEAD")
    }

    pub fn index_file(&self) -> PathBuf {
        self.git_dir().join("index")
    }
}
