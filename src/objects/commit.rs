use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

use super::{read_object, GitObject, Loadable, ObjectKind};

/// A snapshot: the root tree id plus metadata and parent links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub tree: String,
    /// Parent commit ids in order; the first is the previous commit on the
    /// branch and the one history traversal follows.
    pub parents: Vec<String>,
    pub author: String,
    pub committer: String,
    /// Unix seconds; the timezone is always written as `+0000`.
    pub timestamp: i64,
    pub message: String,
}

impl Commit {
    pub fn new(tree: String, parents: Vec<String>, author: String, message: String) -> Self {
        Self {
            tree,
            parents,
            committer: author.clone(),
            author,
            timestamp: Utc::now().timestamp(),
            message,
        }
    }

    /// Parses a commit payload.
    ///
    /// Identity lines are split on spaces from the right: the last token is
    /// the timezone (discarded), the penultimate is the Unix timestamp, and
    /// everything before is the free-form identity. Identities that
    /// themselves end in ` <digits> +0000` would be misparsed; that
    /// limitation is inherited from the modeled format.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(payload).context("Commit payload is not UTF-8")?;

        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;
        let mut timestamp = None;
        let mut message = Vec::new();
        let mut reading_message = false;

        for line in content.lines() {
            if reading_message {
                message.push(line);
                continue;
            }
            if line.is_empty() {
                reading_message = true;
                continue;
            }

            let (key, value) = line
                .split_once(' ')
                .context("Malformed commit header line")?;
            match key {
                "tree" => tree = Some(value.to_string()),
                "parent" => parents.push(value.to_string()),
                "author" => {
                    let (identity, seconds) = parse_identity(value)?;
                    author = Some(identity);
                    timestamp = Some(seconds);
                }
                "committer" => {
                    let (identity, _) = parse_identity(value)?;
                    committer = Some(identity);
                }
                other => return Err(anyhow::anyhow!("Unknown commit field: {}", other)),
            }
        }

        let author = author.context("Commit has no author line")?;
        Ok(Self {
            tree: tree.context("Commit has no tree line")?,
            parents,
            committer: committer.unwrap_or_else(|| author.clone()),
            author,
            timestamp: timestamp.context("Commit has no timestamp")?,
            message: message.join("\n"),
        })
    }
}

/// Splits `"<identity> <unix-seconds> <timezone>"` into identity and seconds.
fn parse_identity(value: &str) -> Result<(String, i64)> {
    let mut parts = value.rsplitn(3, ' ');
    let _timezone = parts.next();
    let seconds = parts
        .next()
        .context("Identity line has no timestamp")?
        .parse::<i64>()
        .context("Identity timestamp is not a number")?;
    let identity = parts
        .next()
        .context("Identity line has no name")?
        .to_string();
    Ok((identity, seconds))
}

impl GitObject for Commit {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Commit
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();

        payload.extend(format!("tree {}\n", self.tree).as_bytes());
        for parent in &self.parents {
            payload.extend(format!("parent {}\n", parent).as_bytes());
        }
        payload.extend(
            format!("author {} {} +0000\n", self.author, self.timestamp).as_bytes(),
        );
        payload.extend(
            format!("committer {} {} +0000\n", self.committer, self.timestamp).as_bytes(),
        );
        payload.extend(b"\n");
        payload.extend(self.message.as_bytes());
        payload.extend(b"\n");

        Ok(payload)
    }
}

impl Loadable for Commit {
    fn load(hash: &str, objects_dir: &Path) -> Result<Self> {
        let (kind, payload) = read_object(objects_dir, hash)?;
        if kind != ObjectKind::Commit {
            return Err(anyhow::anyhow!(
                "Object {} is a {}, not a commit",
                hash,
                kind
            ));
        }
        Self::parse(&payload)
    }
}
