use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use super::{read_object, GitObject, Loadable, ObjectKind, Storable};

/// Mode string for a regular-file entry.
pub const MODE_FILE: &str = "100644";
/// Mode string for a subdirectory entry. The leading zero is not emitted.
pub const MODE_DIR: &str = "40000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: String,
    pub name: String,
    /// 40-hex id of the child blob or tree.
    pub hash: String,
}

impl TreeEntry {
    /// Subdirectory entries are written as `40000` but `040000` is accepted
    /// on read.
    pub fn is_tree(&self) -> bool {
        self.mode.trim_start_matches('0').starts_with("40")
    }
}

/// An ordered directory listing.
///
/// Entries stay sorted ascending by raw name bytes; that ordering is the
/// sole source of hash determinism for trees, so every insertion re-sorts.
#[derive(Debug, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
        self.entries
            .sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
    }
}

impl GitObject for Tree {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Tree
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        for entry in &self.entries {
            payload.extend_from_slice(format!("{} {}\0", entry.mode, entry.name).as_bytes());
            let raw = hex::decode(&entry.hash)
                .with_context(|| format!("Invalid entry hash for {}", entry.name))?;
            payload.extend_from_slice(&raw);
        }
        Ok(payload)
    }
}

impl Loadable for Tree {
    fn load(hash: &str, objects_dir: &Path) -> Result<Self> {
        let (kind, payload) = read_object(objects_dir, hash)?;
        if kind != ObjectKind::Tree {
            return Err(anyhow::anyhow!("Object {} is a {}, not a tree", hash, kind));
        }
        Tree::parse(&payload)
    }
}

impl Tree {
    /// Parses a tree payload: repeated `"<mode> <name>\0"` + 20 raw id bytes.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < payload.len() {
            let null_pos = payload[pos..]
                .iter()
                .position(|&b| b == 0)
                .context("Malformed tree entry: no null byte")?;

            let meta = std::str::from_utf8(&payload[pos..pos + null_pos])
                .context("Malformed tree entry: non-UTF-8 metadata")?;
            let (mode, name) = meta
                .split_once(' ')
                .context("Malformed tree entry: no space in metadata")?;

            pos += null_pos + 1;
            if pos + 20 > payload.len() {
                return Err(anyhow::anyhow!("Malformed tree entry: truncated id"));
            }
            let hash = hex::encode(&payload[pos..pos + 20]);
            pos += 20;

            entries.push(TreeEntry {
                mode: mode.to_string(),
                name: name.to_string(),
                hash,
            });
        }

        Ok(Tree { entries })
    }
}

/// Builds the tree-of-trees for a flat `path -> blob id` mapping and returns
/// the root tree id.
///
/// Entries are grouped by their first path segment: segments with no further
/// components become file leaves, the rest become subtrees built
/// recursively. With `write` set every tree is stored; otherwise only ids
/// are computed, which is how commit decides whether anything changed
/// before touching the store.
pub fn build_tree(
    entries: &BTreeMap<String, String>,
    objects_dir: &Path,
    write: bool,
) -> Result<String> {
    let mut files: Vec<(String, String)> = Vec::new();
    let mut dirs: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

    for (path, hash) in entries {
        match path.split_once('/') {
            None => files.push((path.clone(), hash.clone())),
            Some((dir, rest)) => {
                dirs.entry(dir.to_string())
                    .or_default()
                    .insert(rest.to_string(), hash.clone());
            }
        }
    }

    for (name, _) in &files {
        if dirs.contains_key(name) {
            return Err(anyhow::anyhow!(
                "Malformed index: '{}' is staged as both a file and a directory",
                name
            ));
        }
    }

    let mut tree = Tree::new();
    for (name, hash) in files {
        tree.add_entry(TreeEntry {
            mode: MODE_FILE.to_string(),
            name,
            hash,
        });
    }
    for (name, sub_entries) in dirs {
        let sub_hash = build_tree(&sub_entries, objects_dir, write)?;
        tree.add_entry(TreeEntry {
            mode: MODE_DIR.to_string(),
            name,
            hash: sub_hash,
        });
    }

    if write {
        tree.save(objects_dir)
    } else {
        tree.hash()
    }
}

/// Flattens a stored tree back into a `path -> blob id` mapping with
/// forward-slash paths, the inverse of [`build_tree`].
pub fn flatten_tree(tree_hash: &str, objects_dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    flatten_into(tree_hash, objects_dir, "", &mut out)?;
    Ok(out)
}

fn flatten_into(
    tree_hash: &str,
    objects_dir: &Path,
    prefix: &str,
    out: &mut BTreeMap<String, String>,
) -> Result<()> {
    let tree = Tree::load(tree_hash, objects_dir)?;
    for entry in tree.entries {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", prefix, entry.name)
        };
        if entry.is_tree() {
            flatten_into(&entry.hash, objects_dir, &path, out)?;
        } else {
            out.insert(path, entry.hash);
        }
    }
    Ok(())
}
