use anyhow::{Context, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

pub mod blob;
pub mod commit;
pub mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tree::Tree;

/// The three object kinds recognized by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            "commit" => Ok(ObjectKind::Commit),
            other => Err(anyhow::anyhow!("Unknown object kind: {}", other)),
        }
    }
}

/// Payload-level behavior shared by every object kind.
///
/// The envelope (header framing, SHA-1 identity, zlib encoding) lives in
/// this module; implementors only provide their payload bytes.
pub trait GitObject {
    fn kind(&self) -> ObjectKind;

    fn serialize(&self) -> Result<Vec<u8>>;

    /// Identity of the object: hex SHA-1 over `"<kind> <len>\0" + payload`.
    fn hash(&self) -> Result<String> {
        Ok(hash_object(self.kind(), &self.serialize()?))
    }
}

pub trait Storable {
    fn save(&self, objects_dir: &Path) -> Result<String>;
}

pub trait Loadable {
    fn load(hash: &str, objects_dir: &Path) -> Result<Self>
    where
        Self: Sized;
}

impl<T: GitObject> Storable for T {
    fn save(&self, objects_dir: &Path) -> Result<String> {
        write_object(objects_dir, self.kind(), &self.serialize()?)
    }
}

/// Prepends the storage header to a payload.
fn frame(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind, payload.len());
    let mut framed = Vec::with_capacity(header.len() + payload.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(payload);
    framed
}

/// Computes the 40-hex identity of an object without storing it.
pub fn hash_object(kind: ObjectKind, payload: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(frame(kind, payload));
    format!("{:x}", hasher.finalize())
}

fn object_path(objects_dir: &Path, hash: &str) -> Result<std::path::PathBuf> {
    if hash.len() != 40 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(anyhow::anyhow!("Invalid object id: {}", hash));
    }
    Ok(objects_dir.join(&hash[..2]).join(&hash[2..]))
}

/// Writes an object to the store, returning its identity.
///
/// Objects are immutable and deduplicate by content, so an id that already
/// has a file on disk is skipped.
pub fn write_object(objects_dir: &Path, kind: ObjectKind, payload: &[u8]) -> Result<String> {
    let framed = frame(kind, payload);

    let mut hasher = Sha1::new();
    hasher.update(&framed);
    let hash = format!("{:x}", hasher.finalize());

    let path = object_path(objects_dir, &hash)?;
    if path.exists() {
        return Ok(hash);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&framed)
        .context("Failed to compress object")?;
    let compressed = encoder.finish().context("Failed to finish compression")?;

    let dir = path.parent().context("Invalid object path")?;
    fs::create_dir_all(dir).context("Failed to create object directory")?;
    fs::write(&path, compressed).with_context(|| format!("Failed to write object {}", hash))?;

    Ok(hash)
}

/// Reads an object from the store and splits it into kind and payload.
pub fn read_object(objects_dir: &Path, hash: &str) -> Result<(ObjectKind, Vec<u8>)> {
    let path = object_path(objects_dir, hash)?;
    if !path.exists() {
        return Err(anyhow::anyhow!("Object {} not found", hash));
    }

    let compressed = fs::read(&path).with_context(|| format!("Failed to read object {}", hash))?;
    let mut decoder = ZlibDecoder::new(&compressed[..]);
    let mut data = Vec::new();
    decoder
        .read_to_end(&mut data)
        .with_context(|| format!("Object {} is corrupt", hash))?;

    let null_pos = data
        .iter()
        .position(|&b| b == 0)
        .with_context(|| format!("Object {} has no header terminator", hash))?;

    let header = std::str::from_utf8(&data[..null_pos])
        .with_context(|| format!("Object {} has a non-ASCII header", hash))?;
    let kind = header
        .split(' ')
        .next()
        .with_context(|| format!("Object {} has an empty header", hash))?
        .parse::<ObjectKind>()?;

    Ok((kind, data[null_pos + 1..].to_vec()))
}
