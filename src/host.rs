//! File lookup against the host's entry store.
//!
//! The host answers a lookup with a typed entry: either a file with a local
//! path or an error. Both resolvers here produce the same `FileEntry` so the
//! extractor never needs to know where entries came from.
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Host entry type code for error entries.
pub const ENTRY_TYPE_ERROR: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    File { path: PathBuf, name: Option<String> },
    Error { message: String },
}

pub trait FileResolver {
    fn resolve(&self, entry_id: &str) -> Result<FileEntry>;
}

/// Entry as stored by the host, e.g. `{"Type": 1, "Contents": {"path": "..."}}`.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "Type")]
    entry_type: u32,
    #[serde(rename = "Contents", default)]
    contents: Value,
}

/// Entry ids mapped to host entries, loaded from a JSON manifest.
#[derive(Debug)]
pub struct EntryManifest {
    base_dir: PathBuf,
    entries: BTreeMap<String, RawEntry>,
}

impl EntryManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("read entries manifest {}", path.display()))?;
        let entries: BTreeMap<String, RawEntry> =
            serde_json::from_slice(&bytes).context("parse entries manifest JSON")?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded entries manifest");
        Ok(Self { base_dir, entries })
    }

    fn entry_from_raw(&self, raw: &RawEntry) -> FileEntry {
        if raw.entry_type == ENTRY_TYPE_ERROR {
            let message = match &raw.contents {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return FileEntry::Error { message };
        }
        let Some(path) = raw.contents.get("path").and_then(Value::as_str) else {
            return FileEntry::Error {
                message: "entry contents have no path".to_string(),
            };
        };
        let name = raw
            .contents
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);
        FileEntry::File {
            path: self.base_dir.join(path),
            name,
        }
    }
}

impl FileResolver for EntryManifest {
    fn resolve(&self, entry_id: &str) -> Result<FileEntry> {
        Ok(match self.entries.get(entry_id) {
            Some(raw) => self.entry_from_raw(raw),
            None => FileEntry::Error {
                message: format!("no entry with id {entry_id}"),
            },
        })
    }
}

/// Treats the entry id itself as a local path.
#[derive(Debug, Default)]
pub struct LocalPathResolver;

impl FileResolver for LocalPathResolver {
    fn resolve(&self, entry_id: &str) -> Result<FileEntry> {
        let path = PathBuf::from(entry_id);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(FileEntry::File { path, name })
    }
}
