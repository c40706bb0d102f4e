//! Lazy, cached view over one pack directory inside an extracted index.
//!
//! Every derived field is read at most once. Setters replace the cached
//! value outright so callers (and tests) can inject state without touching
//! the filesystem.
use crate::error::ScanError;
use crate::report::PackSummary;
use crate::timestamp::parse_timestamp;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const METADATA_FILE_NAME: &str = "metadata.json";

pub type Metadata = Map<String, Value>;

/// Cached outcome of looking for `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataPath {
    Found(PathBuf),
    Missing,
}

impl MetadataPath {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            MetadataPath::Found(path) => Some(path),
            MetadataPath::Missing => None,
        }
    }
}

#[derive(Debug)]
pub struct IndexPack {
    path: PathBuf,
    id: String,
    metadata_path: Option<MetadataPath>,
    metadata: Option<Metadata>,
    name: Option<Option<String>>,
    created: Option<Option<String>>,
    price: Option<Value>,
    is_private_pack: Option<bool>,
}

impl IndexPack {
    pub fn new(path: impl Into<PathBuf>, id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id: id.into(),
            metadata_path: None,
            metadata: None,
            name: None,
            created: None,
            price: None,
            is_private_pack: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata_path(&mut self) -> Option<&Path> {
        if self.metadata_path.is_none() {
            let candidate = self.path.join(METADATA_FILE_NAME);
            let resolved = if candidate.is_file() {
                MetadataPath::Found(candidate)
            } else {
                tracing::error!(
                    pack = %self.id,
                    "metadata.json file was not found for pack: {}",
                    self.id
                );
                MetadataPath::Missing
            };
            self.metadata_path = Some(resolved);
        }
        self.metadata_path.as_ref().and_then(MetadataPath::as_path)
    }

    pub fn set_metadata_path(&mut self, path: Option<PathBuf>) {
        self.metadata_path = Some(match path {
            Some(path) => MetadataPath::Found(path),
            None => MetadataPath::Missing,
        });
    }

    pub fn metadata(&mut self) -> &Metadata {
        if self.metadata.is_none() {
            let loaded = match self.metadata_path() {
                Some(path) => load_metadata(path),
                None => Metadata::new(),
            };
            self.metadata = Some(loaded);
        }
        self.metadata.get_or_insert_with(Metadata::new)
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = Some(metadata);
    }

    pub fn name(&mut self) -> Option<&str> {
        if self.name.is_none() {
            let name = self.display_field("name");
            self.name = Some(name);
        }
        self.name.as_ref().and_then(|name| name.as_deref())
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = Some(name);
    }

    pub fn created(&mut self) -> Option<&str> {
        if self.created.is_none() {
            let created = self.string_field("created");
            self.created = Some(created);
        }
        self.created.as_ref().and_then(|created| created.as_deref())
    }

    pub fn set_created(&mut self, created: Option<String>) {
        self.created = Some(created);
    }

    pub fn price(&mut self) -> &Value {
        if self.price.is_none() {
            let price = self
                .metadata()
                .get("price")
                .cloned()
                .unwrap_or_else(|| Value::from(0));
            self.price = Some(price);
        }
        self.price.get_or_insert_with(|| Value::from(0))
    }

    pub fn set_price(&mut self, price: impl Into<Value>) {
        self.price = Some(price.into());
    }

    pub fn is_private_pack(&mut self) -> bool {
        if let Some(private) = self.is_private_pack {
            return private;
        }
        let private = self.metadata().get("partnerId").is_some_and(is_truthy);
        self.is_private_pack = Some(private);
        private
    }

    pub fn set_is_private_pack(&mut self, is_private_pack: bool) {
        self.is_private_pack = Some(is_private_pack);
    }

    /// True iff the pack was created strictly after `cutoff`.
    pub fn is_released_after_last_run(&mut self, cutoff: &str) -> Result<bool, ScanError> {
        let created = self.created_at()?;
        let cutoff = parse_timestamp(cutoff)?;
        Ok(created > cutoff)
    }

    /// Parsed `created`; a missing or malformed value is an error.
    pub fn created_at(&mut self) -> Result<NaiveDateTime, ScanError> {
        let id = self.id.clone();
        let created = self.created();
        tracing::debug!(pack = %id, "{id} pack was created at {}", created.unwrap_or("None"));
        match created {
            Some(created) => parse_timestamp(created),
            None => Err(ScanError::MissingCreated { pack_id: id }),
        }
    }

    pub fn to_summary(&mut self) -> PackSummary {
        PackSummary {
            name: self.name().map(str::to_string),
            id: self.id.clone(),
            is_private_pack: self.is_private_pack(),
            price: self.price().clone(),
        }
    }

    // Non-string scalars are shown as their JSON text; null means absent.
    fn display_field(&mut self, key: &str) -> Option<String> {
        match self.metadata().get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    fn string_field(&mut self, key: &str) -> Option<String> {
        self.metadata()
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

fn load_metadata(path: &Path) -> Metadata {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "read pack metadata failed");
            return Metadata::new();
        }
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::debug!(path = %path.display(), "pack metadata is not a JSON object");
            Metadata::new()
        }
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "parse pack metadata failed");
            Metadata::new()
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
