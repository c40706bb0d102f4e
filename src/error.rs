//! Typed failures for the scan workflow.
//!
//! Callers at the CLI boundary wrap these in `anyhow`; tests match on the
//! variants directly.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed getting the file path for entry {entry_id}")]
    Lookup { entry_id: String },

    #[error("File was not found at path {}", path.display())]
    ArchiveNotFound { path: PathBuf },

    #[error("Failed creating index folder with extracted data.")]
    IndexFolderMissing,

    #[error("read index archive")]
    Archive(#[from] zip::result::ZipError),

    #[error("time data {value:?} does not match format {format:?}")]
    Timestamp {
        value: String,
        format: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("pack {pack_id} has no created timestamp")]
    MissingCreated { pack_id: String },
}
