//! Index archive extraction.
//!
//! The archive is unpacked into a per-invocation scratch directory that
//! must end up holding a top-level `index/` folder.
use crate::error::ScanError;
use crate::host::{FileEntry, FileResolver};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INDEX_DIR_NAME: &str = "index";
const SCRATCH_PREFIX: &str = "new-packs-";

/// Where extraction scratch space lives and whether it outlives the run.
#[derive(Debug, Clone, Default)]
pub struct ScratchOptions {
    pub root: Option<PathBuf>,
    pub keep: bool,
}

/// An unpacked index. The scratch directory goes away on drop unless kept.
#[derive(Debug)]
pub struct ExtractedIndex {
    scratch: TempDir,
    index_dir: PathBuf,
}

impl ExtractedIndex {
    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }
}

/// Resolve `entry_id` to an archive and unpack it.
pub fn extract_index(
    resolver: &dyn FileResolver,
    entry_id: &str,
    scratch: &ScratchOptions,
) -> Result<ExtractedIndex> {
    let archive_path = archive_path_for(resolver, entry_id)?;

    let scratch_dir = create_scratch(scratch)?;
    let index_dir = scratch_dir.path().join(INDEX_DIR_NAME);

    if !archive_path.exists() {
        let err = ScanError::ArchiveNotFound { path: archive_path };
        tracing::error!("{err}");
        return Err(err.into());
    }
    tracing::debug!(path = %archive_path.display(), "found index archive");
    unpack_zip(&archive_path, scratch_dir.path())?;
    tracing::debug!(index_dir = %index_dir.display(), "extracted index archive");

    if !index_dir.is_dir() {
        let err = ScanError::IndexFolderMissing;
        tracing::error!("{err}");
        return Err(err.into());
    }

    Ok(ExtractedIndex {
        scratch: scratch_dir,
        index_dir,
    })
}

fn archive_path_for(resolver: &dyn FileResolver, entry_id: &str) -> Result<PathBuf> {
    match resolver.resolve(entry_id)? {
        FileEntry::File { path, name } => {
            tracing::debug!(entry_id, name = name.as_deref().unwrap_or(""), "resolved index entry");
            Ok(path)
        }
        FileEntry::Error { message } => {
            tracing::error!(entry_id, %message, "file lookup failed");
            Err(ScanError::Lookup {
                entry_id: entry_id.to_string(),
            }
            .into())
        }
    }
}

fn create_scratch(options: &ScratchOptions) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(SCRATCH_PREFIX).keep(options.keep);
    let dir = match &options.root {
        Some(root) => {
            fs::create_dir_all(root).with_context(|| format!("create {}", root.display()))?;
            builder.tempdir_in(root)
        }
        None => builder.tempdir(),
    }
    .context("create extraction scratch dir")?;
    if options.keep {
        tracing::info!(path = %dir.path().display(), "keeping extraction scratch dir");
    }
    Ok(dir)
}

/// Unpack every entry of a zip archive under `dest`.
///
/// Entries whose names would land outside `dest` are skipped.
pub fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("open index archive {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(ScanError::from)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(ScanError::from)?;
        let Some(rel) = entry.enclosed_name() else {
            tracing::warn!(entry = entry.name(), "skipping archive entry outside destination");
            continue;
        };
        let out_path = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("create {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let mut out_file =
            File::create(&out_path).with_context(|| format!("create {}", out_path.display()))?;
        io::copy(&mut entry, &mut out_file)
            .with_context(|| format!("write {}", out_path.display()))?;
    }

    Ok(())
}
