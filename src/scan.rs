//! Walk an extracted index and keep packs released after a cutoff.
use crate::index_pack::IndexPack;
use crate::report::PackSummary;
use crate::timestamp::parse_timestamp;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Ordering applied to the filtered packs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PackOrder {
    /// Directory listing order, as returned by the filesystem.
    #[default]
    Listing,
    Id,
    Created,
}

pub fn get_new_packs(
    index_dir: &Path,
    cutoff: &str,
    order: PackOrder,
) -> Result<Vec<PackSummary>> {
    tracing::debug!("last message time was: {cutoff}");
    parse_timestamp(cutoff)?;

    let mut new_packs = Vec::new();
    let entries =
        fs::read_dir(index_dir).with_context(|| format!("read {}", index_dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read {}", index_dir.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let id = entry.file_name().to_string_lossy().into_owned();
        let mut pack = IndexPack::new(path, id);
        if pack.is_released_after_last_run(cutoff)? {
            tracing::debug!(pack = pack.id(), "{} pack is a new pack", pack.id());
            let created_at = pack.created_at()?;
            new_packs.push((created_at, pack.to_summary()));
        }
    }

    match order {
        PackOrder::Listing => {}
        PackOrder::Id => new_packs.sort_by(|a, b| a.1.id.cmp(&b.1.id)),
        PackOrder::Created => {
            new_packs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)))
        }
    }

    Ok(new_packs.into_iter().map(|(_, summary)| summary).collect())
}
