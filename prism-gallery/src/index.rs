//! Local gallery index: the records the user has saved, cached on disk as JSON.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::ImageRecord;

/// File extension recommended for gallery index files.
pub const GALLERY_FILE_EXT: &str = "gallery.json";

#[derive(Debug, Serialize, Deserialize)]
struct GalleryIndexV1 {
    version: u32,
    records: Vec<ImageRecord>,
}

/// Save records to disk as pretty JSON.
pub fn save_gallery(path: impl AsRef<Path>, records: &[ImageRecord]) -> anyhow::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let index = GalleryIndexV1 {
        version: 1,
        records: records.to_vec(),
    };
    let json = serde_json::to_string_pretty(&index).context("serialize gallery index")?;
    fs::write(path, json).with_context(|| format!("write gallery index: {}", path.display()))?;

    tracing::debug!(path = %path.display(), count = records.len(), "gallery index saved");
    Ok(())
}

/// Load records from disk.
pub fn load_gallery(path: impl AsRef<Path>) -> anyhow::Result<Vec<ImageRecord>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read gallery index: {}", path.display()))?;
    let index: GalleryIndexV1 = serde_json::from_str(&data).context("parse gallery index json")?;

    if index.version != 1 {
        anyhow::bail!("unsupported gallery index version {}", index.version);
    }
    Ok(index.records)
}
