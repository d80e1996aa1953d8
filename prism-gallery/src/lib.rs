//! prism-gallery: where finished images go.
//!
//! Design rules:
//! - Saving is upload first, then a metadata record pointing at the upload.
//! - The hosted backend is a trait; nothing here opens a socket.
//! - Records are last-write-wins per `record_id`.
//! - The edit history is never persisted; only finished images are.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use prism_ai::ImageRef;

pub mod index;
pub mod memory;

pub use index::{load_gallery, save_gallery, GALLERY_FILE_EXT};
pub use memory::MemoryStore;

/// Metadata row for one saved image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub record_id: Uuid,
    /// Public URL returned by the upload.
    pub url: String,
    pub owner_id: String,
    /// Unix seconds.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl ImageRecord {
    pub fn new(url: impl Into<String>, owner_id: impl Into<String>, prompt: Option<String>) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            url: url.into(),
            owner_id: owner_id.into(),
            created_at: unix_now(),
            prompt,
        }
    }
}

pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Object storage plus a metadata table.
pub trait PersistenceBackend {
    /// Store the image bytes behind `image` and return its public URL.
    fn upload(&self, image: &ImageRef, owner_id: &str) -> Result<String, StoreError>;

    fn record(&self, record: &ImageRecord) -> Result<(), StoreError>;

    /// Records owned by `owner_id`, newest first.
    fn list(&self, owner_id: &str) -> Result<Vec<ImageRecord>, StoreError>;
}

impl<S: PersistenceBackend + ?Sized> PersistenceBackend for &S {
    fn upload(&self, image: &ImageRef, owner_id: &str) -> Result<String, StoreError> {
        (**self).upload(image, owner_id)
    }

    fn record(&self, record: &ImageRecord) -> Result<(), StoreError> {
        (**self).record(record)
    }

    fn list(&self, owner_id: &str) -> Result<Vec<ImageRecord>, StoreError> {
        (**self).list(owner_id)
    }
}

/// Upload `image` and record it for `owner_id`.
pub fn save_image<S: PersistenceBackend + ?Sized>(
    store: &S,
    image: &ImageRef,
    owner_id: &str,
    prompt: Option<String>,
) -> Result<ImageRecord, StoreError> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() {
        tracing::error!("save_image called without an owner");
        return Err(StoreError::MissingOwner);
    }
    if image.uri.trim().is_empty() {
        return Err(StoreError::EmptyImage);
    }

    let url = store.upload(image, owner_id)?;
    tracing::debug!(url = %url, "image uploaded");

    let record = ImageRecord::new(url, owner_id, prompt);
    store.record(&record)?;

    tracing::info!(
        record_id = %record.record_id,
        owner_id = %record.owner_id,
        "image saved"
    );
    Ok(record)
}

/// Storage errors. Backends map their transport failures onto `Unavailable`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an owner id is required to save images")]
    MissingOwner,

    #[error("image has no uri")]
    EmptyImage,

    #[error("storage backend unavailable: {message}")]
    Unavailable { message: String },
}
