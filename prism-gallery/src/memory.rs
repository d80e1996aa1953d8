//! In-process stand-in for the hosted storage backend.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use prism_ai::ImageRef;

use crate::{ImageRecord, PersistenceBackend, StoreError};

#[derive(Debug, Default)]
struct Inner {
    uploads: Vec<(String, ImageRef)>,
    records: Vec<ImageRecord>,
}

/// Keeps uploads and records in memory. URLs are minted under `base_url`.
#[derive(Debug)]
pub struct MemoryStore {
    base_url: String,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn upload_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.uploads.len())
    }

    /// The image that was uploaded under `url`, if any.
    pub fn uploaded(&self, url: &str) -> Option<ImageRef> {
        let inner = self.lock().ok()?;
        inner
            .uploads
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, image)| image.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Unavailable {
            message: "memory store lock poisoned".into(),
        })
    }
}

// Extension of the path part of `uri`, or "png" when it has no usable one.
fn upload_extension(uri: &str) -> &str {
    let path = uri.split(|c: char| c == '?' || c == '#').next().unwrap_or(uri);
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| {
            !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or("png")
}

impl PersistenceBackend for MemoryStore {
    fn upload(&self, image: &ImageRef, owner_id: &str) -> Result<String, StoreError> {
        let ext = upload_extension(&image.uri);
        let url = format!("{}/{}/{}.{}", self.base_url, owner_id, Uuid::new_v4(), ext);

        self.lock()?.uploads.push((url.clone(), image.clone()));
        tracing::trace!(url = %url, "memory upload");
        Ok(url)
    }

    fn record(&self, record: &ImageRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        match inner
            .records
            .iter_mut()
            .find(|r| r.record_id == record.record_id)
        {
            Some(existing) => {
                tracing::debug!(record_id = %record.record_id, "overwriting record");
                *existing = record.clone();
            }
            None => inner.records.push(record.clone()),
        }
        Ok(())
    }

    fn list(&self, owner_id: &str) -> Result<Vec<ImageRecord>, StoreError> {
        let inner = self.lock()?;
        let mut records: Vec<ImageRecord> = inner
            .records
            .iter()
            .rev()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        // stable: equal timestamps stay in reverse insertion order
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str, created_at: i64) -> ImageRecord {
        ImageRecord {
            created_at,
            ..ImageRecord::new("https://storage.test/x.png", owner, None)
        }
    }

    #[test]
    fn test_record_last_write_wins() {
        let store = MemoryStore::new("https://storage.test/");
        let mut r = record("u", 10);
        store.record(&r).unwrap();

        r.prompt = Some("updated".into());
        store.record(&r).unwrap();

        let listed = store.list("u").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].prompt.as_deref(), Some("updated"));
    }

    #[test]
    fn test_list_newest_first_per_owner() {
        let store = MemoryStore::new("https://storage.test");
        let old = record("u", 10);
        let new = record("u", 20);
        let same_time_later = record("u", 20);
        let other = record("v", 30);
        for r in [&old, &new, &same_time_later, &other] {
            store.record(r).unwrap();
        }

        let listed = store.list("u").unwrap();
        assert_eq!(listed, vec![same_time_later, new, old]);
    }

    #[test]
    fn test_upload_mints_url_under_base() {
        let store = MemoryStore::new("https://storage.test/");
        let image = ImageRef::new("content://media/42");
        let url = store.upload(&image, "u").unwrap();

        assert!(url.starts_with("https://storage.test/u/"));
        assert!(url.ends_with(".png"));
        assert_eq!(store.uploaded(&url), Some(image));
        assert_eq!(store.upload_count().unwrap(), 1);
    }

    #[test]
    fn test_upload_extension_ignores_query_and_data_uris() {
        assert_eq!(upload_extension("https://cdn.test/a.webp?token=x.y#frag"), "webp");
        assert_eq!(upload_extension("file:///tmp/edit.jpg"), "jpg");
        assert_eq!(upload_extension("data:image/png;base64,iVBORw0KGgo="), "png");
        assert_eq!(upload_extension("content://media/42"), "png");

        let store = MemoryStore::new("https://storage.test");
        let url = store
            .upload(&ImageRef::new("https://cdn.test/b.jpeg?sig=abc"), "u")
            .unwrap();
        assert!(url.ends_with(".jpeg"));
        assert!(!url.contains('?'));
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = std::sync::Arc::new(MemoryStore::new("https://storage.test"));
        let poisoner = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the store");
        })
        .join();

        assert!(matches!(
            store.upload_count(),
            Err(StoreError::Unavailable { .. })
        ));
    }
}
