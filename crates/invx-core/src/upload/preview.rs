//! Object-URL style preview handles.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::trace;

use super::UploadFile;

#[derive(Debug, Default)]
struct Inner {
    next_id: AtomicU64,
    live: Mutex<HashSet<String>>,
}

/// Tracks preview URLs that have been handed out and not yet released.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Inner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new preview URL for `file`.
    pub fn create(&self, file: &UploadFile) -> PreviewUrl {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("blob:invx/{}/{}", id, file.name);

        self.live().insert(url.clone());
        trace!("Created preview {}", url);

        PreviewUrl {
            url,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Number of URLs not yet released.
    pub fn live_count(&self) -> usize {
        self.live().len()
    }

    /// Whether `url` is still registered.
    pub fn is_live(&self, url: &str) -> bool {
        self.live().contains(url)
    }

    fn live(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.inner.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A registered preview URL, released when dropped.
#[derive(Debug)]
pub struct PreviewUrl {
    url: String,
    registry: Arc<Inner>,
}

impl PreviewUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewUrl {
    fn drop(&mut self) {
        let mut live = self.registry.live.lock().unwrap_or_else(|e| e.into_inner());
        live.remove(&self.url);
        trace!("Revoked preview {}", self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_released_on_drop() {
        let registry = PreviewRegistry::new();
        let file = UploadFile::new("scan.png", 1, "image/png");

        let first = registry.create(&file);
        let second = registry.create(&file);
        assert_ne!(first.as_str(), second.as_str());
        assert_eq!(registry.live_count(), 2);

        let url = first.as_str().to_string();
        drop(first);
        assert!(!registry.is_live(&url));
        assert_eq!(registry.live_count(), 1);

        drop(second);
        assert_eq!(registry.live_count(), 0);
    }
}
