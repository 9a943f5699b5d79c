//! Cache-or-resize orchestration.
//!
//! [`ThumbnailService::resize_or_fetch`] turns a `(identifier, width, height)`
//! request into JPEG bytes:
//!
//! ```text
//! validate_params ──✗──▶ InvalidFilename / InvalidDimensions
//!       │
//! source exists? ──✗──▶ FileNotFound
//!       │
//! cache entry exists? ──✓──▶ read ──✗──▶ ReadError
//!       │                     └──✓──▶ Hit(bytes)
//!       ✗
//! resize_to_jpeg ──✗──▶ ProcessingError
//!       │
//! write_cached ──✗──▶ ProcessingError
//!       │
//!   Miss(bytes)
//! ```
//!
//! Every step is terminal on failure: a cache entry that can't be read is
//! reported, not recomputed from the source. Underlying errors are logged
//! here and replaced by their taxonomy value.
//!
//! The steps block. The HTTP layer runs this on tokio's blocking pool.

use crate::cache::{CacheStats, ThumbnailStore};
use crate::error::{ServiceError, ServiceResult};
use crate::imaging::{ImageBackend, Quality, ResizeParams};
use crate::validation::validate_params;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Where the returned bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// A rendered (or cached) thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub bytes: Vec<u8>,
    pub cache: CacheStatus,
}

pub struct ThumbnailService<B> {
    store: ThumbnailStore,
    backend: B,
    quality: Quality,
    stats: CacheStats,
}

impl<B: ImageBackend> ThumbnailService<B> {
    pub fn new(store: ThumbnailStore, backend: B, quality: Quality) -> Self {
        Self {
            store,
            backend,
            quality,
            stats: CacheStats::default(),
        }
    }

    pub fn store(&self) -> &ThumbnailStore {
        &self.store
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Serve a cached thumbnail, or render and cache it.
    pub fn resize_or_fetch(
        &self,
        identifier: &str,
        width: u32,
        height: u32,
    ) -> ServiceResult<Thumbnail> {
        validate_params(identifier, width, height)?;

        let source = self.store.source_path(identifier);
        if !exists(&source)? {
            debug!(path = %source.display(), "source image missing");
            return Err(ServiceError::FileNotFound);
        }

        let cached = self.store.cache_path(identifier, width, height);
        if exists(&cached)? {
            let bytes = self.store.read_cached(&cached).map_err(|e| {
                warn!(path = %cached.display(), error = %e, "failed to read cached thumbnail");
                ServiceError::ReadError
            })?;
            debug!(path = %cached.display(), "cache hit");
            self.stats.hit();
            return Ok(Thumbnail {
                bytes,
                cache: CacheStatus::Hit,
            });
        }

        debug!(path = %cached.display(), "cache miss, resizing");
        let bytes = self
            .backend
            .resize_to_jpeg(&ResizeParams {
                source: source.clone(),
                width,
                height,
                quality: self.quality,
            })
            .map_err(|e| {
                warn!(source = %source.display(), error = %e, "resize failed");
                ServiceError::ProcessingError
            })?;

        self.store.write_cached(&cached, &bytes).map_err(|e| {
            warn!(path = %cached.display(), error = %e, "failed to persist thumbnail");
            ServiceError::ProcessingError
        })?;
        self.stats.miss();

        Ok(Thumbnail {
            bytes,
            cache: CacheStatus::Miss,
        })
    }
}

/// Existence check that distinguishes "absent" from "couldn't tell".
///
/// A path that can't name a file (an over-long component, or a parent that
/// is not a directory) is absent. Anything else, such as a permission
/// failure, is `Internal`.
fn exists(path: &Path) -> ServiceResult<bool> {
    match path.try_exists() {
        Ok(found) => Ok(found),
        Err(e) if is_absent(e.kind()) => Ok(false),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "existence check failed");
            Err(ServiceError::Internal)
        }
    }
}

fn is_absent(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::InvalidFilename
    )
}
