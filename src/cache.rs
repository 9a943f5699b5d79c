//! On-disk layout of the source and thumbnail stores.
//!
//! The source store is a read-only directory of `<identifier>.jpg` files
//! populated by someone else. The thumbnail cache is a directory this
//! service owns:
//!
//! ```text
//! assets/
//! ├── full/                   # source store, never written
//! │   ├── fjord.jpg
//! │   └── santamonica.jpg
//! └── thumb/                  # cache store, created at startup
//!     ├── 100x100-fjord.jpg
//!     └── 200x150-fjord.jpg
//! ```
//!
//! ## Cache keys
//!
//! The cache path is a pure function of `(identifier, width, height)`:
//! `<width>x<height>-<identifier>.jpg`. Width and height are digit-only, so
//! the first `x` and the first `-` after it always split the name back into
//! the same three fields. Distinct inputs therefore never share a path.
//!
//! ## Writes
//!
//! Entries are never invalidated or deleted. A write goes to a temporary
//! file in the cache directory and is renamed into place, so a reader never
//! observes a half-written thumbnail. Two concurrent writers for the same key
//! both rename; the last one wins, which is fine because the resize engine is
//! deterministic.
//!
//! Entries are created with mode `0644`, the same as a plain file write under
//! the usual umask, so other readers of the cache directory can serve them.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::NamedTempFile;

/// Unix mode of a persisted cache entry.
#[cfg(unix)]
pub const ENTRY_MODE: u32 = 0o644;

/// Extension of both source images and cached thumbnails.
pub const IMAGE_EXTENSION: &str = "jpg";

/// File name of the cache entry for a given key.
pub fn cache_file_name(identifier: &str, width: u32, height: u32) -> String {
    format!("{}x{}-{}.{}", width, height, identifier, IMAGE_EXTENSION)
}

/// Paths of the source and cache directories.
#[derive(Debug, Clone)]
pub struct ThumbnailStore {
    source_dir: PathBuf,
    cache_dir: PathBuf,
}

impl ThumbnailStore {
    pub fn new(source_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// `<source_dir>/<identifier>.jpg`
    pub fn source_path(&self, identifier: &str) -> PathBuf {
        self.source_dir.join(format!("{}.{}", identifier, IMAGE_EXTENSION))
    }

    /// `<cache_dir>/<width>x<height>-<identifier>.jpg`
    pub fn cache_path(&self, identifier: &str, width: u32, height: u32) -> PathBuf {
        self.cache_dir.join(cache_file_name(identifier, width, height))
    }

    /// Create the cache directory if it does not exist yet.
    ///
    /// Called once during startup, before the server accepts requests.
    pub fn ensure_cache_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.cache_dir)
    }

    /// Read a cache entry in full. The bytes are returned as stored.
    pub fn read_cached(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    /// Atomically write a cache entry.
    ///
    /// Recreates the cache directory if it disappeared after startup.
    pub fn write_cached(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.ensure_cache_dir()?;
        let mut temp = NamedTempFile::new_in(&self.cache_dir)?;
        temp.write_all(contents)?;
        temp.flush()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file().set_permissions(std::fs::Permissions::from_mode(ENTRY_MODE))?;
        }
        temp.into_temp_path().persist(path).map_err(|e| e.error)
    }
}

/// Process-wide cache hit/miss counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.hits() + self.misses()
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits() > 0 {
            write!(
                f,
                "{} cached, {} resized ({} total)",
                self.hits(),
                self.misses(),
                self.total()
            )
        } else {
            write!(f, "{} resized", self.misses())
        }
    }
}
