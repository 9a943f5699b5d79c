//! Shared test utilities for the thumbnailer test suite.
//!
//! Fixtures are generated with the `image` crate instead of being checked in,
//! so every test gets real, decodable JPEGs in an isolated temp directory.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let (tmp, store) = setup_store();
//! assert!(store.source_path("fjord").exists());
//! ```

use image::{ImageEncoder, RgbImage};
use std::path::Path;
use tempfile::TempDir;

use crate::cache::ThumbnailStore;

/// Source images present in every fixture store, with their pixel sizes.
pub const FIXTURE_IMAGES: &[(&str, u32, u32)] = &[("fjord", 320, 240), ("santamonica", 200, 300)];

/// Write a small valid JPEG with a gradient so resampling has real work to do.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create `full/` with the fixture images and an empty `thumb/` in a temp dir.
pub fn setup_store() -> (TempDir, ThumbnailStore) {
    let tmp = TempDir::new().unwrap();
    let store = ThumbnailStore::new(tmp.path().join("full"), tmp.path().join("thumb"));
    std::fs::create_dir_all(store.source_dir()).unwrap();
    for (name, w, h) in FIXTURE_IMAGES {
        create_test_jpeg(&store.source_path(name), *w, *h);
    }
    store.ensure_cache_dir().unwrap();
    (tmp, store)
}
