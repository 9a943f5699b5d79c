//! Resize engine — pure Rust, no system image libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG) |
//! | **Resize** | `resize_to_fill` with Lanczos3 (cover + center crop) |
//! | **Encode** | `image::codecs::jpeg::JpegEncoder` into memory |
//!
//! The module is split into:
//! - **Parameters**: [`ResizeParams`] and [`Quality`]
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{Quality, ResizeParams};
pub use rust_backend::RustBackend;
