//! # Thumbnailer
//!
//! An on-demand JPEG thumbnail server. A request names a source image and a
//! target size; the first request renders and stores the thumbnail, every
//! later request for the same `(identifier, width, height)` is served from
//! disk.
//!
//! # Request Pipeline
//!
//! ```text
//! 1. Transport    GET /images?...  →  raw strings        (server)
//! 2. Validate     raw strings      →  typed parameters   (validation)
//! 3. Orchestrate  parameters       →  cached or resized  (service, cache, imaging)
//! ```
//!
//! Any stage can fail with a [`ServiceError`](error::ServiceError). That
//! closed taxonomy is the only error vocabulary the transport sees, so
//! filesystem and decoder details stay in the logs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`validation`] | Identifier and dimension checks, run before any I/O |
//! | [`service`] | `resize_or_fetch`: cache lookup, resize on miss, persist |
//! | [`cache`] | Source/cache path derivation and atomic cache writes |
//! | [`imaging`] | Resize engine: decode, Lanczos3 fill-resize, JPEG encode |
//! | [`error`] | The error taxonomy |
//! | [`config`] | TOML configuration with stock defaults |
//! | [`server`] | axum router and taxonomy → HTTP status mapping |
//!
//! # Design Decisions
//!
//! ## The Cache Is Append-Only
//!
//! Cache entries are keyed by `<width>x<height>-<identifier>.jpg` and never
//! invalidated, updated or deleted. If a source image changes, its cached
//! thumbnails must be removed by whoever changed it.
//!
//! ## No Write Coordination
//!
//! Two concurrent misses for the same key both resize and both write. Writes
//! are atomic renames and the resize engine is deterministic, so either
//! writer's file is correct. Swapping in a non-deterministic engine would
//! require a per-key lock or request coalescing in [`service`].
//!
//! ## Validation Twice
//!
//! The HTTP layer validates raw strings; the orchestrator validates typed
//! parameters again with an independent check for path separators and `..`.
//! Either check alone keeps requests inside the configured directories.

pub mod cache;
pub mod config;
pub mod error;
pub mod imaging;
pub mod server;
pub mod service;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_helpers;
