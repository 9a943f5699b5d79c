//! Resize engine trait and its error type.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). The orchestrator only
//! sees the trait, so it can be driven by a mock in tests.

use super::params::ResizeParams;
use thiserror::Error;

/// Detailed engine failure. Logged by the orchestrator, never shown to clients.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for resize engines.
///
/// Implementations must be deterministic: the same parameters against the
/// same source must yield interchangeable bytes, because concurrent cache
/// misses for one key are allowed to overwrite each other.
pub trait ImageBackend: Send + Sync {
    /// Decode the source, resize it to the exact target size and encode as JPEG.
    fn resize_to_jpeg(&self, params: &ResizeParams) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::Quality;
    use std::sync::Mutex;

    /// Mock backend that records calls and returns canned bytes.
    /// Uses Mutex (not RefCell) so it is Sync and can sit behind an `Arc`.
    #[derive(Default)]
    pub struct MockBackend {
        pub output: Vec<u8>,
        pub fail: bool,
        pub calls: Mutex<Vec<RecordedResize>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedResize {
        pub source: String,
        pub width: u32,
        pub height: u32,
        pub quality: u8,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::with_output(b"mock jpeg".to_vec())
        }

        pub fn with_output(output: Vec<u8>) -> Self {
            Self {
                output,
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn get_calls(&self) -> Vec<RecordedResize> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn resize_to_jpeg(&self, params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
            self.calls.lock().unwrap().push(RecordedResize {
                source: params.source.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            if self.fail {
                return Err(BackendError::ProcessingFailed("mock failure".to_string()));
            }
            Ok(self.output.clone())
        }
    }

    #[test]
    fn mock_records_resize() {
        let backend = MockBackend::new();

        let bytes = backend
            .resize_to_jpeg(&ResizeParams {
                source: "/full/fjord.jpg".into(),
                width: 200,
                height: 100,
                quality: Quality::new(75),
            })
            .unwrap();

        assert_eq!(bytes, b"mock jpeg");
        let calls = backend.get_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            RecordedResize { source, width: 200, height: 100, quality: 75 } if source == "/full/fjord.jpg"
        ));
    }

    #[test]
    fn failing_mock_still_records() {
        let backend = MockBackend::failing();
        let result = backend.resize_to_jpeg(&ResizeParams {
            source: "/full/fjord.jpg".into(),
            width: 1,
            height: 1,
            quality: Quality::default(),
        });
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
        assert_eq!(backend.get_calls().len(), 1);
    }
}
