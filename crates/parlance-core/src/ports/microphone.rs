//! Microphone port: acquisition of a capture stream.
//!
//! Acquisition and capture are separate steps, mirroring how platforms
//! grant a device first and start delivering data second:
//!
//! ```text
//!   request_stream() ──▶ CaptureStream ──start(tx)──▶ chunks… ──finish()──▶ release()
//! ```
//!
//! A stream holds a live hardware track from the moment it is returned
//! until [`CaptureStream::release`] is called. Callers must release on
//! every exit path.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised while acquiring or driving a capture stream.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or the OS refused microphone access.
    #[error("Microphone permission denied")]
    PermissionDenied,

    /// No usable input device.
    #[error("Audio input device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The stream failed after acquisition.
    #[error("Audio capture failed: {0}")]
    Stream(String),
}

/// Capability to acquire a microphone stream.
#[async_trait]
pub trait MicrophonePort: Send + Sync {
    /// Request access to the default input device.
    ///
    /// Suspends until access is granted or refused.
    async fn request_stream(&self) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// A granted, exclusively owned microphone stream.
#[async_trait]
pub trait CaptureStream: Send {
    /// Content type of the bytes this stream delivers.
    fn content_type(&self) -> &str;

    /// Begin delivering encoded chunks into `chunks`, in order.
    fn start(&mut self, chunks: mpsc::UnboundedSender<Bytes>) -> Result<(), CaptureError>;

    /// Stop capturing and flush every remaining chunk.
    ///
    /// When this returns, all chunks of the take have been sent.
    async fn finish(&mut self) -> Result<(), CaptureError>;

    /// Release the underlying hardware track. Idempotent.
    fn release(&mut self);
}
