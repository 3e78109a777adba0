use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Why no frame is available right now. Every variant is recoverable; the
/// HTTP layer answers with a placeholder instead of failing the request.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture tool `{0}` is not available")]
    ToolMissing(String),
    #[error("capture command failed: {0}")]
    CommandFailed(String),
    #[error("captured image unreadable: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of still frames for the snapshot endpoint.
///
/// This feeds the HTTP polling path only; the peer transport never consumes
/// it. Wiring captured frames into outbound media tracks is a separate
/// pipeline concern.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture_frame(&self) -> Result<Bytes, CaptureError>;
}
