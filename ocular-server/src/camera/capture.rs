use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{CaptureError, FrameSource};

static CAPTURE_SEQ: AtomicU64 = AtomicU64::new(0);

/// How to drive the external capture tool.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Capture executable, e.g. `termux-camera-photo` or `fswebcam`.
    pub command: String,
    /// Arguments; `{output}` expands to the file the tool must write.
    pub args: Vec<String>,
    /// Where temporary captures land.
    pub temp_dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            command: "termux-camera-photo".to_owned(),
            args: vec!["-o".to_owned(), "{output}".to_owned()],
            temp_dir: std::env::temp_dir(),
        }
    }
}

/// Captures frames by invoking an external command that writes a JPEG file,
/// then reading the file back. Each capture gets its own output path so
/// concurrent snapshot requests do not clobber each other.
pub struct CommandCapture {
    config: CaptureConfig,
}

impl CommandCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Checks that the capture tool exists on PATH.
    pub async fn probe(&self) -> Result<(), CaptureError> {
        let available = Command::new("sh")
            .arg("-c")
            .arg(format!("command -v {}", self.config.command))
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false);
        if available {
            Ok(())
        } else {
            Err(CaptureError::ToolMissing(self.config.command.clone()))
        }
    }

    fn next_output_path(&self) -> PathBuf {
        let seq = CAPTURE_SEQ.fetch_add(1, Ordering::Relaxed);
        self.config
            .temp_dir
            .join(format!("ocular_capture_{}_{}.jpg", std::process::id(), seq))
    }
}

#[async_trait]
impl FrameSource for CommandCapture {
    async fn capture_frame(&self) -> Result<Bytes, CaptureError> {
        self.probe().await?;

        let output_path = self.next_output_path();
        let args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| arg.replace("{output}", &output_path.to_string_lossy()))
            .collect();

        debug!("Running capture: {} {:?}", self.config.command, args);
        let output = Command::new(&self.config.command)
            .args(&args)
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            return Err(CaptureError::CommandFailed(if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            }));
        }

        let image = tokio::fs::read(&output_path).await?;
        if let Err(e) = tokio::fs::remove_file(&output_path).await {
            warn!("Could not remove {}: {}", output_path.display(), e);
        }

        debug!("Captured frame, {} bytes", image.len());
        Ok(Bytes::from(image))
    }
}
