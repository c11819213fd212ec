use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::process;

/// Protocols the muxer may use while reading the synthetic playlist and its
/// segments.
const PROTOCOL_WHITELIST: &str = "file,http,https,tcp,tls";

/// Trailing stderr lines surfaced when the muxer fails; everything before is
/// progress noise.
const STDERR_TAIL_LINES: usize = 10;

/// Copies the segments a playlist lists into a single output container,
/// without re-encoding.
#[async_trait]
pub trait SegmentMuxer: Send + Sync {
    async fn mux(&self, playlist_path: &Path, output_path: &Path) -> Result<(), ExtractError>;
}

/// Muxer backed by the external ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegMuxer {
    binary_path: String,
}

impl FfmpegMuxer {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            binary_path: config.ffmpeg_path(),
        }
    }
}

#[async_trait]
impl SegmentMuxer for FfmpegMuxer {
    async fn mux(&self, playlist_path: &Path, output_path: &Path) -> Result<(), ExtractError> {
        let mut cmd = process::tokio_command(&self.binary_path);
        cmd.arg("-y")
            .arg("-protocol_whitelist")
            .arg(PROTOCOL_WHITELIST)
            .arg("-i")
            .arg(playlist_path)
            .arg("-c")
            .arg("copy")
            .arg(output_path);

        debug!(binary = %self.binary_path, playlist = %playlist_path.display(), "invoking muxer");
        let out = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExtractError::tool_spawn(&self.binary_path, e))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(ExtractError::tool_failure(
                &self.binary_path,
                out.status,
                stderr_tail(&stderr, STDERR_TAIL_LINES),
            ));
        }
        Ok(())
    }
}

fn stderr_tail(stderr: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = stderr.trim().lines().collect();
    let skip = lines.len().saturating_sub(max_lines);
    lines[skip..].join("\n")
}
