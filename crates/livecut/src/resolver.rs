use std::process::Stdio;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::process;

/// Turns a stream locator plus format id into a live media playlist URL.
#[async_trait]
pub trait ManifestResolver: Send + Sync {
    async fn resolve_manifest_url(
        &self,
        stream_url: &str,
        format_id: &str,
    ) -> Result<Url, ExtractError>;
}

/// Resolver backed by the external yt-dlp binary.
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    binary_path: String,
}

impl YtDlpResolver {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            binary_path: config.yt_dlp_path(),
        }
    }
}

#[async_trait]
impl ManifestResolver for YtDlpResolver {
    async fn resolve_manifest_url(
        &self,
        stream_url: &str,
        format_id: &str,
    ) -> Result<Url, ExtractError> {
        let mut cmd = process::tokio_command(&self.binary_path);
        cmd.arg("-f")
            .arg(format_id)
            .arg("--print")
            .arg("urls")
            .arg(stream_url);

        debug!(binary = %self.binary_path, format = %format_id, "invoking resolver");
        let out = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExtractError::tool_spawn(&self.binary_path, e))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            return Err(ExtractError::tool_failure(
                &self.binary_path,
                out.status,
                stderr,
            ));
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        parse_resolver_output(&stdout)
    }
}

/// The resolver prints one URL per line; the first non-empty line is the
/// manifest URL for the requested format.
fn parse_resolver_output(stdout: &str) -> Result<Url, ExtractError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| ExtractError::invalid_url("", "resolver printed no URL"))?;
    Url::parse(line).map_err(|e| ExtractError::invalid_url(line, e.to_string()))
}
