pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";

/// Assumed duration of every media segment, in seconds. Live manifests with a
/// different cadence are out of scope; this is never derived from the
/// manifest's declared target duration.
pub const DEFAULT_SEGMENT_DURATION: f64 = 5.0;

/// Safety margin added on each side of a time window, in seconds.
pub const DEFAULT_BUFFER_SECONDS: f64 = 60.0;

const DEFAULT_YT_DLP_PATH: &str = "yt-dlp";
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// Configurable options for a window extraction run
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Assumed fixed duration of every segment, in seconds
    pub segment_duration: f64,

    /// User agent sent with the manifest request
    pub user_agent: String,

    /// Path to the yt-dlp binary; falls back to the `YTDLP_PATH` environment
    /// variable, then to `yt-dlp` on PATH
    pub yt_dlp_path: Option<String>,

    /// Path to the ffmpeg binary; falls back to the `FFMPEG_PATH` environment
    /// variable, then to `ffmpeg` on PATH
    pub ffmpeg_path: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            segment_duration: DEFAULT_SEGMENT_DURATION,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            yt_dlp_path: None,
            ffmpeg_path: None,
        }
    }
}

impl ExtractorConfig {
    pub fn yt_dlp_path(&self) -> String {
        self.yt_dlp_path
            .clone()
            .or_else(|| std::env::var("YTDLP_PATH").ok())
            .unwrap_or_else(|| DEFAULT_YT_DLP_PATH.to_string())
    }

    pub fn ffmpeg_path(&self) -> String {
        self.ffmpeg_path
            .clone()
            .or_else(|| std::env::var("FFMPEG_PATH").ok())
            .unwrap_or_else(|| DEFAULT_FFMPEG_PATH.to_string())
    }
}
