use std::path::PathBuf;

use clap::Parser;
use livecut_engine::config::DEFAULT_BUFFER_SECONDS;

/// Cut a time window out of a live HLS stream into a playable file.
///
/// START and END are either two ISO 8601 UTC timestamps
/// (e.g. "2025-02-13T21:00:00Z") or two raw segment numbers; raw segment
/// mode is selected when both parse as plain integers, and no buffer is
/// applied in that mode.
#[derive(Debug, Parser)]
#[command(name = "livecut", version)]
pub struct Args {
    /// Stream page URL handed to yt-dlp
    pub url: String,

    /// Format id selecting the media rendition (the yt-dlp -f value)
    pub format_id: String,

    /// Window start: ISO 8601 UTC timestamp or raw segment number
    pub start: String,

    /// Window end: ISO 8601 UTC timestamp or raw segment number
    pub end: String,

    /// Output media path; the extension selects the container
    pub output: PathBuf,

    /// Safety margin in seconds added on each side of a time window
    #[arg(long, default_value_t = DEFAULT_BUFFER_SECONDS)]
    pub buffer: f64,

    /// Path to the yt-dlp binary (also: YTDLP_PATH environment variable)
    #[arg(long, value_name = "PATH")]
    pub yt_dlp_path: Option<String>,

    /// Path to the ffmpeg binary (also: FFMPEG_PATH environment variable)
    #[arg(long, value_name = "PATH")]
    pub ffmpeg_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
