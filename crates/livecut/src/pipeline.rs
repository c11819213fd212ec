// Extraction pipeline: resolver -> fetch -> anchor -> map -> synthesize -> mux.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::fetch::{HttpFetcher, ManifestFetcher};
use crate::manifest;
use crate::muxer::{FfmpegMuxer, SegmentMuxer};
use crate::playlist::build_playlist;
use crate::resolver::{ManifestResolver, YtDlpResolver};
use crate::window::{WindowSpec, resolve_window};

/// One extraction request: which stream, which slice, where to put it.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Stream page URL handed to the resolver
    pub stream_url: String,
    /// Format id selecting the media rendition
    pub format_id: String,
    /// The slice of the timeline to cut
    pub window: WindowSpec,
    /// Output media path
    pub output_path: PathBuf,
}

/// Wires the external collaborators around the pure window math. Each run is
/// an independent, single-shot computation; any failure aborts it.
pub struct Extraction<R, F, M> {
    config: ExtractorConfig,
    resolver: R,
    fetcher: F,
    muxer: M,
}

impl Extraction<YtDlpResolver, HttpFetcher, FfmpegMuxer> {
    /// Extraction wired to the real external tools.
    pub fn with_config(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let resolver = YtDlpResolver::new(&config);
        let fetcher = HttpFetcher::new(&config)?;
        let muxer = FfmpegMuxer::new(&config);
        Ok(Self::new(config, resolver, fetcher, muxer))
    }
}

impl<R, F, M> Extraction<R, F, M>
where
    R: ManifestResolver,
    F: ManifestFetcher,
    M: SegmentMuxer,
{
    pub fn new(config: ExtractorConfig, resolver: R, fetcher: F, muxer: M) -> Self {
        Self {
            config,
            resolver,
            fetcher,
            muxer,
        }
    }

    pub async fn run(&self, request: &ExtractionRequest) -> Result<(), ExtractError> {
        info!(
            url = %request.stream_url,
            format = %request.format_id,
            "resolving manifest URL"
        );
        let manifest_url = self
            .resolver
            .resolve_manifest_url(&request.stream_url, &request.format_id)
            .await?;
        debug!(url = %manifest_url, "manifest URL resolved");

        info!("fetching manifest");
        let manifest = self.fetcher.fetch_text(&manifest_url).await?;
        info!("manifest: {} lines", manifest.lines().count());

        let reference = manifest::find_reference_point(&manifest);
        if let Some(reference) = &reference {
            info!(
                "reference point: segment {} = {}",
                reference.segment_index, reference.wall_clock
            );
        }

        if let WindowSpec::Time {
            start,
            end,
            buffer_seconds,
        } = &request.window
        {
            info!("time range: {start} to {end} (buffer: {buffer_seconds:.0}s)");
        }
        let range = resolve_window(
            &request.window,
            reference.as_ref(),
            self.config.segment_duration,
        )?;

        let template = manifest::extract_template_url(&manifest)?;
        debug!(template = template.as_str(), "template URL extracted");

        let count = range.segment_count();
        let approx_minutes = count as f64 * self.config.segment_duration / 60.0;
        info!(
            "building playlist: segments {}-{} ({count} segments, ~{approx_minutes:.1} min)",
            range.start, range.end
        );
        let playlist = build_playlist(&template, range, self.config.segment_duration);

        // The guard unlinks the playlist on drop, covering the error paths
        // below as well as the success path.
        let playlist_file = write_playlist(&playlist)?;
        info!("playlist written to: {}", playlist_file.path().display());

        info!("muxing segments into {}", request.output_path.display());
        self.muxer
            .mux(playlist_file.path(), &request.output_path)
            .await?;

        info!("done: {}", request.output_path.display());
        Ok(())
    }
}

fn write_playlist(playlist: &str) -> Result<NamedTempFile, ExtractError> {
    let mut file = tempfile::Builder::new()
        .prefix("live_segment-")
        .suffix(".m3u8")
        .tempfile()?;
    file.write_all(playlist.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use url::Url;

    const ANCHORED_MANIFEST: &str = "#EXTM3U\n\
        #EXT-X-VERSION:3\n\
        #EXT-X-TARGETDURATION:5\n\
        #EXT-X-MEDIA-SEQUENCE:1000\n\
        #EXT-X-PROGRAM-DATE-TIME:2025-02-13T21:00:00+00:00\n\
        #EXTINF:5.000,\n\
        https://example.com/videoplayback/itag/301/sq/1000/file/index.ts\n";

    const ANCHORLESS_MANIFEST: &str = "#EXTM3U\n\
        #EXTINF:5.000,\n\
        https://example.com/videoplayback/itag/301/sq/1000/file/index.ts\n";

    struct FakeResolver;

    #[async_trait]
    impl ManifestResolver for FakeResolver {
        async fn resolve_manifest_url(
            &self,
            _stream_url: &str,
            _format_id: &str,
        ) -> Result<Url, ExtractError> {
            Ok(Url::parse("https://manifest.example.com/hls/index.m3u8").unwrap())
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl ManifestResolver for FailingResolver {
        async fn resolve_manifest_url(
            &self,
            _stream_url: &str,
            _format_id: &str,
        ) -> Result<Url, ExtractError> {
            Err(ExtractError::tool_spawn(
                "yt-dlp",
                std::io::Error::other("binary not found"),
            ))
        }
    }

    struct FakeFetcher {
        manifest: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ManifestFetcher for FakeFetcher {
        async fn fetch_text(&self, _url: &Url) -> Result<String, ExtractError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.manifest.to_string())
        }
    }

    struct MuxCall {
        playlist_path: PathBuf,
        playlist: String,
        output_path: PathBuf,
    }

    struct RecordingMuxer {
        calls: Arc<Mutex<Vec<MuxCall>>>,
        fail: bool,
    }

    #[async_trait]
    impl SegmentMuxer for RecordingMuxer {
        async fn mux(&self, playlist_path: &Path, output_path: &Path) -> Result<(), ExtractError> {
            let playlist = std::fs::read_to_string(playlist_path)?;
            self.calls.lock().unwrap().push(MuxCall {
                playlist_path: playlist_path.to_path_buf(),
                playlist,
                output_path: output_path.to_path_buf(),
            });
            if self.fail {
                return Err(ExtractError::tool_spawn(
                    "ffmpeg",
                    std::io::Error::other("exit status 1"),
                ));
            }
            Ok(())
        }
    }

    fn extraction(
        manifest: &'static str,
        fail_mux: bool,
    ) -> (
        Extraction<FakeResolver, FakeFetcher, RecordingMuxer>,
        Arc<AtomicUsize>,
        Arc<Mutex<Vec<MuxCall>>>,
    ) {
        let fetch_calls = Arc::new(AtomicUsize::new(0));
        let mux_calls = Arc::new(Mutex::new(Vec::new()));
        let extraction = Extraction::new(
            ExtractorConfig::default(),
            FakeResolver,
            FakeFetcher {
                manifest,
                calls: Arc::clone(&fetch_calls),
            },
            RecordingMuxer {
                calls: Arc::clone(&mux_calls),
                fail: fail_mux,
            },
        );
        (extraction, fetch_calls, mux_calls)
    }

    fn index_request(start: i64, end: i64) -> ExtractionRequest {
        ExtractionRequest {
            stream_url: "https://stream.example.com/watch?v=abc".to_string(),
            format_id: "301".to_string(),
            window: WindowSpec::Index { start, end },
            output_path: PathBuf::from("out.mp4"),
        }
    }

    fn time_request(buffer_seconds: f64) -> ExtractionRequest {
        ExtractionRequest {
            window: WindowSpec::from_tokens(
                "2025-02-13T21:00:00Z",
                "2025-02-13T21:01:00Z",
                buffer_seconds,
            )
            .unwrap(),
            ..index_request(0, 0)
        }
    }

    #[tokio::test]
    async fn index_mode_muxes_the_requested_range() {
        let (extraction, _, mux_calls) = extraction(ANCHORLESS_MANIFEST, false);

        extraction.run(&index_request(100, 102)).await.unwrap();

        let calls = mux_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.output_path, PathBuf::from("out.mp4"));
        assert!(call.playlist.contains("#EXT-X-MEDIA-SEQUENCE:100\n"));
        assert!(call.playlist.contains("/sq/102/"));
        assert!(call.playlist.ends_with("#EXT-X-ENDLIST\n"));
    }

    #[tokio::test]
    async fn time_mode_applies_the_buffer() {
        let (extraction, _, mux_calls) = extraction(ANCHORED_MANIFEST, false);

        extraction.run(&time_request(60.0)).await.unwrap();

        let calls = mux_calls.lock().unwrap();
        let call = &calls[0];
        assert!(call.playlist.contains("#EXT-X-MEDIA-SEQUENCE:988\n"));
        assert!(call.playlist.contains("/sq/1024/"));
        assert!(!call.playlist.contains("/sq/1025/"));
    }

    #[tokio::test]
    async fn time_mode_without_anchor_fails_before_muxing() {
        let (extraction, _, mux_calls) = extraction(ANCHORLESS_MANIFEST, false);

        let err = extraction.run(&time_request(60.0)).await.unwrap_err();

        assert!(matches!(err, ExtractError::NoReferencePoint));
        assert!(mux_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolver_failure_aborts_before_fetching() {
        let fetch_calls = Arc::new(AtomicUsize::new(0));
        let extraction = Extraction::new(
            ExtractorConfig::default(),
            FailingResolver,
            FakeFetcher {
                manifest: ANCHORED_MANIFEST,
                calls: Arc::clone(&fetch_calls),
            },
            RecordingMuxer {
                calls: Arc::new(Mutex::new(Vec::new())),
                fail: false,
            },
        );

        let err = extraction.run(&index_request(1, 2)).await.unwrap_err();

        assert!(matches!(err, ExtractError::ToolSpawn { .. }));
        assert_eq!(fetch_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn playlist_is_removed_after_success() {
        let (extraction, _, mux_calls) = extraction(ANCHORLESS_MANIFEST, false);

        extraction.run(&index_request(100, 102)).await.unwrap();

        let calls = mux_calls.lock().unwrap();
        assert!(!calls[0].playlist_path.exists());
    }

    #[tokio::test]
    async fn playlist_is_removed_after_mux_failure() {
        let (extraction, _, mux_calls) = extraction(ANCHORLESS_MANIFEST, true);

        let err = extraction.run(&index_request(100, 102)).await.unwrap_err();

        assert!(matches!(err, ExtractError::ToolSpawn { .. }));
        let calls = mux_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].playlist_path.exists());
    }
}
