//! # Livecut Engine
//!
//! Cuts a bounded window out of an indefinitely-growing live HLS timeline
//! and materializes it as a standalone playable file. The manifest gives us
//! two facts: a segment URL template and, when date-time tags are present, a
//! (segment index, wall clock) reference point. From those, a requested UTC
//! window (or raw segment-number window) becomes an inclusive segment range,
//! rendered as a minimal terminated playlist which an external muxer turns
//! into the output file.
//!
//! The heavy lifting at the edges is delegated: yt-dlp resolves the manifest
//! URL, ffmpeg downloads and muxes the segments. Both are behind traits so
//! the pipeline runs against fakes in tests.

pub mod config;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod muxer;
pub mod pipeline;
pub mod playlist;
mod process;
pub mod resolver;
pub mod window;

/// Re-export key types
pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use manifest::{ReferencePoint, SegmentUrlTemplate, extract_template_url, find_reference_point};
pub use pipeline::{Extraction, ExtractionRequest};
pub use playlist::build_playlist;
pub use window::{SegmentRange, WindowSpec, parse_utc, resolve_window};
