//! Time/segment mapping.
//!
//! Converts a wall-clock window into an inclusive segment-number range using
//! a manifest reference point, or passes a raw segment-number window through
//! untouched.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ExtractError;
use crate::manifest::ReferencePoint;

/// How the caller names the slice of the live timeline to cut.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowSpec {
    /// Wall-clock window, resolved against a manifest reference point. The
    /// buffer widens the window symmetrically to absorb anchor drift.
    Time {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        buffer_seconds: f64,
    },
    /// Raw segment-number window, used verbatim.
    Index { start: i64, end: i64 },
}

impl WindowSpec {
    /// Classifies two raw boundary tokens. Both parsing as plain integers
    /// selects index mode; otherwise both must be UTC timestamps.
    pub fn from_tokens(
        start: &str,
        end: &str,
        buffer_seconds: f64,
    ) -> Result<Self, ExtractError> {
        if let (Ok(start), Ok(end)) = (start.trim().parse::<i64>(), end.trim().parse::<i64>()) {
            return Ok(Self::Index { start, end });
        }
        Ok(Self::Time {
            start: parse_utc(start)?,
            end: parse_utc(end)?,
            buffer_seconds,
        })
    }
}

/// Inclusive range of media sequence numbers. `start > end` is representable
/// and renders as an empty playlist rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    pub start: i64,
    pub end: i64,
}

impl SegmentRange {
    pub fn segment_count(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as u64 + 1
        }
    }
}

/// Parses an ISO 8601 UTC instant. Accepts a trailing `Z` or an explicit
/// offset; a bare date-time is assumed to be UTC.
pub fn parse_utc(input: &str) -> Result<DateTime<Utc>, ExtractError> {
    let trimmed = input.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = trimmed.parse::<NaiveDateTime>() {
        return Ok(naive.and_utc());
    }
    Err(ExtractError::TimestampParse {
        input: input.to_string(),
    })
}

/// Resolves a window spec to a segment range.
///
/// Index windows pass through verbatim. Time windows need `reference`; each
/// boundary becomes an offset in seconds from the anchor (widened by the
/// buffer) and is divided by the nominal segment duration. The quotient is
/// truncated toward zero for both signs, the same cast the arithmetic has
/// always used; flooring instead would shift windows that start before the
/// anchor by one segment.
pub fn resolve_window(
    spec: &WindowSpec,
    reference: Option<&ReferencePoint>,
    segment_duration: f64,
) -> Result<SegmentRange, ExtractError> {
    match *spec {
        WindowSpec::Index { start, end } => Ok(SegmentRange { start, end }),
        WindowSpec::Time {
            start,
            end,
            buffer_seconds,
        } => {
            let reference = reference.ok_or(ExtractError::NoReferencePoint)?;
            let start_offset = seconds_between(reference.wall_clock, start) - buffer_seconds;
            let end_offset = seconds_between(reference.wall_clock, end) + buffer_seconds;
            let anchor = reference.segment_index as i64;
            Ok(SegmentRange {
                start: anchor + (start_offset / segment_duration) as i64,
                end: anchor + (end_offset / segment_duration) as i64,
            })
        }
    }
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
