// Manifest model: derives a segment URL template and a wall-clock anchor
// from raw live playlist text.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::error::ExtractError;
use crate::window::parse_utc;

/// Sequence-number path component in segment URLs, e.g. `/sq/12345/`.
static SEQUENCE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/sq/(\d+)/").unwrap());

const PROGRAM_DATE_TIME: &str = "#EXT-X-PROGRAM-DATE-TIME:";

const PLACEHOLDER: &str = "{sq}";

/// A segment URL with the sequence-number path component replaced by a
/// placeholder. Substituting any sequence number yields the URL of that
/// segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentUrlTemplate {
    template: String,
}

impl SegmentUrlTemplate {
    /// Substitutes `index` for the placeholder.
    pub fn fill(&self, index: i64) -> String {
        self.template.replace(PLACEHOLDER, &index.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// A known pairing between a segment index and the wall-clock instant at
/// which that segment was current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePoint {
    pub segment_index: u64,
    pub wall_clock: DateTime<Utc>,
}

/// Derives the segment URL template from the first URI line of the manifest.
///
/// Every `/sq/<n>/` occurrence in that line is replaced, so templates stay
/// correct for URLs that repeat the sequence number.
pub fn extract_template_url(manifest: &str) -> Result<SegmentUrlTemplate, ExtractError> {
    for line in manifest.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !SEQUENCE_PATH.is_match(line) {
            return Err(ExtractError::manifest_format(format!(
                "segment URI has no /sq/<n>/ path component: {line}"
            )));
        }
        let template = SEQUENCE_PATH.replace_all(line, "/sq/{sq}/").into_owned();
        return Ok(SegmentUrlTemplate { template });
    }
    Err(ExtractError::manifest_format(
        "no segment URI lines in manifest",
    ))
}

/// Finds the most recent (segment index, wall clock) anchor in the manifest.
///
/// Folds over all lines: each date-time directive whose timestamp parses and
/// whose next URI line carries a sequence number replaces the previous
/// candidate, so the last complete pair wins. A directive missing either half
/// contributes nothing. `None` when no pair was ever captured; callers fall
/// back to raw segment numbers in that case.
pub fn find_reference_point(manifest: &str) -> Option<ReferencePoint> {
    let lines: Vec<&str> = manifest.lines().collect();
    lines
        .iter()
        .enumerate()
        .fold(None, |found, (i, line)| {
            let Some(value) = line.strip_prefix(PROGRAM_DATE_TIME) else {
                return found;
            };
            let Ok(wall_clock) = parse_utc(value) else {
                return found;
            };
            let Some(segment_index) = next_sequence_number(&lines[i + 1..]) else {
                return found;
            };
            Some(ReferencePoint {
                segment_index,
                wall_clock,
            })
        })
}

/// Sequence number of the nearest following URI line, if that line has one.
fn next_sequence_number(lines: &[&str]) -> Option<u64> {
    let uri = lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty() && !line.starts_with('#'))?;
    let captures = SEQUENCE_PATH.captures(uri)?;
    captures[1].parse().ok()
}
