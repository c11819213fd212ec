use crate::manifest::SegmentUrlTemplate;
use crate::window::SegmentRange;

/// Version tag emitted in the playlist header.
const HLS_VERSION: u32 = 3;

/// Renders a bounded, terminated media playlist covering `range`.
///
/// Total: an inverted range simply produces a playlist with no segment
/// entries, which the muxer then rejects on its own terms.
pub fn build_playlist(
    template: &SegmentUrlTemplate,
    range: SegmentRange,
    segment_duration: f64,
) -> String {
    let mut out = String::new();
    out.push_str("#EXTM3U\n");
    out.push_str(&format!("#EXT-X-VERSION:{HLS_VERSION}\n"));
    out.push_str(&format!(
        "#EXT-X-TARGETDURATION:{}\n",
        segment_duration as u64
    ));
    out.push_str(&format!("#EXT-X-MEDIA-SEQUENCE:{}\n", range.start));
    for sq in range.start..=range.end {
        out.push_str(&format!("#EXTINF:{segment_duration:.3},\n"));
        out.push_str(&template.fill(sq));
        out.push('\n');
    }
    out.push_str("#EXT-X-ENDLIST\n");
    out
}
