//! Splitting text into plain and highlighted segments for rendering.

use serde::Serialize;

use crate::matching::MatchSpan;

/// A run of text that is either highlighted or plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'t> {
    /// The text of the run, borrowed from the input.
    pub text: &'t str,
    /// Whether the run lies inside a match span.
    pub highlighted: bool,
}

/// Split `text` into alternating plain and highlighted segments.
///
/// `highlights` are character ranges, expected sorted and non-overlapping as
/// produced by the matcher. Spans reaching past the end of `text` are
/// clamped, and spans starting before the end of the previous one are
/// trimmed to avoid repeating text. Empty segments are never emitted.
///
/// # Examples
///
/// ```
/// use fieldsearch::{MatchSpan, highlight};
///
/// let segments = highlight("John Smith", &[MatchSpan::new(0, 4)]);
/// assert_eq!(segments.len(), 2);
/// assert_eq!((segments[0].text, segments[0].highlighted), ("John", true));
/// assert_eq!((segments[1].text, segments[1].highlighted), (" Smith", false));
/// ```
pub fn highlight<'t>(text: &'t str, highlights: &[MatchSpan]) -> Vec<Segment<'t>> {
    // Byte offset of every char boundary, including the end of the string.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;

    let mut segments = Vec::with_capacity(highlights.len() * 2 + 1);
    let mut cursor = 0;

    for span in highlights {
        let start = span.start.clamp(cursor, char_len);
        let end = span.end.clamp(start, char_len);
        if start == end {
            continue;
        }
        if cursor < start {
            segments.push(Segment {
                text: &text[boundaries[cursor]..boundaries[start]],
                highlighted: false,
            });
        }
        segments.push(Segment {
            text: &text[boundaries[start]..boundaries[end]],
            highlighted: true,
        });
        cursor = end;
    }

    if cursor < char_len {
        segments.push(Segment {
            text: &text[boundaries[cursor]..],
            highlighted: false,
        });
    }
    segments
}
