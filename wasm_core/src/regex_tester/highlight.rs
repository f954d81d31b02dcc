use serde::Serialize;
use tracing::trace;

use super::matcher::MatchResult;

/// A slice of the subject, flagged when it belongs to a match.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSegment {
    pub text: String,
    pub is_match: bool,
    /// Position of the match in the list passed to [`highlight`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_index: Option<usize>,
}

impl HighlightSegment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_match: false,
            match_index: None,
        }
    }
}

/// Partitions `subject` into matched and unmatched segments.
///
/// `matches` must be sorted by start offset, as `find_all` returns them.
/// Spans that overlap earlier output or do not fall on character boundaries
/// inside the subject are skipped, so concatenating the segment texts always
/// yields `subject`.
pub fn highlight(subject: &str, matches: &[MatchResult]) -> Vec<HighlightSegment> {
    let mut segments = Vec::with_capacity(matches.len() * 2 + 1);
    let mut last = 0;

    for (index, found) in matches.iter().enumerate() {
        let (start, end) = (found.start, found.end());
        let text = match subject.get(start..end) {
            Some(text) if start >= last => text,
            _ => {
                trace!(index, start, end, "skipping span outside the partition");
                continue;
            }
        };
        if start > last {
            segments.push(HighlightSegment::plain(&subject[last..start]));
        }
        segments.push(HighlightSegment {
            text: text.to_string(),
            is_match: true,
            match_index: Some(index),
        });
        last = end;
    }

    if last < subject.len() || segments.is_empty() {
        segments.push(HighlightSegment::plain(&subject[last..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(text: &str, start: usize) -> MatchResult {
        MatchResult {
            matched_text: text.to_string(),
            start,
            groups: Vec::new(),
        }
    }

    fn joined(segments: &[HighlightSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn no_matches_yields_single_plain_segment() {
        assert_eq!(highlight("abc", &[]), [HighlightSegment::plain("abc")]);
        assert_eq!(highlight("", &[]), [HighlightSegment::plain("")]);
    }

    #[test]
    fn gaps_and_tail_surround_matches() {
        let segments = highlight("a1 b22", &[found("1", 1), found("22", 4)]);
        let shape: Vec<(&str, bool)> = segments
            .iter()
            .map(|s| (s.text.as_str(), s.is_match))
            .collect();
        assert_eq!(
            shape,
            [("a", false), ("1", true), (" b", false), ("22", true)]
        );
        assert_eq!(segments[3].match_index, Some(1));
    }

    #[test]
    fn adjacent_matches_have_no_gap_segment() {
        let segments = highlight("aab", &[found("a", 0), found("a", 1)]);
        assert_eq!(segments.len(), 3);
        assert_eq!(joined(&segments), "aab");
    }

    #[test]
    fn overlapping_and_out_of_range_spans_are_skipped() {
        let segments = highlight(
            "abcdef",
            &[found("abc", 0), found("bc", 1), found("zz", 10), found("f", 5)],
        );
        assert_eq!(joined(&segments), "abcdef");
        let indices: Vec<usize> = segments.iter().filter_map(|s| s.match_index).collect();
        assert_eq!(indices, [0, 3]);
    }

    #[test]
    fn split_characters_are_skipped() {
        // byte 1 is inside 'é'
        let segments = highlight("éa", &[found("x", 1)]);
        assert_eq!(segments, [HighlightSegment::plain("éa")]);
    }
}
