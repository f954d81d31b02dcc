use regex::{Captures, Match, Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use super::flags::RegexFlags;
use crate::error::{Result, ToolError};

/// Limits applied while compiling and searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TesterConfig {
    /// Upper bound on the compiled program size in bytes (default: 10 MiB)
    pub size_limit: usize,
    /// Maximum number of matches reported in global mode (default: 10000)
    pub match_limit: usize,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            size_limit: 10 * (1 << 20),
            match_limit: 10_000,
        }
    }
}

/// A pattern compiled together with the flags that drive the search loop.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    flags: RegexFlags,
    match_limit: usize,
}

/// One match of the pattern in the subject.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub matched_text: String,
    /// Byte offset of the match in the subject
    pub start: usize,
    /// One entry per capture group; `None` when the group did not participate
    pub groups: Vec<Option<String>>,
}

impl MatchResult {
    /// Byte offset just past the match.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.matched_text.len())
    }

    pub fn is_empty(&self) -> bool {
        self.matched_text.is_empty()
    }
}

impl CompiledPattern {
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    /// Number of capture groups, not counting the implicit whole-match group.
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Names of the capture groups in pattern order (`None` for unnamed groups).
    pub fn group_names(&self) -> Vec<Option<&str>> {
        self.regex.capture_names().skip(1).collect()
    }

    fn captures<'p, 'h>(&'p self, subject: &'h str) -> CaptureWalk<'p, 'h> {
        CaptureWalk {
            pattern: self,
            subject,
            cursor: 0,
            done: false,
        }
    }
}

pub fn compile(pattern: &str, flags: RegexFlags) -> Result<CompiledPattern> {
    compile_with(pattern, flags, &TesterConfig::default())
}

pub fn compile_with(
    pattern: &str,
    flags: RegexFlags,
    config: &TesterConfig,
) -> Result<CompiledPattern> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(flags.ignore_case)
        .multi_line(flags.multiline)
        .dot_matches_new_line(flags.dot_all)
        .size_limit(config.size_limit)
        .build()
        .map_err(|err| {
            debug!(%flags, "pattern rejected: {err}");
            ToolError::from(err)
        })?;
    Ok(CompiledPattern {
        regex,
        flags,
        match_limit: config.match_limit,
    })
}

/// Finds the first match, or every non-overlapping match when `global` is set.
pub fn find_all(pattern: &CompiledPattern, subject: &str) -> Vec<MatchResult> {
    let mut matches = Vec::new();
    for (whole, caps) in pattern.captures(subject) {
        if matches.len() == pattern.match_limit {
            debug!(limit = pattern.match_limit, "match list truncated");
            break;
        }
        let groups = caps
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect();
        matches.push(MatchResult {
            matched_text: whole.as_str().to_string(),
            start: whole.start(),
            groups,
        });
    }
    matches
}

/// Replaces the matches `find_all` would report. `$1`, `${name}` and `$$` are expanded.
pub fn replace(pattern: &CompiledPattern, subject: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(subject.len());
    let mut last = 0;
    for (whole, caps) in pattern.captures(subject).take(pattern.match_limit) {
        out.push_str(&subject[last..whole.start()]);
        caps.expand(replacement, &mut out);
        last = whole.end();
    }
    out.push_str(&subject[last..]);
    out
}

/// Search loop shared by `find_all` and `replace`.
///
/// The cursor never moves backwards. After an empty match it steps over one
/// full character so the next search cannot land on the same position.
struct CaptureWalk<'p, 'h> {
    pattern: &'p CompiledPattern,
    subject: &'h str,
    cursor: usize,
    done: bool,
}

impl<'h> Iterator for CaptureWalk<'_, 'h> {
    type Item = (Match<'h>, Captures<'h>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor > self.subject.len() {
            return None;
        }
        let flags = self.pattern.flags;
        let Some(caps) = self.pattern.regex.captures_at(self.subject, self.cursor) else {
            self.done = true;
            return None;
        };
        let whole = caps.get(0)?;
        if flags.sticky && whole.start() != self.cursor {
            self.done = true;
            return None;
        }
        if !flags.global {
            self.done = true;
        } else if whole.is_empty() {
            self.cursor = next_boundary(self.subject, whole.end());
        } else {
            self.cursor = whole.end();
        }
        Some((whole, caps))
    }
}

/// Offset of the character after `pos`, or `pos + 1` at the end of the subject.
fn next_boundary(subject: &str, pos: usize) -> usize {
    pos + subject[pos..].chars().next().map_or(1, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global() -> RegexFlags {
        RegexFlags {
            global: true,
            ..RegexFlags::default()
        }
    }

    fn texts(matches: &[MatchResult]) -> Vec<&str> {
        matches.iter().map(|m| m.matched_text.as_str()).collect()
    }

    #[test]
    fn global_digits_scenario() {
        let pattern = compile(r"\d+", global()).unwrap();
        let matches = find_all(&pattern, "a1 b22 c333");
        assert_eq!(texts(&matches), ["1", "22", "333"]);
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, [1, 4, 8]);
    }

    #[test]
    fn non_global_returns_first_match_only() {
        let pattern = compile(r"\d+", RegexFlags::default()).unwrap();
        let matches = find_all(&pattern, "a1 b22");
        assert_eq!(texts(&matches), ["1"]);
        assert!(find_all(&pattern, "none").is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        let pattern = compile("xyz", global()).unwrap();
        assert!(find_all(&pattern, "abc").is_empty());
    }

    #[test]
    fn empty_pattern_matches_between_every_character() {
        let pattern = compile("", global()).unwrap();
        let matches = find_all(&pattern, "abc");
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, [0, 1, 2, 3]);
        assert!(matches.iter().all(MatchResult::is_empty));
    }

    #[test]
    fn zero_length_steps_over_whole_characters() {
        let pattern = compile("", global()).unwrap();
        let matches = find_all(&pattern, "é😀");
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, [0, 2, 6]);
    }

    #[test]
    fn star_reports_empty_match_after_a_run() {
        let pattern = compile("a*", global()).unwrap();
        let matches = find_all(&pattern, "aab");
        let spans: Vec<(usize, &str)> = matches
            .iter()
            .map(|m| (m.start, m.matched_text.as_str()))
            .collect();
        assert_eq!(spans, [(0, "aa"), (2, ""), (3, "")]);
    }

    #[test]
    fn optional_groups_are_reported_as_none() {
        let pattern = compile(r"(a)(b)?(?P<tail>c)", global()).unwrap();
        let matches = find_all(&pattern, "ac abc");
        assert_eq!(
            matches[0].groups,
            [Some("a".to_string()), None, Some("c".to_string())]
        );
        assert_eq!(matches[1].groups[1].as_deref(), Some("b"));
        assert_eq!(pattern.capture_count(), 3);
        assert_eq!(pattern.group_names(), [None, None, Some("tail")]);
    }

    #[test]
    fn flags_map_to_engine_options() {
        let ci = compile(
            "hello",
            RegexFlags {
                ignore_case: true,
                ..RegexFlags::default()
            },
        )
        .unwrap();
        assert_eq!(texts(&find_all(&ci, "HeLLo")), ["HeLLo"]);

        let multi = compile(
            "^b$",
            RegexFlags {
                global: true,
                multiline: true,
                ..RegexFlags::default()
            },
        )
        .unwrap();
        assert_eq!(find_all(&multi, "a\nb\nc").len(), 1);

        let dot = compile(
            "a.b",
            RegexFlags {
                dot_all: true,
                ..RegexFlags::default()
            },
        )
        .unwrap();
        assert_eq!(find_all(&dot, "a\nb").len(), 1);
        let plain = compile("a.b", RegexFlags::default()).unwrap();
        assert!(find_all(&plain, "a\nb").is_empty());
    }

    #[test]
    fn sticky_requires_adjacent_matches() {
        let sticky_global = RegexFlags {
            global: true,
            sticky: true,
            ..RegexFlags::default()
        };
        let pattern = compile(r"\d", sticky_global).unwrap();
        assert_eq!(texts(&find_all(&pattern, "12a3")), ["1", "2"]);

        let sticky = RegexFlags {
            sticky: true,
            ..RegexFlags::default()
        };
        let pattern = compile(r"\d", sticky).unwrap();
        assert!(find_all(&pattern, "a1").is_empty());
    }

    #[test]
    fn invalid_patterns_fail_with_engine_message() {
        for bad in ["(", "a)", r"\p{Nope}", "[z-a]"] {
            match compile(bad, RegexFlags::default()) {
                Err(ToolError::PatternSyntax(msg)) => assert!(!msg.is_empty()),
                other => panic!("{bad:?} gave {other:?}"),
            }
        }
    }

    #[test]
    fn size_limit_is_enforced() {
        let config = TesterConfig {
            size_limit: 64,
            ..TesterConfig::default()
        };
        let err = compile_with(r"\w{50}", RegexFlags::default(), &config).unwrap_err();
        assert!(matches!(err, ToolError::PatternSyntax(_)));
    }

    #[test]
    fn match_limit_truncates_global_results() {
        let config = TesterConfig {
            match_limit: 2,
            ..TesterConfig::default()
        };
        let pattern = compile_with("a", global(), &config).unwrap();
        assert_eq!(find_all(&pattern, "aaaa").len(), 2);
    }

    #[test]
    fn replace_expands_groups() {
        let pattern = compile(r"(?P<k>\w+)=(\d+)", global()).unwrap();
        assert_eq!(replace(&pattern, "a=1, b=22", "$2:${k}"), "1:a, 22:b");

        let first = compile(r"\d", RegexFlags::default()).unwrap();
        assert_eq!(replace(&first, "1 2 3", "#"), "# 2 3");
        assert_eq!(replace(&first, "none", "#"), "none");
    }

    #[test]
    fn replace_handles_empty_matches() {
        let pattern = compile("", global()).unwrap();
        assert_eq!(replace(&pattern, "ab", "-"), "-a-b-");
    }
}
