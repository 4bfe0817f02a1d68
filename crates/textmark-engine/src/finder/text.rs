//! Text search over flattened content.

use std::fmt;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::content::TextContent;
use crate::error::{EngineError, Result};
use crate::range::{RangeDescriptor, TextRange};

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"))
}

/// Escape `query` for use as a pattern.
///
/// Leading and trailing whitespace is trimmed first. With
/// `collapse_whitespace`, every inner whitespace run becomes `\s+`, so
/// `"machine learning"` also matches `"machine\t\nlearning"`.
pub fn normalise_literal(query: &str, collapse_whitespace: bool) -> String {
    let escaped = regex::escape(query.trim());
    if collapse_whitespace {
        whitespace_regex()
            .replace_all(&escaped, r"\s+")
            .into_owned()
    } else {
        escaped
    }
}

/// Flags understood by [`Pattern::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    /// Find every non-overlapping match rather than the first one.
    pub global: bool,
    pub ignore_case: bool,
    pub multi_line: bool,
    pub dot_all: bool,
}

impl PatternFlags {
    /// Parse a flag string such as `"gi"`.
    pub fn parse(flags: &str) -> Result<Self> {
        let mut parsed = Self::default();
        let mut seen = String::new();
        for flag in flags.chars() {
            if seen.contains(flag) {
                return Err(EngineError::InvalidQuery(format!("duplicate flag '{flag}'")));
            }
            seen.push(flag);
            match flag {
                'g' => parsed.global = true,
                'i' => parsed.ignore_case = true,
                'm' => parsed.multi_line = true,
                's' => parsed.dot_all = true,
                // Patterns are always Unicode-aware.
                'u' => {}
                other => {
                    return Err(EngineError::InvalidQuery(format!("unknown flag '{other}'")));
                }
            }
        }
        Ok(parsed)
    }
}

/// A compiled search pattern with its flags.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    parsed: PatternFlags,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str, flags: &str) -> Result<Self> {
        let parsed = PatternFlags::parse(flags)?;
        let regex = RegexBuilder::new(source)
            .case_insensitive(parsed.ignore_case)
            .multi_line(parsed.multi_line)
            .dot_matches_new_line(parsed.dot_all)
            .build()?;

        Ok(Self {
            source: source.to_string(),
            flags: flags.to_string(),
            parsed,
            regex,
        })
    }

    /// Pattern matching `query` literally, with whitespace runs collapsed.
    pub fn literal(query: &str, flags: &str) -> Result<Self> {
        Self::literal_with(query, flags, true)
    }

    pub fn literal_with(query: &str, flags: &str, collapse_whitespace: bool) -> Result<Self> {
        Self::new(&normalise_literal(query, collapse_whitespace), flags)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> PatternFlags {
        self.parsed
    }

    pub fn is_global(&self) -> bool {
        self.parsed.global
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    index: usize,
    length: usize,
}

/// Finds every match of a global pattern in flattened content.
///
/// Matches are collected once, at construction; rebuild the finder to search
/// content that has since been re-flattened.
#[derive(Debug)]
pub struct TextFinder<'c> {
    content: &'c TextContent,
    results: Vec<Match>,
    current: usize,
}

impl<'c> TextFinder<'c> {
    pub fn new(content: &'c TextContent, pattern: &Pattern) -> Result<Self> {
        if !pattern.is_global() {
            return Err(EngineError::InvalidQuery(format!(
                "global flag not enabled on {pattern}"
            )));
        }

        let results = pattern
            .regex()
            .find_iter(content.text())
            .filter(|m| !m.is_empty())
            .map(|m| Match {
                index: m.start(),
                length: m.len(),
            })
            .collect::<Vec<_>>();
        log::debug!("{pattern} matched {} time(s)", results.len());

        Ok(Self {
            content,
            results,
            current: 0,
        })
    }

    /// Total number of matches, consumed or not.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn range_for(&self, m: Match) -> Option<TextRange> {
        let first = *self.content.marker_at_offset(m.index)?;
        let start = RangeDescriptor::absolute(first, m.index);

        // Reuse the start marker when the match ends inside the same leaf.
        let end = if start.offset + m.length <= first.len {
            RangeDescriptor::relative(first, start.offset + m.length - 1)
        } else {
            let last_offset = m.index + m.length - 1;
            let last = *self.content.marker_at_offset(last_offset)?;
            RangeDescriptor::absolute(last, last_offset)
        };

        TextRange::new(start, end).ok()
    }
}

impl Iterator for TextFinder<'_> {
    type Item = TextRange;

    fn next(&mut self) -> Option<TextRange> {
        let m = *self.results.get(self.current)?;
        self.current += 1;
        self.range_for(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::setup;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("test", "")]
    #[case("test", "i")]
    #[case("test", "ims")]
    fn test_non_global_pattern_is_rejected(#[case] source: &str, #[case] flags: &str) {
        let (_, content) = setup("<p>test</p>");

        let pattern = Pattern::new(source, flags).unwrap();
        assert!(matches!(
            TextFinder::new(&content, &pattern),
            Err(EngineError::InvalidQuery(_))
        ));

        let literal = Pattern::literal(source, flags).unwrap();
        assert!(TextFinder::new(&content, &literal).is_err());
    }

    #[rstest]
    #[case("g")]
    #[case("gi")]
    #[case("ig")]
    fn test_global_pattern_is_accepted(#[case] flags: &str) {
        let (_, content) = setup("<p>test</p>");
        let pattern = Pattern::literal("test", flags).unwrap();
        assert!(TextFinder::new(&content, &pattern).is_ok());
    }

    #[rstest]
    #[case("gg")]
    #[case("gy")]
    #[case("x")]
    fn test_bad_flags_are_rejected(#[case] flags: &str) {
        assert!(matches!(
            Pattern::new("test", flags),
            Err(EngineError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_invalid_regex_is_an_invalid_query() {
        assert!(matches!(
            Pattern::new("(unclosed", "g"),
            Err(EngineError::InvalidQuery(_))
        ));
    }

    #[rstest]
    #[case("   test  foo   bar")]
    #[case("test  foo   bar   ")]
    #[case("   test  foo   bar   ")]
    fn test_literal_does_not_match_surrounding_whitespace(#[case] query: &str) {
        for flags in ["g", "gi"] {
            let pattern = Pattern::literal(query, flags).unwrap();
            assert_eq!(pattern.to_string(), format!(r"/test\s+foo\s+bar/{flags}"));
        }
    }

    #[test]
    fn test_literal_escapes_metacharacters() {
        let (_, content) = setup("<p>cost (approx.) $5 + tax? [a]</p>");
        let mut finder =
            TextFinder::new(&content, &Pattern::literal("(approx.) $5 + tax?", "g").unwrap())
                .unwrap();

        let hit = finder.next().unwrap();
        assert_eq!(hit.absolute_start_offset(), 5);
        assert_eq!(hit.absolute_end_offset(), 23);
        assert!(finder.next().is_none());
    }

    #[test]
    fn test_literal_without_collapse_keeps_whitespace() {
        assert_eq!(normalise_literal(" a  b ", false), "a  b");
        assert_eq!(normalise_literal(" a  b ", true), r"a\s+b");
    }

    #[rstest]
    #[case("<p>the quick</p>")]
    #[case("<p>the\tquick</p>")]
    #[case("<p>the\n quick</p>")]
    #[case("<p>the <b> quick</b></p>")]
    fn test_whitespace_in_literal_matches_any_run(#[case] src: &str) {
        let (_, content) = setup(src);
        let pattern = Pattern::literal("the  quick", "gi").unwrap();
        assert_eq!(TextFinder::new(&content, &pattern).unwrap().len(), 1);
    }

    #[test]
    fn test_match_spanning_leaves() {
        let (dom, content) = setup("<p>The <b>quick</b> brown fox</p>");
        let pattern = Pattern::literal("quick brown", "gi").unwrap();
        let hit = TextFinder::new(&content, &pattern).unwrap().next().unwrap();

        assert_ne!(hit.start().marker, hit.end().marker);
        assert_eq!(hit.to_text(&dom, &content), Some("quick brown"));
    }

    #[test]
    fn test_match_ending_on_leaf_boundary_reuses_start_marker() {
        let (dom, content) = setup("<p>The <b>quick</b> fox</p>");
        let pattern = Pattern::literal("quick", "g").unwrap();
        let hit = TextFinder::new(&content, &pattern).unwrap().next().unwrap();

        assert_eq!(hit.start().marker, hit.end().marker);
        assert_eq!(hit.end().offset, 4);
        assert_eq!(hit.to_text(&dom, &content), Some("quick"));
    }

    #[test]
    fn test_empty_matches_are_skipped() {
        let (_, content) = setup("<p>abc</p>");
        let pattern = Pattern::new("x*", "g").unwrap();
        assert!(TextFinder::new(&content, &pattern).unwrap().is_empty());
    }

    #[test]
    fn test_user_pattern_with_multibyte_text() {
        let (dom, content) = setup("<p>café <i>crème</i> brûlée</p>");
        let pattern = Pattern::new(r"cr\w+", "g").unwrap();
        let hits: Vec<_> = TextFinder::new(&content, &pattern)
            .unwrap()
            .map(|r| r.to_text(&dom, &content).unwrap().to_string())
            .collect();
        assert_eq!(hits, vec!["crème"]);
    }
}
