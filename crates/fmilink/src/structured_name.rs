// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 fmilink contributors

//! Structured variable name grammar.
//!
//! Model variables carry dotted, optionally quoted names such as
//! `vehicle.engine.rpm` or `'bus 1'.voltage`. A quoted segment keeps its
//! surrounding quotes and `\'` escapes verbatim so the parsed path joins back
//! to the exact source string; the dot inside a quoted segment is a literal
//! character, not a separator.

use std::fmt;
use std::str::FromStr;

/// Grammar violations in a structured variable name.
///
/// Positions are character offsets into the raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameParseError {
    /// The input string was empty.
    Empty,
    /// A separator with no segment before it (leading `.` or `..`).
    EmptySegment { position: usize },
    /// The input ended directly after a separator.
    TrailingSeparator,
    /// A quoted segment was opened but never closed.
    UnterminatedQuote { position: usize },
    /// A `'` appeared inside a plain segment that was never opened.
    StrayQuote { position: usize },
    /// A `\` escape appeared outside a quoted segment.
    EscapeOutsideQuote { position: usize },
    /// A closing `'` was followed by a token character instead of `.` or end.
    UnseparatedQuote { position: usize },
}

impl fmt::Display for NameParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "variable name is empty"),
            Self::EmptySegment { position } => {
                write!(f, "empty path segment at position {}", position)
            }
            Self::TrailingSeparator => write!(f, "variable name ends with a separator"),
            Self::UnterminatedQuote { position } => {
                write!(f, "unterminated quoted segment opened at position {}", position)
            }
            Self::StrayQuote { position } => {
                write!(f, "stray quote inside plain segment at position {}", position)
            }
            Self::EscapeOutsideQuote { position } => {
                write!(f, "escape character outside quoted segment at position {}", position)
            }
            Self::UnseparatedQuote { position } => {
                write!(
                    f,
                    "quoted segment must be followed by a separator, found extra character at position {}",
                    position
                )
            }
        }
    }
}

impl std::error::Error for NameParseError {}

/// Validated hierarchical path parsed from a structured variable name.
///
/// Segments are stored exactly as written, quotes and escapes included, so
/// the path is the canonical identity of the variable's position in the
/// component namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct StructuredName {
    segments: Vec<String>,
}

impl StructuredName {
    /// Parse a raw variable name into its path segments.
    ///
    /// Grammar: `path := segment ('.' segment)*` where a segment is either a
    /// run of characters excluding `.` and `'`, or a `'`-quoted span in which
    /// `\'` is a literal quote and `.` is a literal dot.
    pub fn parse(raw: &str) -> Result<Self, NameParseError> {
        if raw.is_empty() {
            return Err(NameParseError::Empty);
        }

        let chars: Vec<char> = raw.chars().collect();
        let mut segments = Vec::new();
        let mut i = 0;

        loop {
            let start = i;
            match chars.get(i) {
                Some('.') => return Err(NameParseError::EmptySegment { position: i }),
                Some('\'') => {
                    // Quoted segment: scan to the matching unescaped quote.
                    i += 1;
                    let mut closed = false;
                    while i < chars.len() {
                        match chars[i] {
                            '\\' if chars.get(i + 1) == Some(&'\'') => i += 2,
                            '\'' => {
                                closed = true;
                                i += 1;
                                break;
                            }
                            _ => i += 1,
                        }
                    }
                    if !closed {
                        return Err(NameParseError::UnterminatedQuote { position: start });
                    }
                    if i < chars.len() && chars[i] != '.' {
                        return Err(NameParseError::UnseparatedQuote { position: i });
                    }
                }
                Some(_) => {
                    // Plain segment: anything up to the next separator.
                    while i < chars.len() && chars[i] != '.' {
                        match chars[i] {
                            '\'' => return Err(NameParseError::StrayQuote { position: i }),
                            '\\' => return Err(NameParseError::EscapeOutsideQuote { position: i }),
                            _ => i += 1,
                        }
                    }
                }
                None => return Err(NameParseError::TrailingSeparator),
            }

            segments.push(chars[start..i].iter().collect());

            if i == chars.len() {
                break;
            }
            // chars[i] is the separator.
            i += 1;
        }

        Ok(Self { segments })
    }

    /// First path segment, the topic root.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// All path segments in source order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of path segments (always >= 1).
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True when the name has a single segment (a bare scalar topic).
    pub fn is_root_only(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for StructuredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for StructuredName {
    type Err = NameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Deserialization goes through `parse` so the length and non-empty-segment
/// invariants hold for every constructed value.
impl TryFrom<String> for StructuredName {
    type Error = NameParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<StructuredName> for String {
    fn from(name: StructuredName) -> Self {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(raw: &str) -> Vec<String> {
        StructuredName::parse(raw).expect(raw).segments().to_vec()
    }

    #[test]
    fn test_single_plain_segment() {
        let name = StructuredName::parse("test1").expect("parse");
        assert_eq!(name.segments(), ["test1"]);
        assert_eq!(name.root(), "test1");
        assert!(name.is_root_only());
    }

    #[test]
    fn test_dotted_plain_segments() {
        assert_eq!(segments("test1.test2"), ["test1", "test2"]);
        assert_eq!(segments("a.b.c.d"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_quoted_segments() {
        assert_eq!(segments("'qtest1'.'qtest2'"), ["'qtest1'", "'qtest2'"]);
    }

    #[test]
    fn test_mixed_segments() {
        assert_eq!(segments("plain.'quoted'.tail"), ["plain", "'quoted'", "tail"]);
    }

    #[test]
    fn test_dot_inside_quotes_is_literal() {
        let name = StructuredName::parse("'qtest1.qtestX'").expect("parse");
        assert_eq!(name.segments(), ["'qtest1.qtestX'"]);
        assert_eq!(name.depth(), 1);
    }

    #[test]
    fn test_escaped_quote_preserved_verbatim() {
        let name = StructuredName::parse("'qtest1\\'qtestX'").expect("parse");
        assert_eq!(name.segments(), ["'qtest1\\'qtestX'"]);
    }

    #[test]
    fn test_display_reconstructs_source() {
        for raw in ["a.b.c", "'x.y'.z", "'a\\'b'.c", "solo"] {
            assert_eq!(StructuredName::parse(raw).expect(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(StructuredName::parse(""), Err(NameParseError::Empty));
    }

    #[test]
    fn test_bare_and_leading_separator() {
        assert_eq!(
            StructuredName::parse("."),
            Err(NameParseError::EmptySegment { position: 0 })
        );
        assert_eq!(
            StructuredName::parse(".test"),
            Err(NameParseError::EmptySegment { position: 0 })
        );
    }

    #[test]
    fn test_trailing_separator() {
        assert_eq!(
            StructuredName::parse("test."),
            Err(NameParseError::TrailingSeparator)
        );
        assert_eq!(
            StructuredName::parse("'test'."),
            Err(NameParseError::TrailingSeparator)
        );
    }

    #[test]
    fn test_consecutive_separators() {
        assert_eq!(
            StructuredName::parse("test1..test2"),
            Err(NameParseError::EmptySegment { position: 6 })
        );
    }

    #[test]
    fn test_quote_followed_by_token() {
        assert!(matches!(
            StructuredName::parse("'test'test"),
            Err(NameParseError::UnseparatedQuote { .. })
        ));
        assert!(matches!(
            StructuredName::parse("'test''test'"),
            Err(NameParseError::UnseparatedQuote { .. })
        ));
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            StructuredName::parse("'test"),
            Err(NameParseError::UnterminatedQuote { position: 0 })
        );
        // A trailing escaped quote never closes the segment.
        assert_eq!(
            StructuredName::parse("'test\\'"),
            Err(NameParseError::UnterminatedQuote { position: 0 })
        );
    }

    #[test]
    fn test_stray_quote_in_plain_segment() {
        assert_eq!(
            StructuredName::parse("test'"),
            Err(NameParseError::StrayQuote { position: 4 })
        );
    }

    #[test]
    fn test_escape_outside_quotes() {
        assert_eq!(
            StructuredName::parse("test\\'"),
            Err(NameParseError::EscapeOutsideQuote { position: 4 })
        );
    }

    #[test]
    fn test_from_str_round_trip() {
        let name: StructuredName = "vehicle.engine.rpm".parse().expect("parse");
        assert_eq!(name.depth(), 3);
        assert_eq!(name.root(), "vehicle");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialization_validates_grammar() {
        let name: StructuredName = serde_json::from_str("\"a.'b.c'\"").expect("deserialize");
        assert_eq!(name.segments(), ["a", "'b.c'"]);

        // Invalid names are rejected instead of producing an empty path.
        assert!(serde_json::from_str::<StructuredName>("\"\"").is_err());
        assert!(serde_json::from_str::<StructuredName>("\"a..b\"").is_err());

        let json = serde_json::to_string(&name).expect("serialize");
        assert_eq!(json, "\"a.'b.c'\"");
    }
}
