//! Source reference strings.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Prefix marking a string as a source reference.
pub const SOURCE_PREFIX: &str = "src:";

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)^src:([0-9]*)(.*)$").unwrap())
}

/// A parsed `src:<line><path>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    /// Source file path
    pub path: String,
    /// 1-based line, `-1` when the reference carries none
    pub line: i32,
}

impl SourceReference {
    /// Create a reference.
    pub fn new(path: impl Into<String>, line: i32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Parse a reference string.
    ///
    /// Leading digits after the prefix are the line number; the trimmed
    /// remainder is the path. A missing or overflowing line number gives
    /// `-1` and the path is still returned, since an index may match by path
    /// alone. Returns `None` for strings without the `src:` prefix.
    ///
    /// # Example
    ///
    /// ```
    /// use folio::source::SourceReference;
    ///
    /// let reference = SourceReference::parse("src:1111myfile.tex").unwrap();
    /// assert_eq!(reference.line, 1111);
    /// assert_eq!(reference.path, "myfile.tex");
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let caps = reference_pattern().captures(s)?;
        let line = caps[1].parse::<i32>().unwrap_or(-1);
        let path = caps[2].trim();
        Some(Self::new(path, line))
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line >= 0 {
            write!(f, "{}{}{}", SOURCE_PREFIX, self.line, self.path)
        } else {
            write!(f, "{}{}", SOURCE_PREFIX, self.path)
        }
    }
}
