//! Compiled patterns
//!
//!     Patterns use `regex` syntax in multi-line mode, so `^` and `$` match at line
//!     boundaries anywhere in the buffer. Alongside the compiled regex we keep the minimum
//!     length of any match, computed from the pattern's HIR. That is what lets the builder
//!     reject patterns that could match without consuming input.

use regex::{Regex, RegexBuilder};
use regex_syntax::ParserBuilder;

/// A compiled regular expression plus the facts the builder needs about it
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    /// `None` when the pattern can never match
    minimum_len: Option<usize>,
}

impl Pattern {
    /// Compile a pattern, returning the regex error message on failure
    pub fn compile(source: &str) -> Result<Self, String> {
        let hir = ParserBuilder::new()
            .multi_line(true)
            .build()
            .parse(source)
            .map_err(|e| e.to_string())?;
        let regex = RegexBuilder::new(source)
            .multi_line(true)
            .build()
            .map_err(|e| e.to_string())?;

        Ok(Self {
            source: source.to_string(),
            regex,
            minimum_len: hir.properties().minimum_len(),
        })
    }

    /// The pattern text as authored
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// True if some input lets this pattern match zero characters
    pub fn can_match_empty(&self) -> bool {
        self.minimum_len == Some(0)
    }

    /// Number of explicit capture groups (group 0, the whole match, is not counted)
    pub fn group_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }
}
