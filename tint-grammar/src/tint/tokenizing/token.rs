//! Token and scope path types

use crate::tint::grammar::Scope;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// What produced a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Full match of a match rule
    Match,
    /// Begin match of a region rule
    Begin,
    /// End match of a region rule
    End,
    /// A scoped capture group; overlaps its parent token
    Capture,
    /// One character no rule matched
    Fallback,
}

impl TokenKind {
    /// Primary tokens partition the buffer; captures do not
    pub fn is_primary(self) -> bool {
        !matches!(self, TokenKind::Capture)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Match => "match",
            TokenKind::Begin => "begin",
            TokenKind::End => "end",
            TokenKind::Capture => "capture",
            TokenKind::Fallback => "fallback",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope names from the outermost enclosing region to the most specific rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScopePath(Vec<Scope>);

impl ScopePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this path with `scope` appended, or an unchanged copy for `None`
    pub fn with(&self, scope: Option<&Scope>) -> Self {
        let mut path = self.clone();
        if let Some(scope) = scope {
            path.0.push(scope.clone());
        }
        path
    }

    pub fn push(&mut self, scope: Scope) {
        self.0.push(scope);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|scope| &**scope)
    }

    /// The most specific scope, if any
    pub fn innermost(&self) -> Option<&str> {
        self.0.last().map(|scope| &**scope)
    }

    /// True if any scope on the path is `selector` or a dotted child of it, so
    /// `string` selects both `string` and `string.quoted.double`
    pub fn has_scope(&self, selector: &str) -> bool {
        self.iter().any(|scope| {
            scope == selector
                || (scope.len() > selector.len()
                    && scope.starts_with(selector)
                    && scope.as_bytes()[selector.len()] == b'.')
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<&str> {
        self.iter().collect()
    }
}

impl<'a> FromIterator<&'a str> for ScopePath {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(Scope::from).collect())
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, scope) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", scope)?;
        }
        write!(f, "]")
    }
}

/// An immutable `(span, scope path)` pair. Spans are byte offsets on char boundaries,
/// half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
    pub scopes: ScopePath,
}

impl Token {
    pub fn new(start: usize, end: usize, kind: TokenKind, scopes: ScopePath) -> Self {
        Self {
            start,
            end,
            kind,
            scopes,
        }
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The covered text. `source` must be the buffer this token came from.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_scope_matches_dotted_ancestors() {
        let path: ScopePath = ["meta.function-call", "string.quoted.double"]
            .into_iter()
            .collect();
        assert!(path.has_scope("string"));
        assert!(path.has_scope("string.quoted"));
        assert!(path.has_scope("meta.function-call"));
        assert!(!path.has_scope("str"));
        assert!(!path.has_scope("string.quoted.double.eisen"));
    }

    #[test]
    fn test_with_appends_without_mutating() {
        let base: ScopePath = ["a"].into_iter().collect();
        let extended = base.with(Some(&Scope::from("b")));
        assert_eq!(base.to_vec(), vec!["a"]);
        assert_eq!(extended.to_vec(), vec!["a", "b"]);
        assert_eq!(base.with(None), base);
        assert_eq!(extended.innermost(), Some("b"));
    }

    #[test]
    fn test_display() {
        let path: ScopePath = ["a", "b.c"].into_iter().collect();
        assert_eq!(path.to_string(), "[a, b.c]");
        assert_eq!(ScopePath::new().to_string(), "[]");
    }

    #[test]
    fn test_token_json_shape() {
        let token = Token::new(0, 4, TokenKind::Match, ["bool"].into_iter().collect());
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(
            json,
            r#"{"start":0,"end":4,"kind":"match","scopes":["bool"]}"#
        );
    }
}
