//! Fluent assertions over tokens

use super::{check_captures, check_partition};
use crate::tint::tokenizing::{Token, TokenKind};

pub struct TokensAssertion<'a> {
    pub(crate) tokens: &'a [Token],
    pub(crate) source: &'a str,
}

impl<'a> TokensAssertion<'a> {
    /// Assert the total number of tokens, captures included
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.tokens.len(),
            expected,
            "Expected {} tokens, found {}: {:#?}",
            expected,
            self.tokens.len(),
            self.describe()
        );
        self
    }

    /// Assert the number of primary (non-capture) tokens
    pub fn primary_count(self, expected: usize) -> Self {
        let actual = self.tokens.iter().filter(|t| t.kind.is_primary()).count();
        assert_eq!(
            actual,
            expected,
            "Expected {} primary tokens, found {}: {:#?}",
            expected,
            actual,
            self.describe()
        );
        self
    }

    /// Assert primary tokens partition the source and captures stay inside their parents
    pub fn covers_source(self) -> Self {
        if let Err(msg) = check_partition(self.tokens, self.source.len()) {
            panic!("{}: {:#?}", msg, self.describe());
        }
        if let Err(msg) = check_captures(self.tokens) {
            panic!("{}: {:#?}", msg, self.describe());
        }
        self
    }

    /// Run assertions on the token at `index`
    pub fn token<F, R>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(TokenAssertion<'a>) -> R,
    {
        let token = self.tokens.get(index).unwrap_or_else(|| {
            panic!(
                "Token index {} out of bounds ({} tokens): {:#?}",
                index,
                self.tokens.len(),
                self.describe()
            )
        });
        check(TokenAssertion {
            token,
            source: self.source,
            context: format!("token[{}]", index),
        });
        self
    }

    /// Run assertions on the first token whose text is exactly `text`
    pub fn find<F, R>(self, text: &str, check: F) -> Self
    where
        F: FnOnce(TokenAssertion<'a>) -> R,
    {
        let token = self
            .tokens
            .iter()
            .find(|t| t.text(self.source) == text)
            .unwrap_or_else(|| panic!("No token with text {:?}: {:#?}", text, self.describe()));
        check(TokenAssertion {
            token,
            source: self.source,
            context: format!("token {:?}", text),
        });
        self
    }

    fn describe(&self) -> Vec<String> {
        self.tokens
            .iter()
            .map(|t| {
                format!(
                    "{}..{} {} {} {:?}",
                    t.start,
                    t.end,
                    t.kind,
                    t.scopes,
                    t.text(self.source)
                )
            })
            .collect()
    }
}

pub struct TokenAssertion<'a> {
    token: &'a Token,
    source: &'a str,
    context: String,
}

impl TokenAssertion<'_> {
    pub fn span(self, start: usize, end: usize) -> Self {
        assert_eq!(
            self.token.span(),
            start..end,
            "{}: span mismatch in {:?}",
            self.context,
            self.token
        );
        self
    }

    pub fn text(self, expected: &str) -> Self {
        assert_eq!(
            self.token.text(self.source),
            expected,
            "{}: text mismatch in {:?}",
            self.context,
            self.token
        );
        self
    }

    /// Assert the full scope path, outermost first
    pub fn scopes(self, expected: &[&str]) -> Self {
        assert_eq!(
            self.token.scopes.to_vec(),
            expected,
            "{}: scope path mismatch",
            self.context
        );
        self
    }

    pub fn innermost(self, expected: &str) -> Self {
        assert_eq!(
            self.token.scopes.innermost(),
            Some(expected),
            "{}: innermost scope mismatch in {:?}",
            self.context,
            self.token
        );
        self
    }

    /// Assert some scope on the path equals `selector` or is a dotted child of it
    pub fn has_scope(self, selector: &str) -> Self {
        assert!(
            self.token.scopes.has_scope(selector),
            "{}: expected scope {:?} in {}",
            self.context,
            selector,
            self.token.scopes
        );
        self
    }

    pub fn kind(self, expected: TokenKind) -> Self {
        assert_eq!(
            self.token.kind, expected,
            "{}: kind mismatch in {:?}",
            self.context, self.token
        );
        self
    }
}
