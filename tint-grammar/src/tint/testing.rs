//! Testing utilities for token streams
//!
//!     Token-level tests written against raw vectors tend to either compare everything
//!     (and break on any grammar tweak) or check only counts (and catch nothing). The
//!     fluent assertions here let a test state exactly what it cares about: a span, the
//!     covered text, the scope path, or a property of the whole stream.
//!
//! Usage Example
//!
//!     ```rust,ignore
//!     use tint_grammar::tint::testing::assert_tokens;
//!
//!     let tokens: Vec<_> = grammar.tokenize(source).collect();
//!     assert_tokens(&tokens, source)
//!         .covers_source()
//!         .token(0, |t| t.span(0, 4).scopes(&["bool"]))
//!         .find("main", |t| t.innermost("entity.name.function.eisen"));
//!     ```
//!
//!     The stream-wide checks ([check_partition], [check_captures]) return `Result` so
//!     property tests can feed them to `prop_assert!`.

mod token_assertions;

pub use token_assertions::{TokenAssertion, TokensAssertion};

use crate::tint::tokenizing::Token;

/// Create an assertion builder for a token stream produced from `source`
pub fn assert_tokens<'a>(tokens: &'a [Token], source: &'a str) -> TokensAssertion<'a> {
    TokensAssertion { tokens, source }
}

/// Primary (non-capture) tokens, in stream order
pub fn primary(tokens: &[Token]) -> Vec<&Token> {
    tokens.iter().filter(|t| t.kind.is_primary()).collect()
}

/// Check that the primary tokens partition `[0, len)`: sorted, adjacent, non-empty
pub fn check_partition(tokens: &[Token], len: usize) -> Result<(), String> {
    let mut expected_start = 0;
    for token in primary(tokens) {
        if token.start != expected_start {
            return Err(format!(
                "token {:?} starts at {}, expected {}",
                token, token.start, expected_start
            ));
        }
        if token.is_empty() {
            return Err(format!("empty primary token {:?}", token));
        }
        expected_start = token.end;
    }
    if expected_start != len {
        return Err(format!(
            "primary tokens end at {}, source length is {}",
            expected_start, len
        ));
    }
    Ok(())
}

/// Check that every capture token lies inside the primary token emitted just before it
pub fn check_captures(tokens: &[Token]) -> Result<(), String> {
    let mut parent: Option<&Token> = None;
    for token in tokens {
        if token.kind.is_primary() {
            parent = Some(token);
            continue;
        }
        match parent {
            Some(p) if p.start <= token.start && token.end <= p.end => {}
            Some(p) => {
                return Err(format!("capture {:?} escapes its parent {:?}", token, p));
            }
            None => return Err(format!("capture {:?} has no parent", token)),
        }
    }
    Ok(())
}
