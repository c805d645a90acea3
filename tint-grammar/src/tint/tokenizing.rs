//! Tokenizer
//!
//!     Walks a text buffer against a [Grammar] and produces a lazy stream of scoped tokens.
//!     Every character of the buffer ends up in exactly one primary token; capture tokens
//!     are the only ones allowed to overlap, and only their own parent.
//!
//! The Algorithm
//!
//!     At each offset, with the region stack's top frame (or the root rule set) as context:
//!         1. If a region is open, its end pattern is tested first. A match emits an end
//!            token and pops the frame.
//!         2. Otherwise the context's rules are tested in declaration order, includes
//!            expanded depth-first in place (see [rules]). The first rule whose pattern
//!            matches exactly at the offset wins, even if a later rule would match more.
//!         3. A match rule emits a token for the match plus one per scoped capture group.
//!            A region rule emits its begin token and pushes a frame whose children
//!            become the context.
//!         4. If nothing matches, one character is emitted as a fallback token carrying the
//!            current scope path.
//!
//!     Regions still open at the end of the buffer are closed silently. Tokenizing never
//!     fails: input no rule recognizes degrades to fallback tokens.
//!
//! Termination
//!
//!     Match and begin patterns always consume at least one character (enforced when the
//!     grammar is built) and a fallback consumes exactly one. End patterns may match empty,
//!     but each pop is paid for by the begin that pushed the frame.

mod cursor;
mod engine;
mod rules;
pub mod token;

pub use engine::Tokens;
pub use token::{ScopePath, Token, TokenKind};

use crate::tint::grammar::Grammar;

/// Start a tokenizer run over `text`.
///
/// The returned iterator is lazy and owns its cursor; calling this again starts an
/// independent run that yields the same sequence.
pub fn tokenize<'g, 't>(grammar: &'g Grammar, text: &'t str) -> Tokens<'g, 't> {
    Tokens::new(grammar, text)
}
