//! Token stream renderers
//!
//!     Mapping scopes to styles belongs to the host application. These formats exist for
//!     inspecting what a grammar does:
//!
//!         - `simple`: one token per line, `start..end kind [scopes] "text"`
//!         - `json`: pretty-printed array of tokens

use crate::tint::tokenizing::Token;
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unknown format `{0}` (available: simple, json)")]
    UnknownFormat(String),
    #[error("failed to serialize tokens: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Simple,
    Json,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Simple, Format::Json];

    pub fn name(self) -> &'static str {
        match self {
            Format::Simple => "simple",
            Format::Json => "json",
        }
    }

    /// Render `tokens`, which must have been produced from `source`
    pub fn render(self, tokens: &[Token], source: &str) -> Result<String, FormatError> {
        match self {
            Format::Simple => Ok(render_simple(tokens, source)),
            Format::Json => Ok(serde_json::to_string_pretty(tokens)?),
        }
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name() == name)
            .ok_or_else(|| FormatError::UnknownFormat(name.to_string()))
    }
}

fn render_simple(tokens: &[Token], source: &str) -> String {
    let mut out = String::new();
    for token in tokens {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{}..{} {} {} {:?}",
            token.start,
            token.end,
            token.kind,
            token.scopes,
            token.text(source)
        );
    }
    out
}
