//! Grammar construction errors

use thiserror::Error;

/// Errors raised while building a [Grammar](super::Grammar).
///
/// Building is all or nothing: when any of these is returned no grammar exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// An include (or the root name) refers to a rule set that is not defined
    #[error("rule set `{referrer}` references undefined rule set `{name}`")]
    UnresolvedReference { referrer: String, name: String },

    /// A match or begin pattern can match without consuming input
    #[error("pattern `{pattern}` in rule set `{rule_set}` can match an empty string")]
    EmptyPattern { rule_set: String, pattern: String },

    /// A pattern does not compile, or a capture names a group the pattern does not have
    #[error("invalid pattern `{pattern}` in rule set `{rule_set}`: {reason}")]
    InvalidPattern {
        rule_set: String,
        pattern: String,
        reason: String,
    },
}

impl GrammarError {
    /// Name of the rule set the error was found in
    pub fn rule_set(&self) -> &str {
        match self {
            GrammarError::UnresolvedReference { referrer, .. } => referrer,
            GrammarError::EmptyPattern { rule_set, .. }
            | GrammarError::InvalidPattern { rule_set, .. } => rule_set,
        }
    }
}
