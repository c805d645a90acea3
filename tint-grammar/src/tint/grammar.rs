//! Grammar
//!
//!     A grammar is a named, mutually recursive set of rule sets plus the name of the root
//!     set. It is pure data: the tokenizer consults it, nothing ever mutates it after it has
//!     been built.
//!
//! Rules
//!
//!     There are two kinds of rules:
//!         - Match rules: a single pattern, an optional scope for the whole match and
//!           optional scopes for capture groups.
//!         - Region rules: a begin and an end pattern, a scope for the whole region and a
//!           list of child rules that only apply between begin and end. Children may
//!           include any rule set, including the one the region was declared in.
//!
//!     Rule sets are ordered. Order is precedence: the first rule that matches at an offset
//!     wins, regardless of how long a later rule's match would have been.
//!
//! References
//!
//!     Rule sets reference each other by name (`include`). References are resolved to ids
//!     when the grammar is built and looked up when the tokenizer runs, never inlined, so
//!     cycles cost nothing structurally. See [builder] for the validation done at build
//!     time and [definition] for the authoring format.

pub mod builder;
pub mod definition;
pub mod error;
pub mod model;
pub mod pattern;

pub use definition::{
    GrammarDefinition, IncludeDefinition, MatchDefinition, RegionDefinition, RuleDefinition,
    RuleSetDefinition,
};
pub use error::GrammarError;
pub use model::{
    Captures, Grammar, Item, MatchRule, PatternId, RegionRule, Rule, RuleId, RuleSet, Scope,
    SetId,
};
pub use pattern::Pattern;
