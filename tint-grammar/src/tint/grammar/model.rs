//! Grammar model
//!
//!     The built, validated form of a grammar. Rule sets, rules and patterns live in flat
//!     tables and refer to each other through small index types, so the rule graph can be
//!     cyclic without any shared ownership.

use super::pattern::Pattern;
use crate::tint::tokenizing::{self, Tokens};
use std::collections::HashMap;
use std::sync::Arc;

/// A scope name. Opaque to the engine; consumers decide what it means.
pub type Scope = Arc<str>;

/// Index of a rule set in its grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetId(pub(crate) usize);

/// Index of a rule in its grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) usize);

/// Index of a compiled pattern in its grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(pub(crate) usize);

impl SetId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl RuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl PatternId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One entry of a rule list: either a rule or a reference to a whole rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Rule(RuleId),
    Include(SetId),
}

/// Capture group scopes, sorted by group index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures(Vec<(usize, Scope)>);

impl Captures {
    pub(crate) fn new(mut groups: Vec<(usize, Scope)>) -> Self {
        groups.sort_by_key(|(group, _)| *group);
        Self(groups)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Scope)> {
        self.0.iter().map(|(group, scope)| (*group, scope))
    }

    pub fn get(&self, group: usize) -> Option<&Scope> {
        self.0
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, scope)| scope)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MatchRule {
    pub(crate) pattern: PatternId,
    pub(crate) scope: Option<Scope>,
    pub(crate) captures: Captures,
}

impl MatchRule {
    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }
}

#[derive(Debug, Clone)]
pub struct RegionRule {
    pub(crate) begin: PatternId,
    pub(crate) end: PatternId,
    pub(crate) scope: Option<Scope>,
    /// Applied only to tokens strictly between the begin and end matches
    pub(crate) content_scope: Option<Scope>,
    pub(crate) begin_captures: Captures,
    pub(crate) end_captures: Captures,
    pub(crate) children: Vec<Item>,
}

impl RegionRule {
    pub fn begin(&self) -> PatternId {
        self.begin
    }

    pub fn end(&self) -> PatternId {
        self.end
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    pub fn content_scope(&self) -> Option<&Scope> {
        self.content_scope.as_ref()
    }

    pub fn begin_captures(&self) -> &Captures {
        &self.begin_captures
    }

    pub fn end_captures(&self) -> &Captures {
        &self.end_captures
    }

    pub fn children(&self) -> &[Item] {
        &self.children
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Match(MatchRule),
    Region(RegionRule),
}

impl Rule {
    /// The pattern tested to decide whether this rule applies at an offset
    pub fn entry_pattern(&self) -> PatternId {
        match self {
            Rule::Match(rule) => rule.pattern,
            Rule::Region(rule) => rule.begin,
        }
    }

    pub fn scope(&self) -> Option<&Scope> {
        match self {
            Rule::Match(rule) => rule.scope(),
            Rule::Region(rule) => rule.scope(),
        }
    }
}

/// A named, ordered list of rules and includes
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) name: String,
    pub(crate) items: Vec<Item>,
}

impl RuleSet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

/// A validated grammar: rule sets by name plus a root.
///
/// Immutable once built. It is `Send + Sync`, so one grammar can serve any number of
/// concurrent tokenizer runs.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) name: String,
    pub(crate) root: SetId,
    pub(crate) sets: Vec<RuleSet>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) patterns: Vec<Pattern>,
    pub(crate) index: HashMap<String, SetId>,
}

impl Grammar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> SetId {
        self.root
    }

    pub fn root_set(&self) -> &RuleSet {
        self.rule_set(self.root)
    }

    /// Look up a rule set by id. Ids are only handed out by this grammar.
    pub fn rule_set(&self, id: SetId) -> &RuleSet {
        &self.sets[id.0]
    }

    pub fn rule_set_by_name(&self, name: &str) -> Option<&RuleSet> {
        self.index.get(name).map(|id| self.rule_set(*id))
    }

    /// Rule set names, sorted
    pub fn rule_set_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.index.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.0]
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.0]
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn rule_set_count(&self) -> usize {
        self.sets.len()
    }

    /// Start a tokenizer run over `text`. Each call is an independent run.
    pub fn tokenize<'g, 't>(&'g self, text: &'t str) -> Tokens<'g, 't> {
        tokenizing::tokenize(self, text)
    }
}
