//! Grammar authoring format
//!
//!     Grammars are written as data: a map from rule set name to an ordered list of rule
//!     definitions, plus the root set's name. In YAML:
//!
//!     ```yaml
//!     name: example
//!     root: source
//!     rule_sets:
//!       source:
//!         - include: strings
//!         - match: '\b(true|false)\b'
//!           scope: constant.language.boolean
//!       strings:
//!         - begin: '"'
//!           end: '"'
//!           scope: string.quoted.double
//!           children:
//!             - match: '\\.'
//!               scope: constant.character.escape
//!     ```
//!
//!     A rule definition is told apart by its keys: `include`, `match`, or `begin`/`end`.
//!     Captures map a group index (0 is the whole match) to a scope.

use super::error::GrammarError;
use super::model::Grammar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered rules of one rule set
pub type RuleSetDefinition = Vec<RuleDefinition>;

/// A complete grammar as authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarDefinition {
    pub name: String,
    pub root: String,
    pub rule_sets: BTreeMap<String, RuleSetDefinition>,
}

impl GrammarDefinition {
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            rule_sets: BTreeMap::new(),
        }
    }

    /// Add (or replace) a rule set
    pub fn with_rule_set(mut self, name: impl Into<String>, rules: RuleSetDefinition) -> Self {
        self.rule_sets.insert(name.into(), rules);
        self
    }

    /// Validate and build the grammar
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        Grammar::build_named(
            self.name.clone(),
            self.rule_sets
                .iter()
                .map(|(name, rules)| (name.clone(), rules.clone())),
            &self.root,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleDefinition {
    Include(IncludeDefinition),
    Match(MatchDefinition),
    Region(RegionDefinition),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncludeDefinition {
    pub include: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchDefinition {
    #[serde(rename = "match")]
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(
        default,
        deserialize_with = "capture_groups::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub captures: BTreeMap<usize, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionDefinition {
    pub begin: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_scope: Option<String>,
    #[serde(
        default,
        deserialize_with = "capture_groups::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub begin_captures: BTreeMap<usize, String>,
    #[serde(
        default,
        deserialize_with = "capture_groups::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub end_captures: BTreeMap<usize, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RuleDefinition>,
}

impl RuleDefinition {
    /// A reference to another rule set
    pub fn include(name: impl Into<String>) -> Self {
        RuleDefinition::Include(IncludeDefinition {
            include: name.into(),
        })
    }

    /// A match rule scoping the whole match
    pub fn matching(pattern: impl Into<String>, scope: impl Into<String>) -> Self {
        RuleDefinition::Match(MatchDefinition {
            pattern: pattern.into(),
            scope: Some(scope.into()),
            captures: BTreeMap::new(),
        })
    }

    /// A region rule without children
    pub fn region(
        begin: impl Into<String>,
        end: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        RuleDefinition::Region(RegionDefinition {
            begin: begin.into(),
            end: end.into(),
            scope: Some(scope.into()),
            content_scope: None,
            begin_captures: BTreeMap::new(),
            end_captures: BTreeMap::new(),
            children: Vec::new(),
        })
    }

    /// Set the children of a region rule. No effect on other rules.
    pub fn with_children(mut self, rules: Vec<RuleDefinition>) -> Self {
        if let RuleDefinition::Region(region) = &mut self {
            region.children = rules;
        }
        self
    }

    /// Scope a capture group. For regions this applies to the begin match.
    pub fn with_capture(mut self, group: usize, scope: impl Into<String>) -> Self {
        match &mut self {
            RuleDefinition::Match(rule) => {
                rule.captures.insert(group, scope.into());
            }
            RuleDefinition::Region(region) => {
                region.begin_captures.insert(group, scope.into());
            }
            RuleDefinition::Include(_) => {}
        }
        self
    }

    /// Scope a capture group of a region's end match
    pub fn with_end_capture(mut self, group: usize, scope: impl Into<String>) -> Self {
        if let RuleDefinition::Region(region) = &mut self {
            region.end_captures.insert(group, scope.into());
        }
        self
    }

    pub fn with_content_scope(mut self, scope: impl Into<String>) -> Self {
        if let RuleDefinition::Region(region) = &mut self {
            region.content_scope = Some(scope.into());
        }
        self
    }
}

/// Capture maps accept integer keys (YAML) and numeric string keys (JSON object keys).
/// Untagged enums buffer their input, which loses serde_json's key coercion, hence the
/// explicit visitor.
mod capture_groups {
    use serde::de::{Error, MapAccess, Visitor};
    use serde::{Deserialize, Deserializer};
    use std::collections::BTreeMap;
    use std::fmt;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum GroupKey {
        Index(usize),
        Text(String),
    }

    struct CapturesVisitor;

    impl<'de> Visitor<'de> for CapturesVisitor {
        type Value = BTreeMap<usize, String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from capture group index to scope")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut captures = BTreeMap::new();
            while let Some((key, scope)) = map.next_entry::<GroupKey, String>()? {
                let group = match key {
                    GroupKey::Index(group) => group,
                    GroupKey::Text(text) => text.trim().parse().map_err(|_| {
                        A::Error::custom(format!("capture group `{}` is not an index", text))
                    })?,
                };
                captures.insert(group, scope);
            }
            Ok(captures)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<usize, String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CapturesVisitor)
    }
}
