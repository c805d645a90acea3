//! Grammar construction and validation
//!
//!     Building turns definitions into a [Grammar]: names become ids, patterns are
//!     compiled and scopes are interned. Validation happens in the same pass:
//!
//!         - every include, and the root, must name a defined rule set
//!           ([GrammarError::UnresolvedReference])
//!         - match patterns and region begin patterns must consume at least one character
//!           ([GrammarError::EmptyPattern]). A region end pattern may match the empty
//!           string, the non-empty begin that opened the region guarantees progress
//!         - patterns must compile and captures must name existing groups
//!           ([GrammarError::InvalidPattern])
//!
//!     Rule sets are processed in name order, so ids are stable for a given input.

use super::definition::{RuleDefinition, RuleSetDefinition};
use super::error::GrammarError;
use super::model::{
    Captures, Grammar, Item, MatchRule, PatternId, RegionRule, Rule, RuleId, RuleSet, Scope,
    SetId,
};
use super::pattern::Pattern;
use std::collections::{BTreeMap, HashMap};

/// Which role a pattern plays; only end patterns may match the empty string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternRole {
    Match,
    Begin,
    End,
}

impl Grammar {
    /// Build a grammar named after its root rule set
    pub fn build<I>(rule_sets: I, root: &str) -> Result<Grammar, GrammarError>
    where
        I: IntoIterator<Item = (String, RuleSetDefinition)>,
    {
        Grammar::build_named(root.to_string(), rule_sets, root)
    }

    /// Build a grammar from rule set definitions and the name of the root set
    pub fn build_named<I>(
        name: impl Into<String>,
        rule_sets: I,
        root: &str,
    ) -> Result<Grammar, GrammarError>
    where
        I: IntoIterator<Item = (String, RuleSetDefinition)>,
    {
        let name = name.into();
        let definitions: BTreeMap<String, RuleSetDefinition> = rule_sets.into_iter().collect();
        log::debug!(
            "building grammar `{}` ({} rule sets, root `{}`)",
            name,
            definitions.len(),
            root
        );

        let index: HashMap<String, SetId> = definitions
            .keys()
            .enumerate()
            .map(|(i, set_name)| (set_name.clone(), SetId(i)))
            .collect();
        let root = *index
            .get(root)
            .ok_or_else(|| GrammarError::UnresolvedReference {
                referrer: name.clone(),
                name: root.to_string(),
            })?;

        let mut builder = Builder::new(&index);
        let mut sets = Vec::with_capacity(definitions.len());
        for (set_name, rules) in &definitions {
            builder.current = set_name.clone();
            let items = builder.items(rules)?;
            sets.push(RuleSet {
                name: set_name.clone(),
                items,
            });
        }

        log::debug!(
            "built grammar `{}`: {} rules, {} patterns",
            name,
            builder.rules.len(),
            builder.patterns.len()
        );
        Ok(Grammar {
            name,
            root,
            sets,
            rules: builder.rules,
            patterns: builder.patterns,
            index,
        })
    }
}

struct Builder<'a> {
    index: &'a HashMap<String, SetId>,
    rules: Vec<Rule>,
    patterns: Vec<Pattern>,
    scopes: HashMap<String, Scope>,
    /// Rule set being built, for error context
    current: String,
}

impl<'a> Builder<'a> {
    fn new(index: &'a HashMap<String, SetId>) -> Self {
        Self {
            index,
            rules: Vec::new(),
            patterns: Vec::new(),
            scopes: HashMap::new(),
            current: String::new(),
        }
    }

    fn items(&mut self, rules: &[RuleDefinition]) -> Result<Vec<Item>, GrammarError> {
        rules.iter().map(|rule| self.item(rule)).collect()
    }

    fn item(&mut self, definition: &RuleDefinition) -> Result<Item, GrammarError> {
        let rule = match definition {
            RuleDefinition::Include(include) => {
                let set = self.index.get(&include.include).ok_or_else(|| {
                    GrammarError::UnresolvedReference {
                        referrer: self.current.clone(),
                        name: include.include.clone(),
                    }
                })?;
                return Ok(Item::Include(*set));
            }
            RuleDefinition::Match(rule) => {
                let pattern = self.pattern(&rule.pattern, PatternRole::Match)?;
                Rule::Match(MatchRule {
                    pattern,
                    scope: self.scope(rule.scope.as_deref()),
                    captures: self.captures(&rule.captures, pattern)?,
                })
            }
            RuleDefinition::Region(region) => {
                let begin = self.pattern(&region.begin, PatternRole::Begin)?;
                let end = self.pattern(&region.end, PatternRole::End)?;
                Rule::Region(RegionRule {
                    begin,
                    end,
                    scope: self.scope(region.scope.as_deref()),
                    content_scope: self.scope(region.content_scope.as_deref()),
                    begin_captures: self.captures(&region.begin_captures, begin)?,
                    end_captures: self.captures(&region.end_captures, end)?,
                    children: self.items(&region.children)?,
                })
            }
        };
        self.rules.push(rule);
        Ok(Item::Rule(RuleId(self.rules.len() - 1)))
    }

    fn pattern(&mut self, source: &str, role: PatternRole) -> Result<PatternId, GrammarError> {
        let pattern = Pattern::compile(source).map_err(|reason| GrammarError::InvalidPattern {
            rule_set: self.current.clone(),
            pattern: source.to_string(),
            reason,
        })?;
        if role != PatternRole::End && pattern.can_match_empty() {
            return Err(GrammarError::EmptyPattern {
                rule_set: self.current.clone(),
                pattern: source.to_string(),
            });
        }
        self.patterns.push(pattern);
        Ok(PatternId(self.patterns.len() - 1))
    }

    fn captures(
        &mut self,
        groups: &BTreeMap<usize, String>,
        pattern: PatternId,
    ) -> Result<Captures, GrammarError> {
        let available = self.patterns[pattern.0].group_count();
        let mut captures = Vec::with_capacity(groups.len());
        for (group, scope) in groups {
            if *group > available {
                return Err(GrammarError::InvalidPattern {
                    rule_set: self.current.clone(),
                    pattern: self.patterns[pattern.0].source().to_string(),
                    reason: format!(
                        "capture group {} does not exist (pattern has {})",
                        group, available
                    ),
                });
            }
            captures.push((*group, self.intern(scope)));
        }
        Ok(Captures::new(captures))
    }

    fn scope(&mut self, name: Option<&str>) -> Option<Scope> {
        name.map(|name| self.intern(name))
    }

    fn intern(&mut self, name: &str) -> Scope {
        self.scopes
            .entry(name.to_string())
            .or_insert_with(|| Scope::from(name))
            .clone()
    }
}
