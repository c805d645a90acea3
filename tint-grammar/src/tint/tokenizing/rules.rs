//! Include resolution
//!
//!     Rule lists contain rules and includes. [RuleIter] walks a list in declaration order
//!     and expands each include in place, depth-first, yielding only rules. Includes are
//!     looked up at match time, not inlined when the grammar is built.
//!
//!     Within one walk a rule set is expanded at most once. A second expansion could only
//!     offer rules that already failed at this offset, so skipping it changes nothing except
//!     that cyclic includes terminate.

use crate::tint::grammar::{Grammar, Item, RuleId, SetId};
use std::slice;

/// Reusable state for include resolution, owned by one cursor
#[derive(Debug)]
pub(crate) struct Resolver<'g> {
    /// Generation in which each rule set was last expanded
    marks: Vec<u32>,
    generation: u32,
    stack: Vec<slice::Iter<'g, Item>>,
}

impl<'g> Resolver<'g> {
    pub(crate) fn new(grammar: &Grammar) -> Self {
        Self {
            marks: vec![0; grammar.rule_set_count()],
            generation: 0,
            stack: Vec::new(),
        }
    }

    fn begin(&mut self, items: &'g [Item]) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.marks.fill(0);
            self.generation = 1;
        }
        self.stack.clear();
        self.stack.push(items.iter());
    }

    /// Mark `set` expanded; false if it already was during this walk
    fn visit(&mut self, set: SetId) -> bool {
        let mark = &mut self.marks[set.index()];
        if *mark == self.generation {
            false
        } else {
            *mark = self.generation;
            true
        }
    }
}

/// Rules of a list in precedence order, includes expanded
pub(crate) struct RuleIter<'r, 'g> {
    grammar: &'g Grammar,
    resolver: &'r mut Resolver<'g>,
}

impl<'r, 'g> RuleIter<'r, 'g> {
    /// Walk a region's children
    pub(crate) fn new(grammar: &'g Grammar, items: &'g [Item], resolver: &'r mut Resolver<'g>) -> Self {
        resolver.begin(items);
        Self { grammar, resolver }
    }

    /// Walk a named rule set; the set itself counts as expanded
    pub(crate) fn for_set(grammar: &'g Grammar, set: SetId, resolver: &'r mut Resolver<'g>) -> Self {
        resolver.begin(grammar.rule_set(set).items());
        resolver.visit(set);
        Self { grammar, resolver }
    }
}

impl Iterator for RuleIter<'_, '_> {
    type Item = RuleId;

    fn next(&mut self) -> Option<RuleId> {
        loop {
            let item = match self.resolver.stack.last_mut()?.next() {
                Some(item) => *item,
                None => {
                    self.resolver.stack.pop();
                    continue;
                }
            };
            match item {
                Item::Rule(rule) => return Some(rule),
                Item::Include(set) => {
                    if self.resolver.visit(set) {
                        let items = self.grammar.rule_set(set).items();
                        self.resolver.stack.push(items.iter());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tint::grammar::{Rule, RuleDefinition as R};

    fn scopes(grammar: &Grammar, ids: Vec<RuleId>) -> Vec<String> {
        ids.into_iter()
            .map(|id| match grammar.rule(id) {
                Rule::Match(rule) => rule.scope().map(|s| s.to_string()).unwrap_or_default(),
                Rule::Region(rule) => rule.scope().map(|s| s.to_string()).unwrap_or_default(),
            })
            .collect()
    }

    #[test]
    fn test_includes_expand_in_place() {
        let grammar = Grammar::build(
            vec![
                (
                    "main".to_string(),
                    vec![
                        R::matching("a", "first"),
                        R::include("inner"),
                        R::matching("c", "last"),
                    ],
                ),
                (
                    "inner".to_string(),
                    vec![R::matching("b", "inner.one"), R::matching("d", "inner.two")],
                ),
            ],
            "main",
        )
        .unwrap();
        let mut resolver = Resolver::new(&grammar);
        let ids: Vec<_> = RuleIter::for_set(&grammar, grammar.root(), &mut resolver).collect();
        assert_eq!(
            scopes(&grammar, ids),
            vec!["first", "inner.one", "inner.two", "last"]
        );
    }

    #[test]
    fn test_cycles_terminate() {
        let grammar = Grammar::build(
            vec![
                (
                    "a".to_string(),
                    vec![R::include("a"), R::include("b"), R::matching("x", "a.x")],
                ),
                (
                    "b".to_string(),
                    vec![R::include("a"), R::matching("y", "b.y")],
                ),
            ],
            "a",
        )
        .unwrap();
        let mut resolver = Resolver::new(&grammar);
        let ids: Vec<_> = RuleIter::for_set(&grammar, grammar.root(), &mut resolver).collect();
        assert_eq!(scopes(&grammar, ids), vec!["b.y", "a.x"]);

        // A second walk with the same resolver sees the same rules
        let again: Vec<_> = RuleIter::for_set(&grammar, grammar.root(), &mut resolver).collect();
        assert_eq!(scopes(&grammar, again), vec!["b.y", "a.x"]);
    }
}
