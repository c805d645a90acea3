//! The token stream

use super::cursor::{Frame, MatcherCursor};
use super::rules::RuleIter;
use super::token::{ScopePath, Token, TokenKind};
use crate::tint::grammar::{Captures, Grammar, Rule, RuleId};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Lazy sequence of tokens for one buffer.
///
/// Each step of the cursor produces one primary token (sometimes none, when an empty
/// end match closes a region) plus any capture tokens, queued here until consumed.
pub struct Tokens<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    cursor: MatcherCursor<'g>,
    pending: VecDeque<Token>,
}

impl<'g, 't> Tokens<'g, 't> {
    pub(crate) fn new(grammar: &'g Grammar, text: &'t str) -> Self {
        Self {
            grammar,
            text,
            cursor: MatcherCursor::new(grammar),
            pending: VecDeque::new(),
        }
    }

    /// Byte offset the cursor has reached (tokens before it may still be queued)
    pub fn offset(&self) -> usize {
        self.cursor.offset
    }

    /// Number of regions currently open
    pub fn depth(&self) -> usize {
        self.cursor.frames.len()
    }

    pub fn source(&self) -> &'t str {
        self.text
    }

    /// Advance the cursor once. False when the buffer is exhausted.
    fn step(&mut self) -> bool {
        let offset = self.cursor.offset;
        if offset >= self.text.len() {
            if !self.cursor.frames.is_empty() {
                log::trace!(
                    "closing {} unterminated region(s) at end of input",
                    self.cursor.frames.len()
                );
                self.cursor.frames.clear();
            }
            return false;
        }

        if self.close_region(offset) || self.apply_rules(offset) {
            return true;
        }
        self.fallback(offset);
        true
    }

    /// Test the innermost open region's end pattern at `offset`
    fn close_region(&mut self, offset: usize) -> bool {
        let grammar = self.grammar;
        let Some(rule) = self.cursor.frames.last().map(|frame| frame.rule) else {
            return false;
        };
        let Some(caps) = self
            .cursor
            .lookahead
            .match_at(grammar, rule.end(), self.text, offset)
        else {
            return false;
        };
        let Some(whole) = caps.get(0) else {
            return false;
        };
        let Some(frame) = self.cursor.frames.pop() else {
            return false;
        };

        log::trace!(
            "closing region {:?} at {}..{} (depth {})",
            rule.scope(),
            whole.start(),
            whole.end(),
            self.cursor.frames.len()
        );
        self.emit(offset, whole.end(), TokenKind::End, frame.scopes.clone());
        self.emit_captures(&caps, rule.end_captures(), &frame.scopes);
        self.cursor.offset = whole.end();
        true
    }

    /// Test the active rules at `offset` in precedence order; the first match wins
    fn apply_rules(&mut self, offset: usize) -> bool {
        let grammar = self.grammar;
        let text = self.text;
        let region = self.cursor.frames.last().map(|frame| frame.rule);
        let winner = {
            let rules = match region {
                Some(rule) => RuleIter::new(grammar, rule.children(), &mut self.cursor.resolver),
                None => RuleIter::for_set(grammar, grammar.root(), &mut self.cursor.resolver),
            };
            let mut winner: Option<(RuleId, regex::Captures<'t>)> = None;
            for id in rules {
                let pattern = grammar.rule(id).entry_pattern();
                if let Some(caps) = self.cursor.lookahead.match_at(grammar, pattern, text, offset) {
                    winner = Some((id, caps));
                    break;
                }
            }
            winner
        };
        let Some((id, caps)) = winner else {
            return false;
        };
        let Some(whole) = caps.get(0) else {
            return false;
        };

        let base = self.cursor.content_scopes();
        match grammar.rule(id) {
            Rule::Match(rule) => {
                self.emit(offset, whole.end(), TokenKind::Match, base.with(rule.scope()));
                self.emit_captures(&caps, rule.captures(), &base);
            }
            Rule::Region(rule) => {
                let scopes = base.with(rule.scope());
                self.emit(offset, whole.end(), TokenKind::Begin, scopes.clone());
                self.emit_captures(&caps, rule.begin_captures(), &scopes);
                log::trace!(
                    "opening region {:?} at {}..{} (depth {})",
                    rule.scope(),
                    offset,
                    whole.end(),
                    self.cursor.frames.len() + 1
                );
                self.cursor.frames.push(Frame {
                    rule,
                    content: scopes.with(rule.content_scope()),
                    scopes,
                });
            }
        }
        self.cursor.offset = whole.end();
        true
    }

    /// Emit the character at `offset` with the current scope path
    fn fallback(&mut self, offset: usize) {
        let width = self.text[offset..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        let scopes = self.cursor.content_scopes();
        self.emit(offset, offset + width, TokenKind::Fallback, scopes);
        self.cursor.offset = offset + width;
    }

    fn emit(&mut self, start: usize, end: usize, kind: TokenKind, scopes: ScopePath) {
        if start < end {
            self.pending.push_back(Token::new(start, end, kind, scopes));
        }
    }

    /// Queue capture tokens ordered by start offset, then group index
    fn emit_captures(&mut self, caps: &regex::Captures<'_>, captures: &Captures, base: &ScopePath) {
        if captures.is_empty() {
            return;
        }
        let mut spans: Vec<_> = captures
            .iter()
            .filter_map(|(group, scope)| {
                caps.get(group)
                    .filter(|m| !m.is_empty())
                    .map(|m| (m.start(), group, m.end(), scope))
            })
            .collect();
        spans.sort_by_key(|(start, group, _, _)| (*start, *group));
        for (start, _, end, scope) in spans {
            self.emit(start, end, TokenKind::Capture, base.with(Some(scope)));
        }
    }
}

impl Iterator for Tokens<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if !self.step() {
                return None;
            }
        }
    }
}

impl FusedIterator for Tokens<'_, '_> {}

#[cfg(test)]
mod tests {
    use crate::tint::grammar::{Grammar, RuleDefinition as R};
    use crate::tint::testing::assert_tokens;
    use crate::tint::tokenizing::{tokenize, Token, TokenKind};

    fn grammar(root: Vec<R>) -> Grammar {
        Grammar::build(vec![("main".to_string(), root)], "main").expect("grammar builds")
    }

    fn run(grammar: &Grammar, text: &str) -> Vec<Token> {
        tokenize(grammar, text).collect()
    }

    #[test]
    fn test_single_match() {
        let g = grammar(vec![R::matching("true|false", "bool")]);
        let tokens = run(&g, "true");
        assert_tokens(&tokens, "true")
            .count(1)
            .token(0, |t| t.span(0, 4).scopes(&["bool"]).kind(TokenKind::Match));
    }

    #[test]
    fn test_string_region_with_fallback_content() {
        let g = grammar(vec![R::region("\"", "\"", "string")
            .with_children(vec![R::matching(r"\\.", "escape")])]);
        let source = "a\"b\"";
        let tokens = run(&g, source);
        assert_tokens(&tokens, source)
            .count(4)
            .covers_source()
            .token(0, |t| t.span(0, 1).scopes(&[]).kind(TokenKind::Fallback))
            .token(1, |t| t.span(1, 2).scopes(&["string"]).kind(TokenKind::Begin))
            .token(2, |t| t.span(2, 3).scopes(&["string"]).kind(TokenKind::Fallback))
            .token(3, |t| t.span(3, 4).scopes(&["string"]).kind(TokenKind::End));
    }

    #[test]
    fn test_escape_inside_region() {
        let g = grammar(vec![R::region("\"", "\"", "string")
            .with_children(vec![R::matching(r"\\.", "escape")])]);
        let source = r#""\"""#;
        let tokens = run(&g, source);
        assert_tokens(&tokens, source)
            .count(3)
            .token(1, |t| t.text(r#"\""#).scopes(&["string", "escape"]))
            .token(2, |t| t.span(3, 4).kind(TokenKind::End));
    }

    #[test]
    fn test_declaration_order_beats_length() {
        let g = grammar(vec![
            R::matching("if", "keyword"),
            R::matching("[a-z]+", "identifier"),
        ]);
        let tokens = run(&g, "iffy");
        assert_tokens(&tokens, "iffy")
            .count(2)
            .token(0, |t| t.text("if").scopes(&["keyword"]))
            .token(1, |t| t.text("fy").scopes(&["identifier"]));
    }

    #[test]
    fn test_unterminated_region_keeps_scope() {
        let g = grammar(vec![R::region("/\\*", "\\*/", "comment")]);
        let source = "x /* never closed";
        let tokens = run(&g, source);
        assert_tokens(&tokens, source).covers_source();
        let begin = tokens.iter().position(|t| t.kind == TokenKind::Begin).unwrap();
        assert_eq!(tokens[begin].span(), 2..4);
        for token in &tokens[begin..] {
            assert_eq!(token.scopes.to_vec(), vec!["comment"]);
        }
        assert_eq!(tokens.last().unwrap().end, source.len());
    }

    #[test]
    fn test_children_can_swallow_end_delimiter() {
        // The end pattern only gets a chance at offsets where a token starts
        let g = grammar(vec![R::region(r"\(", r"\)", "group")
            .with_children(vec![R::matching(r"[^(]+", "inner")])]);
        let source = "(ab)";
        let tokens = run(&g, source);
        assert_tokens(&tokens, source)
            .count(2)
            .token(1, |t| t.text("ab)").scopes(&["group", "inner"]));
    }

    #[test]
    fn test_end_wins_over_child_at_same_offset() {
        let g = grammar(vec![R::region(r"\(", r"\)", "group")
            .with_children(vec![R::matching(r"\)\)", "double")])]);
        let tokens = run(&g, "())");
        assert_tokens(&tokens, "())")
            .count(3)
            .token(1, |t| t.span(1, 2).kind(TokenKind::End))
            .token(2, |t| t.span(2, 3).kind(TokenKind::Fallback).scopes(&[]));
    }

    #[test]
    fn test_nested_regions_via_self_include() {
        let g = Grammar::build(
            vec![(
                "expr".to_string(),
                vec![R::region(r"\(", r"\)", "group").with_children(vec![R::include("expr")])],
            )],
            "expr",
        )
        .unwrap();
        let source = "(())";
        let tokens = run(&g, source);
        assert_tokens(&tokens, source)
            .count(4)
            .token(0, |t| t.kind(TokenKind::Begin).scopes(&["group"]))
            .token(1, |t| t.kind(TokenKind::Begin).scopes(&["group", "group"]))
            .token(2, |t| t.kind(TokenKind::End).scopes(&["group", "group"]))
            .token(3, |t| t.kind(TokenKind::End).scopes(&["group"]));
    }

    #[test]
    fn test_match_captures_follow_parent() {
        let g = grammar(vec![R::matching(r"(fn)\s+(\w+)", "decl")
            .with_capture(2, "name")
            .with_capture(1, "keyword")]);
        let source = "fn main";
        let tokens = run(&g, source);
        assert_tokens(&tokens, source)
            .count(3)
            .covers_source()
            .token(0, |t| t.span(0, 7).scopes(&["decl"]).kind(TokenKind::Match))
            .token(1, |t| t.text("fn").scopes(&["keyword"]).kind(TokenKind::Capture))
            .token(2, |t| t.text("main").scopes(&["name"]).kind(TokenKind::Capture));
    }

    #[test]
    fn test_region_captures_use_region_path() {
        let g = grammar(vec![R::region(r"(\w+)\(", r"\)", "call")
            .with_capture(1, "function")
            .with_end_capture(0, "close")]);
        let source = "f(x)";
        let tokens = run(&g, source);
        assert_tokens(&tokens, source)
            .count(5)
            .token(0, |t| t.text("f(").kind(TokenKind::Begin).scopes(&["call"]))
            .token(1, |t| t.text("f").scopes(&["call", "function"]))
            .token(2, |t| t.text("x").kind(TokenKind::Fallback).scopes(&["call"]))
            .token(3, |t| t.text(")").kind(TokenKind::End))
            .token(4, |t| t.text(")").scopes(&["call", "close"]));
    }

    #[test]
    fn test_content_scope_excludes_delimiters() {
        let g = grammar(vec![
            R::region("<", ">", "tag").with_content_scope("tag.content")
        ]);
        let source = "<a>";
        let tokens = run(&g, source);
        assert_tokens(&tokens, source)
            .token(0, |t| t.scopes(&["tag"]))
            .token(1, |t| t.scopes(&["tag", "tag.content"]))
            .token(2, |t| t.scopes(&["tag"]));
    }

    #[test]
    fn test_empty_end_match_closes_without_token() {
        let g = grammar(vec![R::region("//", "$", "comment")]);
        let source = "//x\ny";
        let tokens = run(&g, source);
        assert_tokens(&tokens, source)
            .count(4)
            .covers_source()
            .token(1, |t| t.text("x").scopes(&["comment"]))
            .token(2, |t| t.text("\n").scopes(&[]))
            .token(3, |t| t.text("y").scopes(&[]));
    }

    #[test]
    fn test_match_without_scope_keeps_current_path() {
        let g = grammar(vec![R::region("<", ">", "tag").with_children(vec![
            R::Match(crate::tint::grammar::MatchDefinition {
                pattern: "a".to_string(),
                scope: None,
                captures: Default::default(),
            }),
        ])]);
        let tokens = run(&g, "<a>");
        assert_tokens(&tokens, "<a>").token(1, |t| t.text("a").scopes(&["tag"]));
    }

    #[test]
    fn test_fallback_respects_char_boundaries() {
        let g = grammar(vec![R::matching("x", "x")]);
        let source = "é✓x";
        let tokens = run(&g, source);
        assert_tokens(&tokens, source)
            .count(3)
            .covers_source()
            .token(0, |t| t.text("é"))
            .token(1, |t| t.text("✓"))
            .token(2, |t| t.text("x").scopes(&["x"]));
    }

    #[test]
    fn test_empty_input() {
        let g = grammar(vec![R::matching("x", "x")]);
        assert!(run(&g, "").is_empty());
    }

    #[test]
    fn test_runs_are_independent() {
        let g = grammar(vec![R::region("\"", "\"", "string")]);
        let mut first = tokenize(&g, "\"open");
        first.next();
        assert_eq!(first.depth(), 1);
        let second: Vec<_> = tokenize(&g, "\"open").collect();
        assert_eq!(second, run(&g, "\"open"));
        assert_eq!(first.source(), "\"open");
    }

    #[test]
    fn test_offset_and_depth_progress() {
        let g = grammar(vec![R::region("<", ">", "tag")]);
        let mut tokens = tokenize(&g, "<ab>");
        assert_eq!((tokens.offset(), tokens.depth()), (0, 0));
        tokens.next();
        assert_eq!((tokens.offset(), tokens.depth()), (1, 1));
        let rest: Vec<_> = tokens.by_ref().collect();
        assert_eq!(rest.len(), 3);
        assert_eq!((tokens.offset(), tokens.depth()), (4, 0));
        assert!(tokens.next().is_none());
    }
}
