//! Matcher cursor: the mutable state of one tokenizer run

use super::rules::Resolver;
use super::token::ScopePath;
use crate::tint::grammar::{Grammar, PatternId, RegionRule};
use regex::Captures;

/// An open region
#[derive(Debug)]
pub(crate) struct Frame<'g> {
    pub rule: &'g RegionRule,
    /// Path of the begin and end tokens
    pub scopes: ScopePath,
    /// Path of everything between begin and end (adds the content scope, if any)
    pub content: ScopePath,
}

/// Where a pattern's next match starts, as of a search from `searched_from`
#[derive(Debug, Clone, Copy)]
struct Lookahead {
    searched_from: usize,
    next: Option<usize>,
}

/// Per-pattern memo of the last unanchored search.
///
/// A leftmost search from `p` that finds a match starting at `q` proves that no match
/// starts anywhere in `[p, q)`, and one that finds nothing proves there is none at or after
/// `p`. Later queries inside that window are answered without touching the regex, which
/// keeps a run close to linear in the buffer length.
#[derive(Debug)]
pub(crate) struct LookaheadCache {
    entries: Vec<Option<Lookahead>>,
}

impl LookaheadCache {
    pub(crate) fn new(grammar: &Grammar) -> Self {
        Self {
            entries: vec![None; grammar.pattern_count()],
        }
    }

    /// Captures of `id` if it matches starting exactly at `offset`. Look-around sees the
    /// whole of `text`, not just the part after `offset`.
    pub(crate) fn match_at<'t>(
        &mut self,
        grammar: &Grammar,
        id: PatternId,
        text: &'t str,
        offset: usize,
    ) -> Option<Captures<'t>> {
        let regex = grammar.pattern(id).regex();
        let entry = &mut self.entries[id.index()];
        let next = match *entry {
            Some(known) if known.searched_from <= offset && known.next.map_or(true, |n| n >= offset) => {
                known.next
            }
            _ => {
                let next = regex.find_at(text, offset).map(|m| m.start());
                *entry = Some(Lookahead {
                    searched_from: offset,
                    next,
                });
                next
            }
        };
        if next != Some(offset) {
            return None;
        }
        regex
            .captures_at(text, offset)
            .filter(|caps| caps.get(0).map_or(false, |m| m.start() == offset))
    }
}

#[derive(Debug)]
pub(crate) struct MatcherCursor<'g> {
    pub offset: usize,
    pub frames: Vec<Frame<'g>>,
    pub lookahead: LookaheadCache,
    pub resolver: Resolver<'g>,
}

impl<'g> MatcherCursor<'g> {
    pub(crate) fn new(grammar: &'g Grammar) -> Self {
        Self {
            offset: 0,
            frames: Vec::new(),
            lookahead: LookaheadCache::new(grammar),
            resolver: Resolver::new(grammar),
        }
    }

    /// Scope path for tokens at the current depth
    pub(crate) fn content_scopes(&self) -> ScopePath {
        self.frames
            .last()
            .map(|frame| frame.content.clone())
            .unwrap_or_default()
    }
}
