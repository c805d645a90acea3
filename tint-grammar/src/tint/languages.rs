//! Bundled grammars
//!
//!     Grammars that ship with the library, embedded at compile time and built on first
//!     use. Currently only Eisen.

use crate::tint::grammar::Grammar;
use crate::tint::loader;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Source of the bundled Eisen grammar
pub const EISEN_SOURCE: &str = include_str!("languages/eisen.yaml");

static EISEN: Lazy<Arc<Grammar>> = Lazy::new(|| {
    Arc::new(loader::from_yaml_str(EISEN_SOURCE).expect("bundled eisen grammar is valid"))
});

/// The Eisen grammar, shared
pub fn eisen() -> Arc<Grammar> {
    Arc::clone(&EISEN)
}

/// All bundled grammars with their language names
pub fn bundled() -> Vec<(&'static str, Arc<Grammar>)> {
    vec![("eisen", eisen())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eisen_builds() {
        let grammar = loader::from_yaml_str(EISEN_SOURCE).expect("eisen grammar builds");
        assert_eq!(grammar.name(), "eisen");
        assert_eq!(grammar.root_set().name(), "source");
        assert!(grammar.rule_set_by_name("calls").is_some());
    }

    #[test]
    fn test_eisen_is_shared() {
        assert!(Arc::ptr_eq(&eisen(), &eisen()));
    }
}
