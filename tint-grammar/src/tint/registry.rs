//! Language registry
//!
//! Host applications (a site generator's code block renderer, the CLI) look grammars up
//! by language name here. Grammars are stored behind `Arc` so the same grammar can be
//! shared with other registries and threads.

use crate::tint::grammar::Grammar;
use crate::tint::languages;
use crate::tint::tokenizing::Tokens;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no grammar registered for language `{0}`")]
    LanguageNotFound(String),
}

/// Registry of grammars by language name
///
/// # Examples
///
/// ```ignore
/// let registry = LanguageRegistry::with_defaults();
/// let tokens: Vec<_> = registry.tokenize("let x = 1", "eisen")?.collect();
/// ```
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: HashMap<String, Arc<Grammar>>,
}

impl LanguageRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the bundled languages
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, grammar) in languages::bundled() {
            registry.register(name, grammar);
        }
        registry
    }

    /// Register a grammar under `name`, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, grammar: impl Into<Arc<Grammar>>) {
        let name = name.into();
        log::debug!("registering language `{}`", name);
        self.languages.insert(name, grammar.into());
    }

    pub fn get(&self, name: &str) -> Result<&Arc<Grammar>, RegistryError> {
        self.languages
            .get(name)
            .ok_or_else(|| RegistryError::LanguageNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.languages.contains_key(name)
    }

    /// List all registered language names (sorted)
    pub fn list_languages(&self) -> Vec<String> {
        let mut names: Vec<_> = self.languages.keys().cloned().collect();
        names.sort();
        names
    }

    /// Tokenize `source` with the grammar registered for `language`
    pub fn tokenize<'r, 't>(
        &'r self,
        source: &'t str,
        language: &str,
    ) -> Result<Tokens<'r, 't>, RegistryError> {
        Ok(self.get(language)?.tokenize(source))
    }
}
