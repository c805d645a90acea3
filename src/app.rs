//! Application layer behind the `tint` binary
//!
//!     A [Session] owns the loaded configuration and the language registry built from it
//!     (bundled grammars plus the grammar files the configuration names). Every command
//!     the CLI offers is a method here so it can be tested without spawning a process.

mod nav;

pub use nav::render_nav;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tint_config::{ConfigError, TintConfig};
use tint_grammar::tint::formats::{Format, FormatError};
use tint_grammar::tint::loader::{self, LoadError};
use tint_grammar::tint::registry::{LanguageRegistry, RegistryError};
use tint_grammar::tint::tokenizing::Token;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to load grammar `{name}`: {source}")]
    Grammar {
        name: String,
        #[source]
        source: LoadError,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Counts reported by [Session::check_grammar]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarSummary {
    pub name: String,
    pub rule_sets: usize,
    pub rules: usize,
    pub patterns: usize,
}

impl std::fmt::Display for GrammarSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "grammar `{}` is valid: {} rule sets, {} rules, {} patterns",
            self.name, self.rule_sets, self.rules, self.patterns
        )
    }
}

pub struct Session {
    config: TintConfig,
    registry: LanguageRegistry,
}

impl Session {
    /// Build a session: bundled languages first, then the configured grammar files
    pub fn new(config: TintConfig) -> Result<Self, AppError> {
        let mut session = Self {
            registry: LanguageRegistry::with_defaults(),
            config,
        };
        let sources = session.config.highlight.grammars.clone();
        for source in sources {
            session.register_grammar_file(&source.name, &source.path)?;
        }
        Ok(session)
    }

    pub fn config(&self) -> &TintConfig {
        &self.config
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Load a grammar file and register it as `name`
    pub fn register_grammar_file(&mut self, name: &str, path: &Path) -> Result<(), AppError> {
        let grammar = loader::from_path(path).map_err(|source| AppError::Grammar {
            name: name.to_string(),
            source,
        })?;
        self.registry.register(name, grammar);
        Ok(())
    }

    /// Language for `path`: the explicit choice, else a registered language named like
    /// the file extension, else the configured default
    pub fn language_for(&self, path: &Path, explicit: Option<&str>) -> String {
        if let Some(language) = explicit {
            return language.to_string();
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| self.registry.has(ext))
            .map(str::to_string)
            .unwrap_or_else(|| self.config.highlight.default_language.clone())
    }

    /// Tokenize `source`, stopping after the configured token ceiling
    pub fn tokenize(&self, source: &str, language: &str) -> Result<Vec<Token>, AppError> {
        let tokens = self.registry.tokenize(source, language)?;
        Ok(match self.config.highlight.token_limit() {
            Some(limit) => tokens.take(limit).collect(),
            None => tokens.collect(),
        })
    }

    /// Tokenize and render `source` in `format`
    pub fn highlight(
        &self,
        source: &str,
        language: &str,
        format: Format,
    ) -> Result<String, AppError> {
        let tokens = self.tokenize(source, language)?;
        log::debug!("{} tokens for {} bytes of {}", tokens.len(), source.len(), language);
        Ok(format.render(&tokens, source)?)
    }

    /// Read `path` and highlight it
    pub fn highlight_file(
        &self,
        path: &Path,
        language: Option<&str>,
        format: Format,
    ) -> Result<String, AppError> {
        let source = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let language = self.language_for(path, language);
        self.highlight(&source, &language, format)
    }

    /// The output format named by the configuration
    pub fn default_format(&self) -> Result<Format, AppError> {
        Ok(self.config.highlight.format.parse()?)
    }

    /// Validate a grammar file without registering it
    pub fn check_grammar(path: &Path) -> Result<GrammarSummary, AppError> {
        let grammar = loader::from_path(path)?;
        Ok(GrammarSummary {
            name: grammar.name().to_string(),
            rule_sets: grammar.rule_set_count(),
            rules: grammar.rule_count(),
            patterns: grammar.pattern_count(),
        })
    }

    /// The site navigation, nav bar first and then the sidebar
    pub fn navigation(&self) -> String {
        render_nav(&self.config.site)
    }
}
