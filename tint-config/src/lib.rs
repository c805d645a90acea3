//! Shared configuration loader for tint.
//!
//! `defaults/tint.default.toml` is embedded into every binary so that the documented
//! defaults and runtime behavior stay in sync. Applications layer user files on top of
//! those defaults via [`Loader`] before deserializing into [`TintConfig`].
//!
//! Two groups live here: `highlight` drives tokenizing (default language, output
//! format, token ceiling, extra grammar files) and `site` carries the navigation data
//! the documentation site is generated from.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/tint.default.toml");

/// Top-level configuration consumed by tint applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TintConfig {
    pub highlight: HighlightConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    pub default_language: String,
    pub format: String,
    /// Token ceiling for a single run; 0 means unlimited
    pub max_tokens: usize,
    #[serde(default)]
    pub grammars: Vec<GrammarSource>,
}

impl HighlightConfig {
    /// The token ceiling, if one is set
    pub fn token_limit(&self) -> Option<usize> {
        (self.max_tokens > 0).then_some(self.max_tokens)
    }
}

/// A grammar file registered under a language name at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrammarSource {
    pub name: String,
    pub path: PathBuf,
}

/// Site metadata and navigation for the documentation generator.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub site_title: String,
    pub theme: String,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub nav: Vec<NavEntry>,
    #[serde(default)]
    pub sidebar: Vec<NavEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SocialLink {
    pub icon: String,
    pub link: String,
}

/// A navigation node. Sections carry `items`, pages carry a `link`; authored order is
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavEntry {
    pub text: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub collapsible: bool,
    #[serde(default)]
    pub items: Vec<NavEntry>,
}

impl NavEntry {
    /// Visit this entry and its descendants depth-first, pre-order, with their depth
    /// (0 for `self`).
    pub fn walk(&self) -> NavWalk<'_> {
        NavWalk {
            stack: vec![(0, self)],
        }
    }
}

/// Depth-first walk over every entry of `entries` in authored order.
pub fn walk_all(entries: &[NavEntry]) -> impl Iterator<Item = (usize, &NavEntry)> {
    entries.iter().flat_map(NavEntry::walk)
}

/// Iterator returned by [`NavEntry::walk`].
#[derive(Debug, Clone)]
pub struct NavWalk<'a> {
    stack: Vec<(usize, &'a NavEntry)>,
}

impl<'a> Iterator for NavWalk<'a> {
    type Item = (usize, &'a NavEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, entry) = self.stack.pop()?;
        // Reversed so the first child is popped next
        self.stack
            .extend(entry.items.iter().rev().map(|item| (depth + 1, item)));
        Some((depth, entry))
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_source(path.as_ref(), true)
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_source(path.as_ref(), false)
    }

    fn with_source(mut self, path: &Path, required: bool) -> Self {
        log::debug!("layering config file {} (required: {})", path.display(), required);
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, mostly for tests and embedding hosts.
    pub fn with_toml_str(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override (CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TintConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TintConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.highlight.default_language, "eisen");
        assert_eq!(config.highlight.format, "simple");
        assert_eq!(config.highlight.token_limit(), None);
        assert!(config.highlight.grammars.is_empty());
        assert_eq!(config.site.title, "Eisen PL");
        assert_eq!(config.site.theme, "vitesse-dark");
        assert_eq!(
            config.site.social_links,
            vec![SocialLink {
                icon: "github".to_string(),
                link: "https://github.com/ktvng/eisen".to_string(),
            }]
        );
    }

    #[test]
    fn default_sidebar_keeps_authored_order() {
        let config = load_defaults().unwrap();
        let sections: Vec<_> = config.site.sidebar.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(sections, vec!["Introduction", "Memory Model", "Inheritance Model"]);

        let intro = &config.site.sidebar[0];
        assert!(intro.collapsible);
        assert_eq!(intro.link, None);
        assert_eq!(intro.items.len(), 6);
        assert_eq!(intro.items[0].text, "Syntax 101");
        assert_eq!(intro.items[0].link.as_deref(), Some("/intro/syntax"));
    }

    #[test]
    fn walk_is_depth_first() {
        let config = load_defaults().unwrap();
        let walked: Vec<_> = walk_all(&config.site.sidebar)
            .map(|(depth, entry)| (depth, entry.text.as_str()))
            .take(8)
            .collect();
        assert_eq!(
            walked,
            vec![
                (0, "Introduction"),
                (1, "Syntax 101"),
                (1, "Functions"),
                (1, "Structs"),
                (1, "Variables"),
                (1, "Data Structs"),
                (1, "Modules"),
                (0, "Memory Model"),
            ]
        );
        assert_eq!(walk_all(&config.site.sidebar).count(), 3 + 6 + 3 + 6);
    }

    #[test]
    fn walk_descends_nested_items() {
        let entry = NavEntry {
            text: "a".to_string(),
            link: None,
            collapsible: false,
            items: vec![
                NavEntry {
                    text: "b".to_string(),
                    link: None,
                    collapsible: false,
                    items: vec![NavEntry {
                        text: "c".to_string(),
                        link: Some("/c".to_string()),
                        collapsible: false,
                        items: vec![],
                    }],
                },
                NavEntry {
                    text: "d".to_string(),
                    link: Some("/d".to_string()),
                    collapsible: false,
                    items: vec![],
                },
            ],
        };
        let walked: Vec<_> = entry.walk().map(|(d, e)| (d, e.text.as_str())).collect();
        assert_eq!(walked, vec![(0, "a"), (1, "b"), (2, "c"), (1, "d")]);
    }

    #[rstest]
    #[case("highlight.format", "json")]
    #[case("highlight.default_language", "toy")]
    fn supports_overrides(#[case] key: &str, #[case] value: &str) {
        let config = Loader::new()
            .set_override(key, value)
            .expect("override to apply")
            .build()
            .expect("config to build");
        let actual = match key {
            "highlight.format" => config.highlight.format,
            _ => config.highlight.default_language,
        };
        assert_eq!(actual, value);
    }

    #[test]
    fn max_tokens_override() {
        let config = Loader::new()
            .set_override("highlight.max_tokens", 25i64)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.highlight.token_limit(), Some(25));
    }

    #[test]
    fn layered_toml_adds_grammars() {
        let config = Loader::new()
            .with_toml_str(
                "[highlight]\ngrammars = [{ name = \"toy\", path = \"grammars/toy.yaml\" }]\n",
            )
            .build()
            .unwrap();
        assert_eq!(
            config.highlight.grammars,
            vec![GrammarSource {
                name: "toy".to_string(),
                path: PathBuf::from("grammars/toy.yaml"),
            }]
        );
        // Keys the layer does not mention keep their defaults
        assert_eq!(config.highlight.format, "simple");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here.toml")
            .build()
            .unwrap();
        assert_eq!(config.site.site_title, "Eisen PL");
    }

    #[test]
    fn missing_required_file_fails() {
        assert!(Loader::new()
            .with_file("/definitely/not/here.toml")
            .build()
            .is_err());
    }
}
