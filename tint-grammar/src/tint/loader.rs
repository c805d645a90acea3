//! Grammar loading utilities
//!
//! Reads [GrammarDefinition]s from YAML or JSON, from strings or files, and builds them.
//! File format is picked by extension: `.yaml`/`.yml` or `.json`.
//!
//! # Example
//!
//! ```rust,ignore
//! use tint_grammar::tint::loader;
//!
//! let grammar = loader::from_path("grammars/eisen.yaml")?;
//! let tokens: Vec<_> = grammar.tokenize("let x = 1").collect();
//! ```

use crate::tint::grammar::{Grammar, GrammarDefinition, GrammarError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML grammar: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON grammar: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported grammar file {0} (expected .yaml, .yml or .json)")]
    UnsupportedExtension(PathBuf),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Grammar definition file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(SourceFormat::Yaml),
            "json" => Some(SourceFormat::Json),
            _ => None,
        }
    }
}

pub fn definition_from_str(
    source: &str,
    format: SourceFormat,
) -> Result<GrammarDefinition, LoadError> {
    Ok(match format {
        SourceFormat::Yaml => serde_yaml::from_str(source)?,
        SourceFormat::Json => serde_json::from_str(source)?,
    })
}

pub fn definition_from_path(path: impl AsRef<Path>) -> Result<GrammarDefinition, LoadError> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedExtension(path.to_path_buf()))?;
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded grammar definition from {}", path.display());
    definition_from_str(&source, format)
}

pub fn from_yaml_str(source: &str) -> Result<Grammar, LoadError> {
    Ok(definition_from_str(source, SourceFormat::Yaml)?.build()?)
}

pub fn from_json_str(source: &str) -> Result<Grammar, LoadError> {
    Ok(definition_from_str(source, SourceFormat::Json)?.build()?)
}

/// Load and build a grammar file
pub fn from_path(path: impl AsRef<Path>) -> Result<Grammar, LoadError> {
    Ok(definition_from_path(path)?.build()?)
}
