//! # tint
//!
//! Scope tokenizer for the Eisen documentation site.
//!
//! The tokenizer itself lives in [tint_grammar]; configuration loading in [tint_config].
//! This crate glues them together for the `tint` binary: it builds a language registry
//! from the configuration, tokenizes files and renders the results and the site's
//! navigation tree.

pub mod app;

pub use tint_config;
pub use tint_grammar;
