//! # tint-grammar
//!
//! Grammar-driven scope tokenizer.
//!
//! File Layout
//!
//!     src/tint
//!       ├── grammar       Grammar model, authoring format and validation (build)
//!       ├── tokenizing    The tokenizer engine: cursor, include resolution, token stream
//!       ├── formats       Token stream renderers (simple text, json)
//!       ├── registry      Language name -> grammar lookup for host applications
//!       ├── languages     Grammars bundled with the library (eisen)
//!       ├── loader        Reading grammar definitions from files and strings
//!       └── testing       Fluent token assertions shared by unit and integration tests
//!
//!     The grammar is data, the engine is code. Languages are added by writing grammar
//!     definitions, never by adding per-language logic to the engine.

pub mod tint;
