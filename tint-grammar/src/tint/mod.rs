//! Main module for tint library functionality

pub mod formats;
pub mod grammar;
pub mod languages;
pub mod loader;
pub mod registry;
pub mod testing;
pub mod tokenizing;
