//! Shared types, error model, and configuration for knoex.
//!
//! This crate is the foundation depended on by all other knoex crates.
//! It provides:
//! - [`KnoexError`], the unified error type
//! - Domain types ([`Category`], [`Term`], [`Sense`])
//! - Configuration ([`AppConfig`], [`FormerConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_EASY_THRESHOLD, DisambiguationConfig, FormerConfig, LexiconConfig,
    Strategy, StrategyKind, config_dir, config_file_path, init_config, load_config,
    load_config_from, parse_config, validate_config,
};
pub use error::{KnoexError, Result};
pub use types::{CURRENT_SCHEMA_VERSION, Category, Sense, Term};
