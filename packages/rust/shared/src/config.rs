//! Application configuration for knoex.
//!
//! User config lives at `~/.knoex/knoex.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KnoexError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "knoex.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".knoex";

/// Candidate-set size at or below which a term counts as easy.
pub const DEFAULT_EASY_THRESHOLD: usize = 3;

// ---------------------------------------------------------------------------
// Config structs (matching knoex.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Disambiguation tuning.
    #[serde(default)]
    pub disambiguation: DisambiguationConfig,

    /// Lexicon location.
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

/// `[disambiguation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisambiguationConfig {
    /// Terms with at most this many candidate senses are resolved first.
    #[serde(default = "default_easy_threshold")]
    pub easy_threshold: usize,

    /// Resolution strategy.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Maximum passes for the `refine` strategy.
    #[serde(default = "default_refine_rounds")]
    pub refine_rounds: u32,

    /// Also return name-concepts as top-level members of the result.
    #[serde(default)]
    pub include_name_concepts: bool,
}

impl Default for DisambiguationConfig {
    fn default() -> Self {
        Self {
            easy_threshold: default_easy_threshold(),
            strategy: StrategyKind::default(),
            refine_rounds: default_refine_rounds(),
            include_name_concepts: false,
        }
    }
}

fn default_easy_threshold() -> usize {
    DEFAULT_EASY_THRESHOLD
}
fn default_refine_rounds() -> u32 {
    3
}

/// Named resolution strategy as written in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Anchors resolved once and never revised.
    #[default]
    FixedAnchors,
    /// Fixed anchors first, then repeated re-resolution against all terms.
    Refine,
}

impl std::str::FromStr for StrategyKind {
    type Err = KnoexError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fixed-anchors" => Ok(Self::FixedAnchors),
            "refine" => Ok(Self::Refine),
            other => Err(KnoexError::config(format!(
                "unknown strategy '{other}': expected 'fixed-anchors' or 'refine'"
            ))),
        }
    }
}

/// `[lexicon]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Path to a JSON lexicon file used when no `--lexicon` flag is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// ---------------------------------------------------------------------------
// Former config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// How senses are chosen once candidate sets are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Resolve easy terms by consensus, then hard terms against those anchors.
    FixedAnchors,
    /// As `FixedAnchors`, then re-pick every term against all others until stable.
    Refine { rounds: u32 },
}

/// Runtime concept-formation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormerConfig {
    /// Easy/hard split point on candidate count.
    pub easy_threshold: usize,
    /// Resolution strategy.
    pub strategy: Strategy,
    /// Return name-concepts as top-level members.
    pub include_name_concepts: bool,
}

impl Default for FormerConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FormerConfig {
    fn from(config: &AppConfig) -> Self {
        let d = &config.disambiguation;
        let strategy = match d.strategy {
            StrategyKind::FixedAnchors => Strategy::FixedAnchors,
            StrategyKind::Refine => Strategy::Refine {
                rounds: d.refine_rounds,
            },
        };
        Self {
            easy_threshold: d.easy_threshold,
            strategy,
            include_name_concepts: d.include_name_concepts,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.knoex/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| KnoexError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.knoex/knoex.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| KnoexError::io(path, e))?;
    parse_config(&content)
        .map_err(|e| KnoexError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(content).map_err(|e| KnoexError::config(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Reject settings that would leave the resolver without anchors.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.disambiguation.easy_threshold == 0 {
        return Err(KnoexError::config(
            "easy_threshold must be at least 1",
        ));
    }
    Ok(())
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| KnoexError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| KnoexError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| KnoexError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
