//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.pageflip/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::core::transition::DEFAULT_TRANSITION_DURATION;
use crate::fetch::{DEFAULT_SOURCE_PREFIX, FetchMode};
use crate::overlay::GridOptions;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PageflipConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub grid: GridOptions,
    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    pub base_url: Option<String>,
    pub mode: Option<FetchMode>,
    pub source_prefix: Option<String>,
    pub start_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TransitionConfig {
    /// Same syntax as the `--transition-duration` custom property.
    pub duration: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StatsConfig {
    pub enabled: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5173";
pub const DEFAULT_START_PATH: &str = "/";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub mode: FetchMode,
    pub source_prefix: String,
    pub start_path: String,
    pub transition_duration: String,
    pub grid: GridOptions,
    pub stats_enabled: bool,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub mode: Option<FetchMode>,
    pub start_path: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.pageflip/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".pageflip").join("config.toml"))
}

/// Load config from `~/.pageflip/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PageflipConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PageflipConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PageflipConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PageflipConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: PageflipConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r##"# Pageflip Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [site]
# base_url = "http://localhost:5173"  # Or set PAGEFLIP_BASE_URL
# mode = "production"                 # "development" or "production" (PAGEFLIP_MODE)
# source_prefix = "/src/html"         # Where pages live in development mode
# start_path = "/"

# [transition]
# duration = "0.5s"                   # Or set PAGEFLIP_TRANSITION_DURATION

# [grid]
# show = false                        # Toggle at runtime with Alt+G
# columns_color = "#ff000020"
# columns_border_color = "red"
# columns_border_width = "1px"
# columns_border_style = "solid"

# [stats]
# enabled = true                      # Toggle the panel at runtime with S
"##;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PageflipConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("PAGEFLIP_BASE_URL").ok())
        .or_else(|| config.site.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Mode: CLI → env → config → default. A bad env value is ignored.
    let env_mode = std::env::var("PAGEFLIP_MODE")
        .ok()
        .and_then(|m| match m.parse::<FetchMode>() {
            Ok(mode) => Some(mode),
            Err(e) => {
                warn!("Ignoring PAGEFLIP_MODE: {}", e);
                None
            }
        });
    let mode = cli
        .mode
        .or(env_mode)
        .or(config.site.mode)
        .unwrap_or_default();

    // Transition duration: env → config → default
    let transition_duration = std::env::var("PAGEFLIP_TRANSITION_DURATION")
        .ok()
        .or_else(|| config.transition.duration.clone())
        .unwrap_or_else(|| DEFAULT_TRANSITION_DURATION.to_string());

    ResolvedConfig {
        base_url,
        mode,
        source_prefix: config
            .site
            .source_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_SOURCE_PREFIX.to_string()),
        start_path: cli
            .start_path
            .clone()
            .or_else(|| config.site.start_path.clone())
            .unwrap_or_else(|| DEFAULT_START_PATH.to_string()),
        transition_duration,
        grid: config.grid.clone(),
        stats_enabled: config.stats.enabled.unwrap_or(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = PageflipConfig::default();
        assert!(config.site.base_url.is_none());
        assert!(!config.grid.show);
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = PageflipConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.source_prefix, DEFAULT_SOURCE_PREFIX);
        assert_eq!(resolved.start_path, "/");
        assert!(resolved.stats_enabled);
        assert!(resolved.grid.columns_color.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = PageflipConfig {
            site: SiteConfig {
                source_prefix: Some("/pages".to_string()),
                start_path: Some("/about".to_string()),
                ..Default::default()
            },
            stats: StatsConfig {
                enabled: Some(false),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.source_prefix, "/pages");
        assert_eq!(resolved.start_path, "/about");
        assert!(!resolved.stats_enabled);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = PageflipConfig {
            site: SiteConfig {
                base_url: Some("http://from-config".to_string()),
                mode: Some(FetchMode::Production),
                start_path: Some("/about".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            base_url: Some("http://from-cli".to_string()),
            mode: Some(FetchMode::Development),
            start_path: Some("/work".to_string()),
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.base_url, "http://from-cli");
        assert_eq!(resolved.mode, FetchMode::Development);
        assert_eq!(resolved.start_path, "/work");
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r##"
[site]
base_url = "http://localhost:8080"
mode = "development"
source_prefix = "/src/pages"

[transition]
duration = "0.3s"

[grid]
show = true
columns_color = "#ff000020"
columns_border_style = "dashed"

[stats]
enabled = false
"##;
        let config: PageflipConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.site.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.site.mode, Some(FetchMode::Development));
        assert_eq!(config.transition.duration.as_deref(), Some("0.3s"));
        assert!(config.grid.show);
        assert_eq!(config.grid.columns_color.as_deref(), Some("#ff000020"));
        assert_eq!(config.grid.columns_border_style.as_deref(), Some("dashed"));
        assert!(config.grid.columns_border_width.is_none());
        assert_eq!(config.stats.enabled, Some(false));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[transition]
duration = "1s"
"#;
        let config: PageflipConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.transition.duration.as_deref(), Some("1s"));
        assert!(config.site.mode.is_none());
        assert!(!config.grid.show);
    }

    #[test]
    fn test_unknown_mode_is_a_parse_error() {
        let toml_str = r#"
[site]
mode = "staging"
"#;
        assert!(toml::from_str::<PageflipConfig>(toml_str).is_err());
    }
}
