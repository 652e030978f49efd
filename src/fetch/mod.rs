//! # Page Fetching
//!
//! Turns a logical path into a resource location and retrieves its markup.
//!
//! ```text
//! "/about/" ──normalize──▶ "/about" ──resolve(mode)──▶ "/src/html/about.html"  (development)
//!                                                   └▶ "/about.html"           (production)
//! ""        ──normalize──▶ "/index" ─────────────────▶ "/index.html"           (any mode)
//! ```
//!
//! `PageSource::fetch` is the only suspension point here.

pub mod http;
pub mod markup;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::route::{HOME_PATH, PAGE_EXTENSION, normalize};

pub use http::HttpPageSource;

/// Where page markup is served from.
pub const DEFAULT_SOURCE_PREFIX: &str = "/src/html";

/// Resource that always backs the home route.
pub const HOME_LOCATION: &str = "/index.html";

/// Errors raised while retrieving page markup.
///
/// The transition engine treats every variant the same way (fall back to
/// the home location); the variants exist for logs.
#[derive(Debug)]
pub enum FetchError {
    /// The location could not be turned into a request URL.
    InvalidLocation(String),
    /// Network-level failure (DNS, connection refused, timeout).
    Network(String),
    /// The server answered with a non-success status.
    Status { status: u16, location: String },
    /// The response body could not be read as text.
    Body(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidLocation(msg) => write!(f, "invalid location: {msg}"),
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Status { status, location } => {
                write!(f, "HTTP {status} for {location}")
            }
            FetchError::Body(msg) => write!(f, "body error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Which resolution strategy to use for non-home pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Pages live under the source tree prefix (dev server).
    Development,
    /// Pages live at the normalized path (built site).
    #[default]
    Production,
}

impl FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(FetchMode::Development),
            "production" | "prod" => Ok(FetchMode::Production),
            other => Err(format!("unknown fetch mode: {other}")),
        }
    }
}

/// A concrete resource path, relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchLocation(pub String);

impl FetchLocation {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FetchLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a path to the location its markup is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    pub mode: FetchMode,
    pub source_prefix: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(FetchMode::default())
    }
}

impl Resolver {
    pub fn new(mode: FetchMode) -> Self {
        Self {
            mode,
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
        }
    }

    pub fn with_source_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.source_prefix = prefix.into();
        self
    }

    pub fn resolve(&self, path: &str) -> FetchLocation {
        let path = normalize(path);
        if path == HOME_PATH {
            return FetchLocation(HOME_LOCATION.to_string());
        }
        if path.starts_with('/') {
            return match self.mode {
                FetchMode::Development => {
                    FetchLocation(format!("{}{}{}", self.source_prefix, path, PAGE_EXTENSION))
                }
                FetchMode::Production => FetchLocation(format!("{path}{PAGE_EXTENSION}")),
            };
        }
        FetchLocation(format!("{path}{PAGE_EXTENSION}"))
    }
}

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieves the raw markup stored at `location`.
    async fn fetch(&self, location: &FetchLocation) -> Result<String, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_ignores_mode() {
        for mode in [FetchMode::Development, FetchMode::Production] {
            let resolver = Resolver::new(mode);
            assert_eq!(resolver.resolve("").as_str(), "/index.html");
            assert_eq!(resolver.resolve("/").as_str(), "/index.html");
            assert_eq!(resolver.resolve("/index").as_str(), "/index.html");
        }
    }

    #[test]
    fn test_development_uses_source_prefix() {
        let resolver = Resolver::new(FetchMode::Development);
        assert_eq!(resolver.resolve("/about/").as_str(), "/src/html/about.html");
        assert_eq!(
            resolver.resolve("/work/one.html").as_str(),
            "/src/html/work/one.html"
        );
    }

    #[test]
    fn test_production_uses_normalized_path() {
        let resolver = Resolver::new(FetchMode::Production);
        assert_eq!(resolver.resolve("/about").as_str(), "/about.html");
        assert_eq!(resolver.resolve("/about.html").as_str(), "/about.html");
    }

    #[test]
    fn test_relative_path_ignores_mode() {
        let resolver = Resolver::new(FetchMode::Development);
        assert_eq!(resolver.resolve("contact").as_str(), "contact.html");
    }

    #[test]
    fn test_custom_source_prefix() {
        let resolver = Resolver::new(FetchMode::Development).with_source_prefix("/pages");
        assert_eq!(resolver.resolve("/about").as_str(), "/pages/about.html");
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("dev".parse::<FetchMode>(), Ok(FetchMode::Development));
        assert_eq!("Production".parse::<FetchMode>(), Ok(FetchMode::Production));
        assert!("staging".parse::<FetchMode>().is_err());
    }
}
