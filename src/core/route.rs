//! Path normalization.
//!
//! `/about/`, `/about.html` and `/about` all name the same route. An empty
//! path (the site root) names the home route.

use crate::core::state::RouteDescriptor;

/// Normalized path of the home route.
pub const HOME_PATH: &str = "/index";

/// Extension used by page markup files.
pub const PAGE_EXTENSION: &str = ".html";

/// Strips one trailing slash, then a trailing `.html`. An empty result maps
/// to [`HOME_PATH`].
pub fn normalize(path: &str) -> String {
    let path = path.strip_suffix('/').unwrap_or(path);
    let path = path.strip_suffix(PAGE_EXTENSION).unwrap_or(path);
    if path.is_empty() {
        HOME_PATH.to_string()
    } else {
        path.to_string()
    }
}

impl RouteDescriptor {
    /// Builds the route for a raw path. `page` is the last path segment.
    pub fn from_path(path: &str) -> Self {
        let path = normalize(path);
        let page = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            path: Some(path),
            page: Some(page),
        }
    }
}
