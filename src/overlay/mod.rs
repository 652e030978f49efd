//! # Overlays
//!
//! Design-time helpers that sit on top of the page and never interact with
//! the navigator:
//!
//! - [`grid`]: 12-column alignment guides, toggled with Alt+G
//! - [`stats`]: frame rate and viewport panel, toggled with S
//!
//! Each overlay is created by its `init` and torn down by dropping it; the
//! host decides how to draw it.

pub mod grid;
pub mod stats;

pub use grid::{GridOptions, GridOverlay};
pub use stats::{FpsCounter, StatsOverlay, Viewport};

/// A key press as overlays see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: char,
    pub alt: bool,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn plain(key: char) -> Self {
        Self {
            key,
            alt: false,
            ctrl: false,
        }
    }

    pub fn alt(key: char) -> Self {
        Self {
            key,
            alt: true,
            ctrl: false,
        }
    }
}
