//! Column grid overlay.
//!
//! Twelve column guides laid over the page. Colors and border settings are
//! passed through to the presentation layer as `--grid-columns-*` custom
//! properties; only the ones that were set are emitted.

use std::ops::Range;

use log::debug;
use serde::{Deserialize, Serialize};

use super::KeyPress;

pub const COLUMN_COUNT: u16 = 12;

/// Space between two column guides, in cells.
pub const GUTTER: u16 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GridOptions {
    /// Visible right away (default: hidden until toggled).
    #[serde(default)]
    pub show: bool,
    pub columns_color: Option<String>,
    pub columns_border_color: Option<String>,
    pub columns_border_width: Option<String>,
    pub columns_border_style: Option<String>,
}

#[derive(Debug)]
pub struct GridOverlay {
    options: GridOptions,
    visible: bool,
}

impl GridOverlay {
    pub fn init(options: GridOptions) -> Self {
        debug!("Grid overlay init (show={})", options.show);
        Self {
            visible: options.show,
            options,
        }
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Alt+G toggles the grid. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: &KeyPress) -> bool {
        if key.alt && key.key.eq_ignore_ascii_case(&'g') {
            self.toggle();
            debug!("Grid overlay {}", if self.visible { "shown" } else { "hidden" });
            return true;
        }
        false
    }

    /// Custom properties to apply to the overlay element.
    pub fn custom_properties(&self) -> Vec<(&'static str, &str)> {
        [
            ("--grid-columns-color", &self.options.columns_color),
            ("--grid-columns-border-color", &self.options.columns_border_color),
            ("--grid-columns-border-width", &self.options.columns_border_width),
            ("--grid-columns-border-style", &self.options.columns_border_style),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (name, v))
        })
        .collect()
    }
}

/// Splits `width` cells into [`COLUMN_COUNT`] column spans separated by
/// [`GUTTER`]. Leftover cells go to the leftmost columns. Columns that do
/// not fit collapse to empty ranges.
pub fn column_spans(width: u16) -> Vec<Range<u16>> {
    let gutters = GUTTER * (COLUMN_COUNT - 1);
    let usable = width.saturating_sub(gutters);
    let base = usable / COLUMN_COUNT;
    let extra = usable % COLUMN_COUNT;

    let mut spans = Vec::with_capacity(COLUMN_COUNT as usize);
    let mut x = 0u16;
    for i in 0..COLUMN_COUNT {
        let w = base + u16::from(i < extra);
        let start = x.min(width);
        let end = x.saturating_add(w).min(width);
        spans.push(start..end);
        x = x.saturating_add(w + GUTTER);
    }
    spans
}
