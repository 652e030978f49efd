//! # Grid overlay rendering
//!
//! Paints the column guides from [`crate::overlay::grid`] straight into the
//! frame buffer, on top of whatever is already drawn. Columns tint the
//! background; borders are drawn only into empty edge cells so page text
//! stays readable.
//!
//! The `--grid-columns-*` options are interpreted for a terminal:
//!
//! | option                 | terminal meaning                         |
//! |------------------------|------------------------------------------|
//! | `columns_color`        | background tint (`#rrggbb[aa]` or name)  |
//! | `columns_border_color` | border foreground                        |
//! | `columns_border_width` | `0` disables borders                     |
//! | `columns_border_style` | `solid`, `dashed`, `dotted`, `double`    |

use std::str::FromStr;

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Color;

use crate::overlay::GridOverlay;
use crate::overlay::grid::column_spans;

const DEFAULT_COLUMN_COLOR: Color = Color::Rgb(48, 16, 16);
const DEFAULT_BORDER_COLOR: Color = Color::Red;

/// Resolved drawing parameters for the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStyle {
    pub column: Color,
    pub border: Option<(Color, &'static str)>,
}

impl GridStyle {
    pub fn from_overlay(grid: &GridOverlay) -> Self {
        let mut style = GridStyle {
            column: DEFAULT_COLUMN_COLOR,
            border: Some((DEFAULT_BORDER_COLOR, "│")),
        };
        for (name, value) in grid.custom_properties() {
            match name {
                "--grid-columns-color" => {
                    if let Some(color) = parse_color(value) {
                        style.column = color;
                    }
                }
                "--grid-columns-border-color" => {
                    if let (Some(color), Some((_, symbol))) = (parse_color(value), style.border) {
                        style.border = Some((color, symbol));
                    }
                }
                "--grid-columns-border-width" => {
                    if leading_number(value) == Some(0.0) {
                        style.border = None;
                    }
                }
                "--grid-columns-border-style" => {
                    if let Some((color, _)) = style.border {
                        style.border = border_symbol(value).map(|symbol| (color, symbol));
                    }
                }
                _ => {}
            }
        }
        style
    }
}

/// Parses a color name or `#rrggbb`. An alpha channel (`#rrggbbaa`) is
/// dropped; terminals have no transparency.
fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    let value = match value.strip_prefix('#') {
        Some(hex) if hex.len() == 8 && hex.is_ascii() => &value[..7],
        _ => value,
    };
    Color::from_str(value).ok()
}

fn leading_number(value: &str) -> Option<f64> {
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

fn border_symbol(style: &str) -> Option<&'static str> {
    match style.trim() {
        "none" | "hidden" => None,
        "dashed" => Some("╎"),
        "dotted" => Some("┊"),
        "double" => Some("║"),
        _ => Some("│"),
    }
}

/// Draws the grid over `area`. No-op while the overlay is hidden.
pub fn render_grid(frame: &mut Frame, area: Rect, grid: &GridOverlay) {
    if !grid.is_visible() {
        return;
    }
    let style = GridStyle::from_overlay(grid);
    let buf = frame.buffer_mut();

    for span in column_spans(area.width).into_iter().filter(|s| !s.is_empty()) {
        let left = area.x + span.start;
        let right = area.x + span.end - 1;
        for y in area.top()..area.bottom() {
            for x in left..=right {
                let Some(cell) = buf.cell_mut(Position::new(x, y)) else {
                    continue;
                };
                cell.set_bg(style.column);
                if let Some((color, symbol)) = style.border
                    && (x == left || x == right)
                    && cell.symbol() == " "
                {
                    cell.set_symbol(symbol);
                    cell.set_fg(color);
                }
            }
        }
    }
}
