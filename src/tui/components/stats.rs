//! Stats panel, pinned to the top-right corner.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::overlay::{StatsOverlay, Viewport};

/// Where the panel goes inside `area`, sized to fit `lines`.
fn panel_area(area: Rect, lines: &[String]) -> Rect {
    let inner_width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0) as u16;
    let width = inner_width.saturating_add(2).min(area.width);
    let height = (lines.len() as u16).saturating_add(2).min(area.height);
    Rect::new(
        area.right().saturating_sub(width),
        area.y,
        width,
        height,
    )
}

/// Draws the panel if it is visible. The viewport reported is the whole
/// terminal, in cells.
pub fn render_stats(frame: &mut Frame, stats: &StatsOverlay) {
    if !stats.is_visible() {
        return;
    }
    let area = frame.area();
    let lines = stats.info_lines(Viewport {
        width: area.width,
        height: area.height,
    });
    let panel = panel_area(area, &lines);

    frame.render_widget(Clear, panel);
    frame.render_widget(
        Paragraph::new(lines.join("\n"))
            .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)))
            .style(Style::default().fg(Color::Green)),
        panel,
    );
}
