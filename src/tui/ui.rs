use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::NavigationState;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::TitleBar;
use crate::tui::components::grid::render_grid;
use crate::tui::components::stats::render_stats;

pub fn draw_ui(frame: &mut Frame, state: &NavigationState, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0)]);
    let [title_area, main_area] = layout.areas(frame.area());

    let route = state
        .current
        .path
        .clone()
        .unwrap_or_else(|| "-".to_string());

    let mut title_bar = TitleBar::new(
        route.clone(),
        tui.status_message.clone(),
        state.is_transitioning,
    );
    title_bar.render(frame, title_area);

    tui.page_view.route = route;
    tui.page_view.render(frame, main_area);

    render_grid(frame, main_area, &tui.grid);
    if let Some(stats) = &tui.stats {
        render_stats(frame, stats);
    }
}
