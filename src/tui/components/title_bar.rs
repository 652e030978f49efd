//! # TitleBar Component
//!
//! Top status bar: current route, last navigation status and a marker while
//! a transition is in flight.
//!
//! Purely presentational. All data arrives as props:
//!
//! - `route`: the route the navigator last switched to
//! - `status_message`: outcome of the last navigation, redirect notices
//! - `transitioning`: whether the single-flight guard is currently held
//!
//! The title text degrades in this order:
//!
//! 1. **In flight**: `"Pageflip (route: /about) | Loading /about | ⇄"`
//! 2. **Status message**: `"Pageflip (route: /about) | Loaded /about"`
//! 3. **Default**: `"Pageflip (route: /about)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Top status bar component showing route, status, and transition marker.
pub struct TitleBar {
    pub route: String,
    pub status_message: String,
    pub transitioning: bool,
}

impl TitleBar {
    pub fn new(route: String, status_message: String, transitioning: bool) -> Self {
        Self {
            route,
            status_message,
            transitioning,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("Pageflip (route: {})", self.route);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.transitioning {
            text.push_str(" | ⇄");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
