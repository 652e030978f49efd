//! # PageView Component
//!
//! Renders the active content container as plain text with a link bar
//! underneath.
//!
//! ```text
//! ┌ /about ──────────────────────────────┐
//! │ About                                │
//! │                                      │
//! │ Back to Home [1] and Work [2].       │
//! └──────────────────────────────────────┘
//! ┌ Links 2/2 ───────────────────────────┐
//! │ Work [2] -> /work                    │
//! └──────────────────────────────────────┘
//! ```
//!
//! The text and link list are cached per markup string; a container swap
//! resets the selection and scroll position. While the active container
//! carries the exit marker the page is drawn dimmed, which is the terminal
//! rendition of the fade-out.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::core::surface::{Container, EXIT_MARKER};
use crate::fetch::markup::{self, Link};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// Follow the link with this `href`.
    Follow(String),
}

struct RenderedPage {
    markup: String,
    text: String,
    links: Vec<Link>,
}

pub struct PageView {
    /// Route shown in the border title.
    pub route: String,
    /// Active container is fading out.
    pub fading: bool,
    page: Option<RenderedPage>,
    selected_link: Option<usize>,
    scroll: u16,
}

impl PageView {
    pub fn new() -> Self {
        Self {
            route: String::new(),
            fading: false,
            page: None,
            selected_link: None,
            scroll: 0,
        }
    }

    /// Pulls the active container's markup. Re-renders only when it changed.
    pub fn sync(&mut self, active: Option<&Container>) {
        let Some(container) = active else {
            self.page = None;
            self.fading = false;
            return;
        };

        self.fading = container.has_class(EXIT_MARKER);
        if self
            .page
            .as_ref()
            .is_some_and(|page| page.markup == container.markup)
        {
            return;
        }

        let links = markup::extract_links(&container.markup);
        self.selected_link = if links.is_empty() { None } else { Some(0) };
        self.scroll = 0;
        self.page = Some(RenderedPage {
            markup: container.markup.clone(),
            text: markup::to_text(&container.markup),
            links,
        });
    }

    pub fn links(&self) -> &[Link] {
        self.page.as_ref().map(|p| p.links.as_slice()).unwrap_or(&[])
    }

    pub fn selected_link(&self) -> Option<&Link> {
        self.selected_link.and_then(|i| self.links().get(i))
    }

    fn select_offset(&mut self, forward: bool) {
        let count = self.links().len();
        if count == 0 {
            return;
        }
        self.selected_link = Some(match self.selected_link {
            Some(i) if forward => (i + 1) % count,
            Some(i) => (i + count - 1) % count,
            None => 0,
        });
    }

    fn follow(&self, link: Option<&Link>) -> Option<PageEvent> {
        link.map(|l| PageEvent::Follow(l.href.clone()))
    }

    fn link_bar(&self) -> Line<'_> {
        match self.selected_link() {
            Some(link) => Line::from(vec![
                Span::styled(
                    format!("{} [{}]", link.label, self.selected_link.unwrap_or(0) + 1),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" -> {}", link.href)),
            ]),
            None => Line::from(Span::styled(
                "No links on this page",
                Style::default().add_modifier(Modifier::DIM),
            )),
        }
    }
}

impl Default for PageView {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PageView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        use Constraint::{Length, Min};
        let [page_area, links_area] = Layout::vertical([Min(0), Length(3)]).areas(area);

        let style = if self.fading {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };

        let body = match &self.page {
            Some(page) => page.text.as_str(),
            None => "Loading...",
        };
        let paragraph = Paragraph::new(body)
            .block(Block::bordered().title(self.route.as_str()))
            .style(style)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, page_area);

        let title = match self.selected_link {
            Some(i) => format!("Links {}/{}", i + 1, self.links().len()),
            None => "Links".to_string(),
        };
        let bar = Paragraph::new(self.link_bar()).block(Block::bordered().title(title));
        frame.render_widget(bar, links_area);
    }
}

impl EventHandler for PageView {
    type Event = PageEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PageEvent> {
        match event {
            TuiEvent::NextLink => {
                self.select_offset(true);
                None
            }
            TuiEvent::PrevLink => {
                self.select_offset(false);
                None
            }
            TuiEvent::Activate => self.follow(self.selected_link()),
            TuiEvent::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            // Digits follow the numbered link directly
            TuiEvent::Key(key) if !key.alt && !key.ctrl => {
                let n = key.key.to_digit(10)? as usize;
                self.follow(n.checked_sub(1).and_then(|i| self.links().get(i)))
            }
            _ => None,
        }
    }
}
