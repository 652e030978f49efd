//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: route, last status and in-flight marker
//! - `grid::render_grid` / `stats::render_stats`: overlay painters that take
//!   the overlay model by reference
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `PageView`: active page text, link selection and scrolling; emits
//!   `PageEvent::Follow` when a link is activated
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs        (this file)
//! ├── title_bar.rs  (Top status bar)
//! ├── page_view.rs  (Page text + link bar)
//! ├── grid.rs       (Column guides)
//! └── stats.rs      (Viewport / FPS panel)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod grid;
pub mod page_view;
pub mod stats;
pub use page_view::{PageEvent, PageView};
