//! # TUI Adapter
//!
//! The ratatui host for the navigator. Owns the in-memory document and
//! history, renders the active container, and turns key presses into link
//! activations and history pops.
//!
//! ```text
//!  keys ──► TuiEvent ──► overlays (Alt+G, S)
//!                   └──► PageView ──► PageEvent::Follow ──► spawn navigate
//!  Left/Right ──► MemoryHistory::back/forward ──► spawn handle_pop
//!  background tasks ──► NavAction (mpsc) ──► status line
//! ```
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (transition in flight, or stats panel open): draws every
//!   ~16ms so the fade and the FPS figure stay live.
//! - **Idle**: sleeps up to 250ms, only redraws on events or when a
//!   background task reports back.
//!
//! ## Reloads
//!
//! A failed fetch makes the navigator redirect to `/`. In a browser that is
//! a full page load; here the whole [`Session`] is rebuilt at the redirect
//! target, which discards the document, history and navigation state.
//!
//! A session whose very first load fails and redirects back to its own start
//! route is not rebuilt: the failure stays on screen instead of reloading
//! the same broken page forever.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use crate::core::config::ResolvedConfig;
use crate::core::history::MemoryHistory;
use crate::core::navigator::{ActivationTarget, Navigator};
use crate::core::route::normalize;
use crate::core::surface::{ContainerRole, MemorySurface};
use crate::core::transition::{TransitionEngine, TransitionOutcome, TransitionTiming};
use crate::fetch::{HttpPageSource, PageSource, Resolver};
use crate::overlay::{GridOverlay, KeyPress, StatsOverlay};
use crate::tui::component::EventHandler;
use crate::tui::components::{PageEvent, PageView};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of navigation state)
pub struct TuiState {
    pub page_view: PageView,
    pub status_message: String,
    pub grid: GridOverlay,
    /// `None` when stats are disabled in config.
    pub stats: Option<StatsOverlay>,
}

impl TuiState {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            page_view: PageView::new(),
            status_message: String::new(),
            grid: GridOverlay::init(config.grid.clone()),
            stats: config.stats_enabled.then(StatsOverlay::init),
        }
    }

    /// Offers a key to the overlays. Returns true if one consumed it.
    pub fn handle_overlay_key(&mut self, key: &KeyPress) -> bool {
        if self.grid.handle_key(key) {
            return true;
        }
        self.stats.as_mut().is_some_and(|stats| stats.handle_key(key))
    }

    fn stats_visible(&self) -> bool {
        self.stats.as_ref().is_some_and(StatsOverlay::is_visible)
    }
}

/// What a background navigation task was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavRequest {
    Init,
    Follow(String),
    Pop,
}

/// Reported back to the event loop when a navigation task finishes.
#[derive(Debug)]
pub struct NavAction {
    pub request: NavRequest,
    pub outcome: Option<TransitionOutcome>,
}

impl NavAction {
    fn status_message(&self) -> Option<String> {
        let target = match &self.request {
            NavRequest::Init => "start page".to_string(),
            NavRequest::Follow(href) => href.clone(),
            NavRequest::Pop => "history entry".to_string(),
        };
        match self.outcome.as_ref()? {
            TransitionOutcome::Completed => Some(format!("Loaded {target}")),
            // The in-flight transition owns the status line
            TransitionOutcome::Rejected => None,
            TransitionOutcome::Recovered(e) => Some(format!("Failed to load {target}: {e}")),
        }
    }
}

/// What to do after a session recorded a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reload {
    /// Nothing pending.
    Stay,
    /// Rebuild the session at this location.
    To(String),
    /// The start page itself failed; keep the session and report.
    GiveUp(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep {
    Back,
    Forward,
}

/// One "page load": a document, its history and the navigator driving them.
pub struct Session {
    navigator: Arc<Navigator>,
    surface: Arc<MemorySurface>,
    history: Arc<MemoryHistory>,
    start_path: String,
}

impl Session {
    /// Builds a session around `source` starting at `path`. Nothing is
    /// fetched until [`Session::spawn`] is called with [`NavRequest::Init`].
    pub fn new(config: &ResolvedConfig, path: &str, source: Arc<dyn PageSource>) -> Self {
        let surface = Arc::new(MemorySurface::new());
        let history = Arc::new(MemoryHistory::new(path));
        let engine = TransitionEngine::new(surface.clone(), source, history.clone())
            .with_resolver(Resolver::new(config.mode).with_source_prefix(&config.source_prefix))
            .with_timing(TransitionTiming::from_token(&config.transition_duration));
        Self {
            navigator: Arc::new(Navigator::new(engine)),
            surface,
            history,
            start_path: path.to_string(),
        }
    }

    /// Moves the history cursor one step and loads the entry. Refused while
    /// a transition is in flight, leaving the cursor where it is.
    pub fn step_history(
        &self,
        step: HistoryStep,
        tx: &mpsc::Sender<NavAction>,
    ) -> Option<tokio::task::JoinHandle<()>> {
        if self.navigator.state().is_transitioning {
            debug!("History {:?} ignored: transition in flight", step);
            return None;
        }
        let path = match step {
            HistoryStep::Back => self.history.back(),
            HistoryStep::Forward => self.history.forward(),
        }?;
        debug!("History {:?} to {}", step, path);
        Some(self.spawn(NavRequest::Pop, tx.clone()))
    }

    /// Consumes a pending redirect and decides whether to rebuild.
    ///
    /// A redirect raised by the session's first load (nothing was ever shown)
    /// that points back at the start route would only fail again.
    pub fn take_reload(&self) -> Reload {
        let Some(location) = self.history.take_redirect() else {
            return Reload::Stay;
        };
        let first_load = self.navigator.state().is_initial();
        if first_load && normalize(&location) == normalize(&self.start_path) {
            Reload::GiveUp(location)
        } else {
            Reload::To(location)
        }
    }

    /// Runs a navigation request in the background, reporting to `tx`.
    pub fn spawn(
        &self,
        request: NavRequest,
        tx: mpsc::Sender<NavAction>,
    ) -> tokio::task::JoinHandle<()> {
        let navigator = self.navigator.clone();
        tokio::spawn(async move {
            let outcome = match &request {
                NavRequest::Init => Some(navigator.init().await),
                NavRequest::Follow(href) => {
                    navigator
                        .handle_activation(&ActivationTarget::link(href.as_str()))
                        .await
                }
                NavRequest::Pop => Some(navigator.handle_pop().await),
            };
            debug!("Navigation {:?} finished: {:?}", request, outcome);
            let _ = tx.send(NavAction { request, outcome });
        })
    }
}

fn start_session(
    config: &ResolvedConfig,
    path: &str,
    tx: &mpsc::Sender<NavAction>,
) -> std::io::Result<Session> {
    let source = HttpPageSource::new(&config.base_url)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let session = Session::new(config, path, Arc::new(source));
    session.spawn(NavRequest::Init, tx.clone());
    info!("Session started at {} ({})", path, config.base_url);
    Ok(session)
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    // Channel for results from navigation tasks
    let (tx, rx) = mpsc::channel();

    let mut session = start_session(&config, &config.start_path, &tx)?;
    let mut tui = TuiState::new(&config);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame

    loop {
        let state = session.navigator.state();
        tui.page_view
            .sync(session.surface.container(ContainerRole::Active).as_ref());

        let animating = state.is_transitioning || tui.stats_visible();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &state, &mut tui))?;
            if let Some(stats) = tui.stats.as_mut() {
                stats.frame(Instant::now());
            }
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Quit => {
                    should_quit = true;
                    break;
                }
                TuiEvent::Resize => {}
                TuiEvent::Back => {
                    session.step_history(HistoryStep::Back, &tx);
                }
                TuiEvent::Forward => {
                    session.step_history(HistoryStep::Forward, &tx);
                }
                TuiEvent::Key(key) if tui.handle_overlay_key(&key) => {}
                other => {
                    if let Some(PageEvent::Follow(href)) = tui.page_view.handle_event(&other) {
                        tui.status_message = format!("Loading {href}");
                        session.spawn(NavRequest::Follow(href), tx.clone());
                    }
                }
            }
        }
        if should_quit {
            break;
        }

        // Drain results from navigation tasks
        while let Ok(action) = rx.try_recv() {
            if let Some(message) = action.status_message() {
                tui.status_message = message;
            }
            needs_redraw = true;
        }

        match session.take_reload() {
            Reload::Stay => {}
            Reload::To(location) => {
                warn!("Redirected to {}, reloading", location);
                session = start_session(&config, &location, &tx)?;
                tui.page_view = PageView::new();
                needs_redraw = true;
            }
            Reload::GiveUp(location) => {
                warn!("Start page {} failed to load, not reloading", location);
                tui.status_message = format!("Could not load {location}; press q to quit");
                needs_redraw = true;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, PageflipConfig, resolve};
    use crate::core::history::History;
    use crate::test_support::StaticPageSource;

    fn config() -> ResolvedConfig {
        let mut config = resolve(&PageflipConfig::default(), &CliOverrides::default());
        config.transition_duration = "0s".to_string();
        config
    }

    fn source() -> Arc<StaticPageSource> {
        Arc::new(
            StaticPageSource::new()
                .with_page("/index.html", r#"<body><a href="/about">About</a></body>"#)
                .with_page("/about.html", "<body><h1>About</h1></body>"),
        )
    }

    #[tokio::test]
    async fn test_session_init_loads_start_page() {
        let (tx, rx) = mpsc::channel();
        let session = Session::new(&config(), "/", source());

        session.spawn(NavRequest::Init, tx).await.unwrap();

        let action = rx.try_recv().unwrap();
        assert_eq!(action.request, NavRequest::Init);
        assert_eq!(action.status_message().as_deref(), Some("Loaded start page"));
        assert!(
            session
                .surface
                .active_markup()
                .unwrap()
                .contains("/about")
        );
    }

    #[tokio::test]
    async fn test_session_follow_and_pop() {
        let (tx, rx) = mpsc::channel();
        let session = Session::new(&config(), "/", source());
        session.spawn(NavRequest::Init, tx.clone()).await.unwrap();

        session
            .spawn(NavRequest::Follow("/about".to_string()), tx.clone())
            .await
            .unwrap();
        assert_eq!(session.history.current_path(), "/about");
        assert!(session.surface.active_markup().unwrap().contains("About"));

        session.history.back();
        session.spawn(NavRequest::Pop, tx).await.unwrap();
        assert_eq!(
            session.navigator.state().current.path.as_deref(),
            Some("/index")
        );

        let messages: Vec<_> = rx.try_iter().filter_map(|a| a.status_message()).collect();
        assert_eq!(
            messages,
            vec!["Loaded start page", "Loaded /about", "Loaded history entry"]
        );
    }

    #[tokio::test]
    async fn test_session_missing_page_redirects() {
        let (tx, rx) = mpsc::channel();
        let session = Session::new(&config(), "/missing", source());

        session.spawn(NavRequest::Init, tx).await.unwrap();

        let action = rx.try_recv().unwrap();
        assert!(
            action
                .status_message()
                .unwrap()
                .starts_with("Failed to load start page")
        );
        assert_eq!(session.history.take_redirect().as_deref(), Some("/"));
        assert!(!session.navigator.state().is_transitioning);
    }

    #[tokio::test]
    async fn test_failed_start_page_is_not_reloaded() {
        let (tx, rx) = mpsc::channel();
        let session = Session::new(&config(), "/", Arc::new(StaticPageSource::new()));

        session.spawn(NavRequest::Init, tx).await.unwrap();

        assert!(rx.try_recv().unwrap().status_message().is_some());
        assert_eq!(session.take_reload(), Reload::GiveUp("/".to_string()));
        // The redirect was consumed
        assert_eq!(session.take_reload(), Reload::Stay);
    }

    #[tokio::test]
    async fn test_index_route_counts_as_start_page() {
        let (tx, _rx) = mpsc::channel();
        let session = Session::new(&config(), "/index.html", Arc::new(StaticPageSource::new()));

        session.spawn(NavRequest::Init, tx).await.unwrap();

        assert_eq!(session.take_reload(), Reload::GiveUp("/".to_string()));
    }

    #[tokio::test]
    async fn test_failed_deep_link_reloads_home_once() {
        let (tx, _rx) = mpsc::channel();
        let session = Session::new(&config(), "/missing", source());
        session.spawn(NavRequest::Init, tx.clone()).await.unwrap();
        assert_eq!(session.take_reload(), Reload::To("/".to_string()));

        // Home is broken too: the rebuilt session stops there
        let rebuilt = Session::new(&config(), "/", Arc::new(StaticPageSource::new()));
        rebuilt.spawn(NavRequest::Init, tx).await.unwrap();
        assert_eq!(rebuilt.take_reload(), Reload::GiveUp("/".to_string()));
    }

    #[tokio::test]
    async fn test_failed_follow_after_start_reloads() {
        let (tx, _rx) = mpsc::channel();
        let session = Session::new(&config(), "/", source());
        session.spawn(NavRequest::Init, tx.clone()).await.unwrap();
        assert_eq!(session.take_reload(), Reload::Stay);

        session
            .spawn(NavRequest::Follow("/missing".to_string()), tx)
            .await
            .unwrap();
        assert_eq!(session.take_reload(), Reload::To("/".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_step_refused_while_transitioning() {
        let mut config = config();
        config.transition_duration = "0.5s".to_string();
        let (tx, rx) = mpsc::channel();
        let session = Session::new(&config, "/", source());
        session.spawn(NavRequest::Init, tx.clone()).await.unwrap();

        let follow = session.spawn(NavRequest::Follow("/about".to_string()), tx.clone());
        for _ in 0..10 {
            if session.navigator.state().is_transitioning {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(session.navigator.state().is_transitioning);

        assert!(session.step_history(HistoryStep::Back, &tx).is_none());
        assert_eq!(session.history.current_path(), "/about");
        assert_eq!(session.history.entries(), vec!["/", "/about"]);

        follow.await.unwrap();
        assert!(!session.navigator.state().is_transitioning);

        let pop = session.step_history(HistoryStep::Back, &tx).unwrap();
        pop.await.unwrap();
        assert_eq!(session.history.current_path(), "/");
        assert_eq!(
            session.navigator.state().current.path.as_deref(),
            Some("/index")
        );

        // Nothing left to go back to
        assert!(session.step_history(HistoryStep::Back, &tx).is_none());

        let messages: Vec<_> = rx.try_iter().filter_map(|a| a.status_message()).collect();
        assert_eq!(
            messages,
            vec!["Loaded start page", "Loaded /about", "Loaded history entry"]
        );
    }

    #[test]
    fn test_rejected_navigation_keeps_status() {
        let action = NavAction {
            request: NavRequest::Follow("/about".to_string()),
            outcome: Some(TransitionOutcome::Rejected),
        };
        assert_eq!(action.status_message(), None);
    }

    #[test]
    fn test_overlay_keys() {
        let mut tui = TuiState::new(&config());
        assert!(tui.handle_overlay_key(&KeyPress::alt('g')));
        assert!(tui.grid.is_visible());
        assert!(tui.handle_overlay_key(&KeyPress::plain('s')));
        assert!(tui.stats_visible());
        assert!(!tui.handle_overlay_key(&KeyPress::plain('1')));
    }

    #[test]
    fn test_stats_disabled_by_config() {
        let mut config = config();
        config.stats_enabled = false;
        let mut tui = TuiState::new(&config);
        assert!(!tui.handle_overlay_key(&KeyPress::plain('s')));
        assert!(tui.stats.is_none());
    }
}
