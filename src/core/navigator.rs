//! # Navigator
//!
//! Public entry point of the router. Hosts route two kinds of input here:
//!
//! - link activation (`handle_activation`): the host never follows links
//!   itself, the navigator pushes a history entry and transitions
//! - history pops (`handle_pop`): the host already moved the history
//!   cursor, the navigator only loads the page
//!
//! Everything else is delegated to the [`TransitionEngine`]. The navigator
//! owns the page for its whole session; there is no teardown.

use std::sync::Arc;

use log::{debug, info};

use crate::core::history::History;
use crate::core::state::NavigationState;
use crate::core::surface::{ContainerRole, ContentSurface};
use crate::core::transition::{TransitionEngine, TransitionOutcome};

/// What the user activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationTarget {
    /// An `a` element, with its `href` if it has one.
    Link { href: Option<String> },
    /// Anything that is not a hyperlink.
    Other,
}

impl ActivationTarget {
    pub fn link(href: impl Into<String>) -> Self {
        ActivationTarget::Link {
            href: Some(href.into()),
        }
    }
}

pub struct Navigator {
    engine: TransitionEngine,
}

impl Navigator {
    pub fn new(engine: TransitionEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    fn history(&self) -> &Arc<dyn History> {
        self.engine.history()
    }

    fn surface(&self) -> &Arc<dyn ContentSurface> {
        self.engine.surface()
    }

    /// Snapshot of the navigation state.
    pub fn state(&self) -> NavigationState {
        self.engine.state()
    }

    /// Takes over the document: wraps the existing body into the active
    /// container and loads the current location.
    pub async fn init(&self) -> TransitionOutcome {
        self.surface().wrap_existing(ContainerRole::Active);
        let path = self.history().current_path();
        info!("Navigator init at {}", path);
        self.load_page(&path).await
    }

    /// Navigates to `path`, adding a history entry.
    ///
    /// Dropped while a transition is in flight. The guard runs before the
    /// history push, so a dropped navigation leaves no entry behind.
    pub async fn navigate(&self, path: &str) -> TransitionOutcome {
        let history = self.history().clone();
        let accepted = self
            .engine
            .begin_transition_with(path, || history.push(path));

        match accepted {
            Some(in_flight) => self.engine.run(in_flight).await,
            None => TransitionOutcome::Rejected,
        }
    }

    /// Loads `path` without touching history.
    pub async fn load_page(&self, path: &str) -> TransitionOutcome {
        self.engine.transition_to(path).await
    }

    /// Link activation. Returns `None` for targets that are not links with
    /// an `href`; those are left to the host.
    pub async fn handle_activation(&self, target: &ActivationTarget) -> Option<TransitionOutcome> {
        match target {
            ActivationTarget::Link { href: Some(href) } => Some(self.navigate(href).await),
            _ => {
                debug!("Ignoring activation of {:?}", target);
                None
            }
        }
    }

    /// Back/forward: loads whatever location history now points at.
    pub async fn handle_pop(&self) -> TransitionOutcome {
        let path = self.history().current_path();
        debug!("History pop to {}", path);
        self.load_page(&path).await
    }
}
