//! # Transition Engine
//!
//! Replaces the active page content with freshly fetched content, one
//! transition at a time.
//!
//! ```text
//!            begin_transition(path)
//!   Idle ───────────────────────────▶ Preparing      state.update(route), resolve location
//!                                         │          fetch + extract body, insert incoming
//!                                         ▼
//!                                     Animating      initial: drop active container now
//!                                         │          otherwise: mark exit/enter, wait d × 1.2
//!                                         ▼
//!                                     Settling       remove outgoing, incoming becomes active
//!                                         │
//!   Idle ◀────────────────────────────────┘          reset_transition() (always, even on error)
//! ```
//!
//! A fetch failure in `Preparing` sends the whole session to `/` instead.
//! There is no retry and no cancellation.
//!
//! `begin_transition` is the single-flight guard: it checks and sets
//! `is_transitioning` under one lock, so a second caller is turned away
//! without touching state. The returned `InFlight` resets the flag when it
//! is dropped, whether or not the transition ran to completion.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info, warn};

use crate::core::clock::{Clock, TokioClock};
use crate::core::history::History;
use crate::core::state::{NavigationState, RouteDescriptor};
use crate::core::surface::{ContainerRole, ContentSurface, ENTER_MARKER, EXIT_MARKER};
use crate::fetch::{FetchError, FetchLocation, PageSource, Resolver, markup};

/// Multiplier applied to the presentation-layer duration before the outgoing
/// container is removed.
pub const OVERSHOOT_FACTOR: f64 = 1.2;

/// Transition duration used when the host declares none.
pub const DEFAULT_TRANSITION_DURATION: &str = "0.5s";

/// Where a failed navigation sends the session.
pub const FALLBACK_LOCATION: &str = "/";

// ============================================================================
// Timing
// ============================================================================

/// Duration of the presentation layer's cross-fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    duration: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self::from_token(DEFAULT_TRANSITION_DURATION)
    }
}

impl TransitionTiming {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Parses a `--transition-duration` style token such as `"0.5s"`.
    ///
    /// The leading number is read as seconds (`ms` suffix: milliseconds).
    /// Any other unit, or anything unparseable, becomes a zero duration.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        let number_end = token
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '+' || c == '-'))
            .unwrap_or(token.len());
        let (number, unit) = token.split_at(number_end);

        let per_second = match unit.trim().to_ascii_lowercase().as_str() {
            "" | "s" => Some(1.0),
            "ms" => Some(1000.0),
            _ => None,
        };

        let seconds = match (number.parse::<f64>(), per_second) {
            (Ok(value), Some(per_second)) if value.is_finite() && value >= 0.0 => {
                value / per_second
            }
            _ => {
                warn!("Unusable transition duration {:?}, using 0", token);
                0.0
            }
        };

        Self::new(Duration::try_from_secs_f64(seconds).unwrap_or_else(|e| {
            warn!("Transition duration {:?} out of range ({}), using 0", token, e);
            Duration::ZERO
        }))
    }

    /// The declared animation duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// How long the engine waits before removing outgoing content.
    pub fn wait(&self) -> Duration {
        self.duration.mul_f64(OVERSHOOT_FACTOR)
    }
}

// ============================================================================
// Phases
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    /// State is updated; markup for `location` still has to be fetched.
    Preparing {
        route: RouteDescriptor,
        location: FetchLocation,
        /// First navigation of the session: nothing on screen to animate.
        initial: bool,
    },
    /// Incoming content is in the document; the handoff has not started.
    Animating { initial: bool },
    /// The handoff has finished; containers still need their final roles.
    Settling { initial: bool },
}

impl TransitionPhase {
    fn name(&self) -> &'static str {
        match self {
            TransitionPhase::Idle => "idle",
            TransitionPhase::Preparing { .. } => "preparing",
            TransitionPhase::Animating { .. } => "animating",
            TransitionPhase::Settling { .. } => "settling",
        }
    }
}

#[derive(Debug)]
pub enum TransitionOutcome {
    /// New content is active.
    Completed,
    /// Another transition was in flight; nothing happened.
    Rejected,
    /// The fetch failed and the session was redirected to the fallback.
    Recovered(FetchError),
}

impl TransitionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransitionOutcome::Completed)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, TransitionOutcome::Rejected)
    }
}

impl fmt::Display for TransitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionOutcome::Completed => write!(f, "completed"),
            TransitionOutcome::Rejected => write!(f, "rejected (transition in flight)"),
            TransitionOutcome::Recovered(e) => write!(f, "recovered to {FALLBACK_LOCATION}: {e}"),
        }
    }
}

/// Clears `is_transitioning` when dropped.
struct ResetOnDrop {
    state: Arc<Mutex<NavigationState>>,
}

impl Drop for ResetOnDrop {
    fn drop(&mut self) {
        lock(&self.state).reset_transition();
    }
}

/// A transition that passed the single-flight guard.
pub struct InFlight {
    phase: TransitionPhase,
    reset: ResetOnDrop,
}

impl InFlight {
    pub fn phase(&self) -> &TransitionPhase {
        &self.phase
    }
}

fn lock(state: &Mutex<NavigationState>) -> MutexGuard<'_, NavigationState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

// ============================================================================
// Engine
// ============================================================================

pub struct TransitionEngine {
    state: Arc<Mutex<NavigationState>>,
    surface: Arc<dyn ContentSurface>,
    source: Arc<dyn PageSource>,
    history: Arc<dyn History>,
    clock: Arc<dyn Clock>,
    resolver: Resolver,
    timing: TransitionTiming,
}

impl TransitionEngine {
    pub fn new(
        surface: Arc<dyn ContentSurface>,
        source: Arc<dyn PageSource>,
        history: Arc<dyn History>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(NavigationState::new())),
            surface,
            source,
            history,
            clock: Arc::new(TokioClock),
            resolver: Resolver::default(),
            timing: TransitionTiming::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_timing(mut self, timing: TransitionTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    pub fn surface(&self) -> &Arc<dyn ContentSurface> {
        &self.surface
    }

    /// Snapshot of the navigation state.
    pub fn state(&self) -> NavigationState {
        lock(&self.state).clone()
    }

    pub fn is_transitioning(&self) -> bool {
        lock(&self.state).is_transitioning
    }

    /// `Idle -> Preparing`. Returns `None` (and changes nothing) while
    /// another transition is in flight.
    pub fn begin_transition(&self, path: &str) -> Option<InFlight> {
        self.begin_transition_with(path, || {})
    }

    /// Like `begin_transition`, running `on_accept` after the guard passes
    /// and before the state update. The navigator pushes history here so a
    /// rejected navigation never leaves a history entry behind.
    pub fn begin_transition_with(&self, path: &str, on_accept: impl FnOnce()) -> Option<InFlight> {
        let mut state = lock(&self.state);
        if state.is_transitioning {
            debug!("Transition to {} dropped: another transition is in flight", path);
            return None;
        }

        on_accept();

        let route = RouteDescriptor::from_path(path);
        state.update(route.clone());
        let initial = state.is_initial();
        drop(state);

        let location = self.resolver.resolve(path);
        info!(
            "Transition start: {} -> {} (location={}, initial={})",
            path,
            route.path.as_deref().unwrap_or_default(),
            location,
            initial
        );

        Some(InFlight {
            phase: TransitionPhase::Preparing {
                route,
                location,
                initial,
            },
            reset: ResetOnDrop {
                state: self.state.clone(),
            },
        })
    }

    /// Performs a single phase transition.
    pub async fn step(&self, phase: TransitionPhase) -> Result<TransitionPhase, FetchError> {
        match phase {
            TransitionPhase::Idle => Ok(TransitionPhase::Idle),

            TransitionPhase::Preparing {
                location, initial, ..
            } => {
                let page = self.source.fetch(&location).await?;
                let body = markup::body_inner(&page);
                self.surface.insert_container(ContainerRole::Incoming, &body);
                Ok(TransitionPhase::Animating { initial })
            }

            TransitionPhase::Animating { initial: true } => {
                if !self.surface.remove_container(ContainerRole::Active) {
                    debug!("No active container to replace on initial load");
                }
                Ok(TransitionPhase::Settling { initial: true })
            }

            TransitionPhase::Animating { initial: false } => {
                self.surface.mark(ContainerRole::Active, EXIT_MARKER);
                self.surface.mark(ContainerRole::Incoming, ENTER_MARKER);
                let wait = self.timing.wait();
                debug!("Waiting {}ms for the handoff", wait.as_millis());
                self.clock.sleep(wait).await;
                Ok(TransitionPhase::Settling { initial: false })
            }

            TransitionPhase::Settling { initial } => {
                if !initial && !self.surface.remove_container(ContainerRole::Active) {
                    warn!("Outgoing container was already gone");
                }
                self.surface
                    .reassign(ContainerRole::Incoming, ContainerRole::Active);
                self.surface.unmark(ContainerRole::Active, ENTER_MARKER);
                Ok(TransitionPhase::Idle)
            }
        }
    }

    /// Drives an accepted transition to `Idle`, recovering from fetch
    /// failures by redirecting to the fallback location.
    pub async fn run(&self, in_flight: InFlight) -> TransitionOutcome {
        let InFlight { mut phase, reset } = in_flight;

        let outcome = loop {
            debug!("Transition phase: {}", phase.name());
            match self.step(phase).await {
                Ok(TransitionPhase::Idle) => break TransitionOutcome::Completed,
                Ok(next) => phase = next,
                Err(e) => {
                    warn!("Navigation failed: {}. Redirecting to {}", e, FALLBACK_LOCATION);
                    self.history.redirect(FALLBACK_LOCATION);
                    break TransitionOutcome::Recovered(e);
                }
            }
        };

        drop(reset);
        info!("Transition finished: {}", outcome);
        outcome
    }

    /// `begin_transition` followed by `run`.
    pub async fn transition_to(&self, path: &str) -> TransitionOutcome {
        match self.begin_transition(path) {
            Some(in_flight) => self.run(in_flight).await,
            None => TransitionOutcome::Rejected,
        }
    }
}
