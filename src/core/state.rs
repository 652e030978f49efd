//! # Navigation State
//!
//! Session-wide record of where the navigator is and where it came from.
//!
//! ```text
//! NavigationState
//! ├── current: RouteDescriptor     // route being shown (or loading)
//! ├── previous: RouteDescriptor    // value of `current` before the last update
//! ├── is_loading: bool             // reserved for hosts that show a loading hint
//! └── is_transitioning: bool       // a transition is in flight
//! ```
//!
//! State changes only happen through `update()` and `reset_transition()`.
//! The transition engine is the only writer; everyone else reads snapshots.

/// A displayable page, derived from a URL path.
///
/// Both fields are `None` until the first navigation of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: Option<String>,
    /// Last path segment, used as a display/lookup key.
    pub page: Option<String>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            page: Some(page.into()),
        }
    }
}

/// Partial route used by `NavigationState::update`. Only the fields that are
/// `Some` overwrite the current descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteUpdate {
    pub path: Option<String>,
    pub page: Option<String>,
}

impl From<RouteDescriptor> for RouteUpdate {
    fn from(route: RouteDescriptor) -> Self {
        Self {
            path: route.path,
            page: route.page,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current: RouteDescriptor,
    pub previous: RouteDescriptor,
    pub is_loading: bool,
    pub is_transitioning: bool,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts `current` into `previous`, merges `route` into `current` and
    /// marks a transition as started.
    pub fn update(&mut self, route: impl Into<RouteUpdate>) {
        let route = route.into();
        self.previous = self.current.clone();

        if let Some(path) = route.path {
            self.current.path = Some(path);
        }
        if let Some(page) = route.page {
            self.current.page = Some(page);
        }

        self.is_transitioning = true;
    }

    pub fn reset_transition(&mut self) {
        self.is_transitioning = false;
    }

    /// True while no navigation has completed an update yet in this session,
    /// i.e. the first transition has nothing on screen to animate away.
    pub fn is_initial(&self) -> bool {
        self.previous.path.is_none()
    }
}
