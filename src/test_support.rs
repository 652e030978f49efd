//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::clock::Clock;
use crate::core::history::MemoryHistory;
use crate::core::surface::MemorySurface;
use crate::core::transition::TransitionEngine;
use crate::fetch::{FetchError, FetchLocation, PageSource};

/// Serves fixed markup per location; anything else is a 404.
#[derive(Default)]
pub struct StaticPageSource {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, location: &str, markup: &str) -> Self {
        self.pages.insert(location.to_string(), markup.to_string());
        self
    }

    /// Locations requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch(&self, location: &FetchLocation) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(location.to_string());
        self.pages
            .get(location.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: 404,
                location: location.to_string(),
            })
    }
}

/// A clock that returns immediately and remembers every requested wait.
#[derive(Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Engine over in-memory boundaries, starting at `/`, with the default
/// timing (0.5s) and a recording clock.
pub fn test_engine(
    source: StaticPageSource,
) -> (
    TransitionEngine,
    Arc<MemorySurface>,
    Arc<MemoryHistory>,
    Arc<RecordingClock>,
) {
    let surface = Arc::new(MemorySurface::new());
    let history = Arc::new(MemoryHistory::new("/"));
    let clock = Arc::new(RecordingClock::default());
    let engine = TransitionEngine::new(surface.clone(), Arc::new(source), history.clone())
        .with_clock(clock.clone());
    (engine, surface, history, clock)
}
