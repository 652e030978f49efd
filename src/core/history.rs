//! # Session History
//!
//! The navigable history the navigator writes to. Hosts provide the real
//! thing (a browser's history/location, a terminal's back stack); the
//! in-memory implementation here backs the terminal host and the tests.
//!
//! ```text
//! entries: ["/", "/about", "/work"]
//!                          ▲
//!                        cursor       back() → "/about" is current again
//! ```
//!
//! `push` drops every entry after the cursor, like a browser does when you
//! navigate after going back.

use std::sync::Mutex;

use log::debug;

pub trait History: Send + Sync {
    /// Path of the entry the session is currently on.
    fn current_path(&self) -> String;

    /// Adds a new entry with the raw path as its URL and no associated data.
    fn push(&self, path: &str);

    /// Leaves the page entirely and loads `location` from scratch.
    fn redirect(&self, location: &str);
}

#[derive(Debug)]
struct Entries {
    stack: Vec<String>,
    cursor: usize,
    redirect: Option<String>,
}

#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<Entries>,
}

impl MemoryHistory {
    /// Starts a session whose only entry is `initial_path`.
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Entries {
                stack: vec![initial_path.into()],
                cursor: 0,
                redirect: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        // A poisoned lock only means another thread panicked mid-push; the
        // stack itself is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Moves one entry back. Returns the new current path, or `None` at the
    /// start of the session.
    pub fn back(&self) -> Option<String> {
        let mut entries = self.lock();
        if entries.cursor == 0 {
            return None;
        }
        entries.cursor -= 1;
        Some(entries.stack[entries.cursor].clone())
    }

    /// Moves one entry forward. Returns the new current path, or `None` at
    /// the end of the session.
    pub fn forward(&self) -> Option<String> {
        let mut entries = self.lock();
        if entries.cursor + 1 >= entries.stack.len() {
            return None;
        }
        entries.cursor += 1;
        Some(entries.stack[entries.cursor].clone())
    }

    pub fn len(&self) -> usize {
        self.lock().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().stack.is_empty()
    }

    pub fn entries(&self) -> Vec<String> {
        self.lock().stack.clone()
    }

    /// Returns and clears the pending redirect, if any.
    pub fn take_redirect(&self) -> Option<String> {
        self.lock().redirect.take()
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        let entries = self.lock();
        entries.stack[entries.cursor].clone()
    }

    fn push(&self, path: &str) {
        let mut entries = self.lock();
        let keep = entries.cursor + 1;
        entries.stack.truncate(keep);
        entries.stack.push(path.to_string());
        entries.cursor = entries.stack.len() - 1;
        debug!("History push: {} (entries={})", path, entries.stack.len());
    }

    fn redirect(&self, location: &str) {
        let mut entries = self.lock();
        entries.stack = vec![location.to_string()];
        entries.cursor = 0;
        entries.redirect = Some(location.to_string());
        debug!("History redirect: {}", location);
    }
}
