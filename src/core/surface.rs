//! # Content Surface
//!
//! The document-side half of a transition. The engine only ever talks about
//! two container roles and a pair of markers; what a "container" physically
//! is belongs to the host.
//!
//! ```text
//! body
//! ├── div#current-content.page-container[.page-exit]    (Active)
//! └── div#new-content.page-container[.page-enter]       (Incoming)
//! ```
//!
//! The presentation layer animates `page-exit` / `page-enter`. The engine
//! handles timing and lifecycle only.

use std::sync::Mutex;

use log::{debug, warn};
use tokio::time::Instant;

/// Class carried by every page container.
pub const CONTAINER_CLASS: &str = "page-container";
/// Marker on the outgoing container while it animates out.
pub const EXIT_MARKER: &str = "page-exit";
/// Marker on the incoming container while it animates in.
pub const ENTER_MARKER: &str = "page-enter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRole {
    /// Content the user currently sees.
    Active,
    /// Content being prepared to replace it.
    Incoming,
}

impl ContainerRole {
    /// Stable element identifier for the role.
    pub fn id(self) -> &'static str {
        match self {
            ContainerRole::Active => "current-content",
            ContainerRole::Incoming => "new-content",
        }
    }
}

pub trait ContentSurface: Send + Sync {
    /// Moves everything currently in the document body into a new container
    /// with the given role.
    fn wrap_existing(&self, role: ContainerRole);

    /// Appends a new container holding `markup` to the document body.
    fn insert_container(&self, role: ContainerRole, markup: &str);

    fn mark(&self, role: ContainerRole, marker: &str);

    fn unmark(&self, role: ContainerRole, marker: &str);

    /// Removes the container with the given role. Returns false if there
    /// was none.
    fn remove_container(&self, role: ContainerRole) -> bool;

    /// Re-identifies the container holding `from` as `to`.
    fn reassign(&self, from: ContainerRole, to: ContainerRole);
}

// ============================================================================
// In-memory document
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub classes: Vec<String>,
    pub markup: String,
}

impl Container {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn to_markup(&self) -> String {
        format!(
            "<div id=\"{}\" class=\"{}\">{}</div>",
            self.id,
            self.classes.join(" "),
            self.markup
        )
    }
}

/// A surface mutation, recorded with the (tokio) time it happened at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    Wrap(ContainerRole),
    Insert(ContainerRole),
    Mark(ContainerRole, String),
    Unmark(ContainerRole, String),
    Remove(ContainerRole),
    Reassign(ContainerRole, ContainerRole),
}

#[derive(Debug, Clone)]
pub struct SurfaceEvent {
    pub at: Instant,
    pub op: SurfaceOp,
}

#[derive(Debug, Default)]
struct Document {
    /// Body markup that is not inside any container yet.
    loose: String,
    containers: Vec<Container>,
    log: Vec<SurfaceEvent>,
}

impl Document {
    fn find_mut(&mut self, role: ContainerRole) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.id == role.id())
    }

    fn record(&mut self, op: SurfaceOp) {
        self.log.push(SurfaceEvent {
            at: Instant::now(),
            op,
        });
    }
}

/// Document body kept in memory. Used by the terminal host and by tests.
#[derive(Debug, Default)]
pub struct MemorySurface {
    doc: Mutex<Document>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose body already holds `markup`, as a server-rendered
    /// page would before the navigator takes over.
    pub fn with_body(markup: impl Into<String>) -> Self {
        Self {
            doc: Mutex::new(Document {
                loose: markup.into(),
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Document> {
        self.doc.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Containers in document order.
    pub fn containers(&self) -> Vec<Container> {
        self.lock().containers.clone()
    }

    pub fn container(&self, role: ContainerRole) -> Option<Container> {
        self.lock()
            .containers
            .iter()
            .find(|c| c.id == role.id())
            .cloned()
    }

    /// Markup of the active container, if there is one.
    pub fn active_markup(&self) -> Option<String> {
        self.container(ContainerRole::Active).map(|c| c.markup)
    }

    /// Every mutation applied so far, oldest first.
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.lock().log.clone()
    }
}

impl ContentSurface for MemorySurface {
    fn wrap_existing(&self, role: ContainerRole) {
        let mut doc = self.lock();
        let mut markup = std::mem::take(&mut doc.loose);
        for container in doc.containers.drain(..) {
            markup.push_str(&container.to_markup());
        }
        doc.containers.push(Container {
            id: role.id().to_string(),
            classes: vec![CONTAINER_CLASS.to_string()],
            markup,
        });
        doc.record(SurfaceOp::Wrap(role));
    }

    fn insert_container(&self, role: ContainerRole, markup: &str) {
        let mut doc = self.lock();
        doc.containers.push(Container {
            id: role.id().to_string(),
            classes: vec![CONTAINER_CLASS.to_string()],
            markup: markup.to_string(),
        });
        debug!("Inserted {} ({} bytes)", role.id(), markup.len());
        doc.record(SurfaceOp::Insert(role));
    }

    fn mark(&self, role: ContainerRole, marker: &str) {
        let mut doc = self.lock();
        match doc.find_mut(role) {
            Some(container) => {
                if !container.has_class(marker) {
                    container.classes.push(marker.to_string());
                }
            }
            None => {
                warn!("Cannot mark {}: no such container", role.id());
                return;
            }
        }
        doc.record(SurfaceOp::Mark(role, marker.to_string()));
    }

    fn unmark(&self, role: ContainerRole, marker: &str) {
        let mut doc = self.lock();
        if let Some(container) = doc.find_mut(role) {
            container.classes.retain(|c| c != marker);
        }
        doc.record(SurfaceOp::Unmark(role, marker.to_string()));
    }

    fn remove_container(&self, role: ContainerRole) -> bool {
        let mut doc = self.lock();
        let Some(pos) = doc.containers.iter().position(|c| c.id == role.id()) else {
            return false;
        };
        doc.containers.remove(pos);
        doc.record(SurfaceOp::Remove(role));
        true
    }

    fn reassign(&self, from: ContainerRole, to: ContainerRole) {
        let mut doc = self.lock();
        if let Some(container) = doc.find_mut(from) {
            container.id = to.id().to_string();
        }
        doc.record(SurfaceOp::Reassign(from, to));
    }
}
