//! # Core Navigation Logic
//!
//! The router and its transition engine. It knows nothing about any specific
//! UI technology: the document, the history stack, page retrieval and time
//! are all reached through traits.
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │            CORE             │
//!                    │        (this module)        │
//!                    │                             │
//!                    │  • Navigator (entry point)  │
//!                    │  • TransitionEngine (FSM)   │
//!                    │  • NavigationState          │
//!                    └──────────────┬──────────────┘
//!                                   │
//!        ┌──────────────┬───────────┼───────────┬──────────────┐
//!        ▼              ▼           ▼           ▼              ▼
//!  ContentSurface    History    PageSource    Clock      ResolvedConfig
//!  (MemorySurface) (MemoryHistory) (HTTP)   (tokio time)  (file/env/CLI)
//! ```
//!
//! ## Modules
//!
//! - [`navigator`]: link activation, history pops, startup
//! - [`transition`]: the single-flight transition state machine
//! - [`state`]: `NavigationState` and route descriptors
//! - [`route`]: path normalization
//! - [`surface`], [`history`], [`clock`]: host boundaries and in-memory hosts
//! - [`config`]: layered configuration

pub mod clock;
pub mod config;
pub mod history;
pub mod navigator;
pub mod route;
pub mod state;
pub mod surface;
pub mod transition;
