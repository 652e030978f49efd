//! Time abstraction for the transition wait.
//!
//! The engine never sleeps directly; it asks a `Clock`. Production code uses
//! `TokioClock`, tests either pause tokio's clock or swap in a fake that
//! records the requested waits.

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Real-time clock backed by `tokio::time`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
