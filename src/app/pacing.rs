use std::time::Duration;

use async_trait::async_trait;

/// Why the runner is suspending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    RateLimitBackoff,
    BatchBoundary,
}

/// Suspension point used by the runner between attempts and batches.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, reason: PauseReason, duration: Duration);
}

/// Suspends on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, _reason: PauseReason, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
