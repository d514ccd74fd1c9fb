use std::time::Duration;

/// Deferred execution: `after(delay)` resolves once `delay` has elapsed.
#[async_trait::async_trait]
pub trait Scheduler: Send + Sync {
    async fn after(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait::async_trait]
impl Scheduler for TokioScheduler {
    async fn after(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
