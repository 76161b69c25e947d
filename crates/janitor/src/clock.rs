//! Clock port - time source for the sweeper
//!
//! Production uses `SystemClock`. Tests swap in a manual clock that
//! records requested sleeps instead of waiting.

use async_trait::async_trait;
use std::time::{Duration, SystemTime};

#[async_trait]
pub trait Clock: Send + Sync {
    /// Wall-clock time, comparable with file modification times.
    fn now(&self) -> SystemTime;

    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
