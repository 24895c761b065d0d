//! Pacing between EFetch batches
//!
//! NCBI E-utilities allow 3 requests per second without an API key. The
//! pipeline stays under that limit by waiting a fixed delay between
//! consecutive detail-fetch batches. The wait is behind the [`Pause`] trait
//! so tests can swap the real sleep for [`NoPause`] or a recorder.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

/// Delay between consecutive EFetch batches (one third of a second plus margin)
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(340);

/// A wait inserted between batches
pub trait Pause {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        debug!(
            wait_duration_ms = duration.as_millis(),
            "Sleeping to respect rate limit"
        );
        sleep(duration).await;
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

impl Pause for NoPause {
    async fn pause(&self, _duration: Duration) {}
}
