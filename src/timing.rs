// timing.rs - Timeout ceilings for setup steps and queries

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

pub fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

/// Run `fut`, failing with [`Error::Timeout`] once `limit` has elapsed.
/// The future is dropped on timeout; nothing is retried.
pub async fn with_timeout<T, F>(operation: &'static str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(operation, ?limit, "operation exceeded its time ceiling");
            Err(Error::Timeout { operation, limit })
        }
    }
}
