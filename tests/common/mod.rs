//! Common test utilities for gif_load_state integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::error::Elapsed;

use gif_load_state::{types::LoadStatus, LoadState};

/// Runs a future with a timeout.
pub async fn with_timeout<T, F: std::future::Future<Output = T>>(
    duration: Duration,
    future: F,
) -> Result<T, Elapsed> {
    tokio::time::timeout(duration, future).await
}

/// Registers an observer that records every status it is given.
pub fn record_statuses(state: &LoadState) -> Arc<Mutex<Vec<LoadStatus>>> {
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let statuses_clone = statuses.clone();
    state.subscribe(move |status| statuses_clone.lock().unwrap().push(status));
    statuses
}

/// Waits for a short duration (useful for async operations to complete).
pub async fn short_delay() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

/// Default timeout duration for tests.
pub fn default_timeout() -> Duration {
    Duration::from_secs(5)
}
