//! Contract for the component that loads the external GIF encoding library.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::{log_debug, log_error};

use super::{error::Result, load_state::LoadState};

/// Something that loads the external library, e.g. by injecting a script
/// or opening a shared object. Retrying is the implementor's concern.
#[async_trait]
pub trait ExternalLoader: Send + Sync {
    async fn load(&self) -> Result<()>;
}

/// Runs `loader` once and marks `state` as loaded on success.
///
/// On failure the flag is left untouched and the loader's error is
/// returned.
pub async fn report_load<L>(loader: &L, state: &LoadState) -> Result<()>
where
    L: ExternalLoader + ?Sized,
{
    log_debug!("[{}] loading external library", state.name());
    match loader.load().await {
        Ok(()) => {
            state.set_loaded(true);
            Ok(())
        }
        Err(error) => {
            log_error!("[{}] external library failed to load: {}", state.name(), error);
            Err(error)
        }
    }
}

impl LoadState {
    /// Runs [`report_load`] on the tokio runtime.
    pub fn spawn_loader(&self, loader: Arc<dyn ExternalLoader>) -> JoinHandle<Result<()>> {
        let state = self.clone();
        tokio::spawn(async move { report_load(loader.as_ref(), &state).await })
    }
}
