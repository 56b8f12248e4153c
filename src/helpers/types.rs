use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::Receiver;

/// The two states the load flag can be in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Loaded,
}

impl LoadStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadStatus::Loaded)
    }
}

impl From<bool> for LoadStatus {
    fn from(value: bool) -> Self {
        match value {
            true => LoadStatus::Loaded,
            false => LoadStatus::NotLoaded,
        }
    }
}

impl From<LoadStatus> for bool {
    fn from(status: LoadStatus) -> Self {
        status.is_loaded()
    }
}

/// Handle returned by `LoadState::subscribe`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

pub type Observer = Arc<dyn Fn(LoadStatus) + Send + Sync>;

pub type LoadStatusReceiver = Receiver<LoadStatus>;
