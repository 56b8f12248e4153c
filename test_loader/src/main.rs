use std::{error::Error, sync::Arc, time::Duration};

use gif_load_state::{
    error::{LoadStateError, Result},
    external::async_trait::async_trait,
    global::{global_load_state, is_gif_loaded, set_gif_loaded},
    loader::ExternalLoader,
    types::{LoadStatus, LoadStatusReceiver},
};
use tokio::time::sleep;

struct SimulatedGifLoader {
    delay: Duration,
}

#[async_trait]
impl ExternalLoader for SimulatedGifLoader {
    async fn load(&self) -> Result<()> {
        log::debug!("Fetching gif encoder ({:?})", self.delay);
        sleep(self.delay).await;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    let config_str = include_str!("log_config.yml");
    let config = serde_yaml::from_str(config_str)?;
    log4rs::init_raw_config(config)?;

    let state = global_load_state();
    state.subscribe(|status| log::debug!("Observer: {:?}", status));
    tokio::spawn(receive_status(state.get_status_receiver()));

    log::debug!("Loaded at startup: {}", is_gif_loaded());

    let handle = state.spawn_loader(Arc::new(SimulatedGifLoader {
        delay: Duration::from_millis(500),
    }));

    match state.wait_until_loaded_timeout(Duration::from_secs(5)).await {
        Ok(()) => log::debug!("Gif encoder ready: {}", is_gif_loaded()),
        Err(LoadStateError::Timeout(e)) => log::error!("Gif encoder not ready: {}", e),
        Err(e) => return Err(e.into()),
    }
    handle.await??;

    set_gif_loaded(false);
    log::debug!("After reset: {}", is_gif_loaded());

    sleep(Duration::from_millis(100)).await;
    Ok(())
}

pub async fn receive_status(mut receiver: LoadStatusReceiver) {
    while let Ok(status) = receiver.recv().await {
        log::debug!("Status: {:?}", status);
        if status == LoadStatus::Loaded {
            log::debug!("Loaded");
        }
    }
}
