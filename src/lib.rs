//! # gif_load_state
//!
//! `gif_load_state` holds one observable flag: whether an external GIF
//! encoding library has finished loading.
//!
//! - Starts as not loaded; every process start begins from `false`
//! - Synchronous observers notified once per write, on the writing thread
//! - Async status channel and `wait_until_loaded` built on tokio
//! - A loader contract that reports success exactly once
//!
//! ## Basic Usage
//!
//! ```rust
//! use gif_load_state::LoadState;
//!
//! let state = LoadState::new();
//! assert!(!state.is_loaded());
//!
//! let id = state.subscribe(|status| println!("gif library: {:?}", status));
//!
//! state.set_loaded(true);
//! assert!(state.is_loaded());
//!
//! state.unsubscribe(id);
//! ```
//!
//! ### Waiting for the loader
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use gif_load_state::{
//!     error::Result,
//!     external::async_trait::async_trait,
//!     loader::ExternalLoader,
//!     LoadState,
//! };
//!
//! struct ScriptLoader;
//!
//! #[async_trait]
//! impl ExternalLoader for ScriptLoader {
//!     async fn load(&self) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let state = LoadState::new();
//!     let handle = state.spawn_loader(Arc::new(ScriptLoader));
//!     state.wait_until_loaded().await?;
//!     handle.await.expect("loader task panicked")?;
//!     assert!(state.is_loaded());
//!     Ok(())
//! }
//! ```

/// Module that re-exports various external dependencies.
pub mod external {
    pub use async_trait;
    pub use tokio;
}

/// Module containing the load-state holder and its options.
pub mod state {
    pub use crate::helpers::load_state::*;
}

/// Module providing a fluent builder for holder options.
pub mod builder {
    pub use crate::helpers::builder::*;
}

/// Module defining the contract for the external library loader.
pub mod loader {
    pub use crate::helpers::loader::*;
}

/// Module providing the single process-wide holder.
pub mod global {
    pub use crate::helpers::global::*;
}

/// Module containing common type definitions used throughout the library.
pub mod types {
    pub use crate::helpers::types::*;
}

/// Module containing the library's error type.
pub mod error {
    pub use crate::helpers::error::*;
}

pub use helpers::load_state::{LoadState, LoadStateOptions};

mod helpers;
