//! The process-wide load-state holder.
//!
//! This is the only mutable global in the crate. Prefer creating a
//! [`LoadState`] at the application root and passing clones around; use
//! these helpers where that isn't practical.

use std::sync::OnceLock;

use super::load_state::LoadState;

/// Returns the process-wide holder, creating it with default options on
/// first use. It lives until the process exits.
pub fn global_load_state() -> &'static LoadState {
    static STATE: OnceLock<LoadState> = OnceLock::new();
    STATE.get_or_init(LoadState::new)
}

/// Reads the process-wide flag.
pub fn is_gif_loaded() -> bool {
    global_load_state().is_loaded()
}

/// Sets the process-wide flag and notifies its observers.
pub fn set_gif_loaded(value: bool) {
    global_load_state().set_loaded(value);
}
