pub mod builder;
pub mod common;
pub mod error;
pub mod global;
pub mod load_state;
pub mod loader;
pub mod traits;
pub mod types;
