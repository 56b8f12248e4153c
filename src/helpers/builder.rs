//! Builder pattern for gif_load_state configuration.

use super::load_state::LoadStateOptions;

/// Builder for constructing [`LoadStateOptions`] with a fluent API.
///
/// # Example
///
/// ```
/// use gif_load_state::{builder::LoadStateOptionsBuilder, LoadState};
///
/// let options = LoadStateOptionsBuilder::new()
///     .name("gif")
///     .channel_capacity(8)
///     .build();
/// let state = LoadState::with_options(options).unwrap();
/// assert_eq!(state.name(), "gif");
/// ```
#[derive(Default)]
pub struct LoadStateOptionsBuilder {
    options: LoadStateOptions,
}

impl LoadStateOptionsBuilder {
    /// Creates a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: LoadStateOptions::default(),
        }
    }

    /// Sets the name used in log lines and error messages.
    pub fn name(mut self, name: &str) -> Self {
        self.options.name = name.to_owned();
        self
    }

    /// Sets how many status messages an async receiver may fall behind
    /// before it starts skipping the oldest ones.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.options.channel_capacity = capacity;
        self
    }

    /// Builds and returns the configured [`LoadStateOptions`].
    pub fn build(self) -> LoadStateOptions {
        self.options
    }
}
