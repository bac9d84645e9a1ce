//! The seams between this crate and its external collaborators

use std::error::Error;

use async_trait::async_trait;

/// The household key-value persistence mechanism.
///
/// The platform (e.g. a mobile OS) usually provides one; [`crate::store`] contains implementations for tests and desktop use.
/// Values are already-serialized strings: this trait knows nothing about what they contain.
#[async_trait]
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` in case nothing was ever stored there.
    /// `None` is a regular answer, not an error
    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;
    /// Stores `value` under `key`, overwriting any previous value
    async fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// A remote text-generation endpoint.
///
/// The real implementation is [`crate::client::GeminiClient`]. Tests mock this trait instead of a live server.
#[async_trait]
pub trait SuggestionSource {
    /// Sends `prompt` to the provider and returns the generated text.
    ///
    /// Returns `Ok(None)` when the provider answered successfully but its response contains no text field
    /// (the provider's output shape is not contractually guaranteed). \
    /// Returns `Err` on transport failures, non-2xx statuses, or undecodable bodies.
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;
}
