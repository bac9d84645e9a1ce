//! Errors surfaced by the task store

use thiserror::Error;

/// What can go wrong when loading or persisting the task mapping.
///
/// None of these is ever fatal to the process: callers either fall back to an empty
/// mapping (`Deserialization`) or keep running with in-memory state ahead of durable state (`Persistence`).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored task data exists but cannot be parsed back.
    /// The usual policy is to log this and proceed with an empty mapping
    #[error("Unable to deserialize stored tasks: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Writing to the storage failed. When this is returned, the in-memory mapping
    /// has already been updated: memory and durable state diverge until the next successful save
    #[error("Unable to persist tasks: {0}")]
    Persistence(String),
}
