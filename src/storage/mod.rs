/// Storage layer for persisting habit data
///
/// Habits live as one JSON array in a named slot of a key-value medium.
/// The [`HabitStore`] owns that slot: it migrates records on read, writes
/// whole snapshots back, and degrades quietly when the medium is missing.

pub mod habit_store;
pub mod memory;
pub mod migrations;
pub mod records;
pub mod sqlite;

// Re-export the main storage types
pub use habit_store::*;
pub use memory::*;
pub use records::*;
pub use sqlite::*;

use thiserror::Error;

/// Slot name used when none is configured
pub const DEFAULT_SLOT_KEY: &str = "habits";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No durable storage is available in this context")]
    Unavailable,

    #[error("Invalid stored habit at position {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// A durable key-value medium holding string payloads
///
/// This is the only thing the habit store needs from its environment, so
/// SQLite, an in-memory map, or "nothing at all" can sit behind it.
pub trait KeyValueStore {
    /// Whether the medium can be used in the current context
    fn is_available(&self) -> bool {
        true
    }

    /// Read the payload stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the payload stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Configuration injected into a [`HabitStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name of the slot holding the habit collection
    pub slot_key: String,
}

impl StoreConfig {
    pub fn with_slot(slot_key: impl Into<String>) -> Self {
        Self {
            slot_key: slot_key.into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::with_slot(DEFAULT_SLOT_KEY)
    }
}
