/// Public library interface for the habit ledger
///
/// The core is the habit store (durable collection with migrate-on-read)
/// and the lifecycle engine (completion days, target progress, status
/// transitions). The MCP server exposes both to clients as tools.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod tools;
mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{
    migrate_record, normalize, parse_collection, DroppedRecord, HabitStore, KeyValueStore,
    LoadedCollection, MemorySlots, Mutation, SchemaVersion, SqliteSlots, StorageError,
    StoreConfig, UnavailableSlots, DEFAULT_SLOT_KEY,
};
pub use tools::ToolError;
pub use mcp::{protocol::JsonRpcResponse, McpServer};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit tracker server that serves the habit store over MCP
pub struct HabitTrackerServer<S: KeyValueStore = SqliteSlots> {
    store: HabitStore<S>,
}

impl HabitTrackerServer<SqliteSlots> {
    /// Create a server whose habits live in the SQLite file at `db_path`
    ///
    /// The slots table is created if the file is new.
    pub async fn new(db_path: PathBuf, config: StoreConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing habit ledger with database: {:?}", db_path);

        let slots = SqliteSlots::new(db_path)?;
        Ok(Self::with_store(HabitStore::new(slots, config)))
    }
}

impl<S: KeyValueStore> HabitTrackerServer<S> {
    pub fn with_store(store: HabitStore<S>) -> Self {
        Self { store }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// Stored records are upgraded to the current schema first. This method
    /// returns when stdin closes.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        match self.store.migrate_in_place() {
            Ok(0) => {}
            Ok(upgraded) => tracing::info!("Upgraded {} legacy habit(s)", upgraded),
            Err(e) => tracing::warn!("Skipping stored habit migration: {}", e),
        }

        let habits = self.store.load_all();
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the habit store (useful for testing)
    pub fn store(&self) -> &HabitStore<S> {
        &self.store
    }
}
