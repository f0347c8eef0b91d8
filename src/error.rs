//! Error types for WeaponStore operations.
//!
//! Load-time problems (missing or malformed stored data) never reach the
//! caller; they are recovered by falling back to the seed dataset. The
//! errors below cover storage writes and rejected selection transitions.

use thiserror::Error;

/// Failure inside a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {key} ({reason})")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Injected by `MemoryStorage` to exercise failure paths.
    #[error("Simulated storage failure for key {key}")]
    Simulated { key: String },
}

/// Error returned by `Inventory` operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Write to storage failed after one retry; the in-memory state is kept.
    #[error("Failed to persist inventory under {key}: {source}")]
    Storage {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to serialize inventory: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No weapons selected for deletion")]
    EmptySelection,

    #[error("Selection mode is not active")]
    NotInSelectionMode,

    #[error("Deletion has not been requested")]
    DeletionNotRequested,
}

pub type Result<T> = std::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = InventoryError::Storage {
            key: "endfield_weapons".to_string(),
            source: StorageError::Simulated {
                key: "endfield_weapons".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("endfield_weapons"));
        assert!(msg.contains("Simulated storage failure"));
    }

    #[test]
    fn test_selection_error_display() {
        assert_eq!(InventoryError::EmptySelection.to_string(), "No weapons selected for deletion");
    }
}
