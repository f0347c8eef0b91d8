// WeaponStore - Weapon inventory tracking with key-value persistence

pub mod config;
pub mod error;
pub mod filter;
pub mod id;
pub mod inventory;
pub mod migrate;
pub mod models;
pub mod seed;
pub mod selection;
pub mod stats;
pub mod storage;

// Re-export main types for convenience
pub use error::{InventoryError, Result, StorageError};
pub use filter::{CompletionFilter, FilterCriteria, OwnershipFilter};
pub use inventory::{Inventory, InventoryView};
pub use models::{NewWeapon, Rarity, Weapon, WeaponType, now_ms};
pub use selection::{Selection, SelectionPhase};
pub use stats::Stats;
pub use storage::{FileStorage, MemoryStorage, STORAGE_KEY, SqliteStorage, Storage};
