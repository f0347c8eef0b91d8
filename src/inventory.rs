// Weapon inventory: in-memory list mirrored to key-value storage

use crate::error::{InventoryError, Result};
use crate::filter::{self, FilterCriteria};
use crate::id::generate_id;
use crate::migrate::{decode_inventory, encode_inventory};
use crate::models::{NewWeapon, Weapon, now_ms};
use crate::seed::seed_weapons;
use crate::selection::Selection;
use crate::stats::Stats;
use crate::storage::{STORAGE_KEY, Storage};
use tracing::{debug, info, warn};

/// What a front end needs to draw the inventory
#[derive(Debug)]
pub struct InventoryView<'a> {
    /// Visible weapons, newest first
    pub weapons: Vec<&'a Weapon>,
    pub stats: Stats,
    pub selection: &'a Selection,
    /// Size of the whole inventory, ignoring filters
    pub total_registered: usize,
}

/// The weapon inventory
///
/// Owns the full list (newest first) and the storage it is mirrored to.
/// Every mutation rewrites the whole list under one key.
pub struct Inventory<S: Storage> {
    storage: S,
    key: String,
    weapons: Vec<Weapon>,
    selection: Selection,
    dirty: bool,
}

impl<S: Storage> Inventory<S> {
    /// Load the inventory stored under the default key
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, STORAGE_KEY)
    }

    /// Load the inventory stored under `key`
    ///
    /// Missing, malformed or empty stored data is replaced by the seed dataset.
    /// The loaded (possibly migrated or seeded) list is written back immediately.
    /// If some stored elements were unreadable, the raw value is first copied to
    /// `<key>_unreadable`; when that copy fails the stored value is left untouched.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();

        let (decoded, raw) = match storage.get(&key) {
            Ok(Some(raw)) => (decode_inventory(&raw), Some(raw)),
            Ok(None) => (None, None),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read stored inventory");
                (None, None)
            }
        };

        let unreadable = match (&decoded, raw) {
            (Some(decoded), Some(raw)) if !decoded.is_complete() => Some((decoded.skipped, raw)),
            _ => None,
        };

        let weapons = match decoded.filter(|d| !d.weapons.is_empty()) {
            Some(decoded) => {
                info!(key = %key, count = decoded.weapons.len(), "Loaded inventory");
                decoded.weapons
            }
            None => {
                let created_at = now_ms();
                let weapons: Vec<Weapon> = seed_weapons()
                    .into_iter()
                    .map(|w| w.into_weapon(generate_id(), created_at))
                    .collect();
                info!(key = %key, count = weapons.len(), "No usable stored inventory, using seed data");
                weapons
            }
        };

        let mut inventory = Self {
            storage,
            key,
            weapons,
            selection: Selection::default(),
            dirty: true,
        };

        if let Some((skipped, raw)) = unreadable {
            let backup_key = format!("{}_unreadable", inventory.key);
            match inventory.storage.set(&backup_key, &raw) {
                Ok(()) => warn!(skipped, backup_key = %backup_key, "Unreadable stored weapons kept under backup key"),
                Err(e) => {
                    warn!(skipped, backup_key = %backup_key, error = %e, "Could not back up unreadable weapons, not writing inventory");
                    inventory.dirty = false;
                    return inventory;
                }
            }
        }

        // Failure is recorded in `dirty`; the next mutation or flush retries
        if let Err(e) = inventory.save() {
            warn!(error = %e, "Could not write inventory after load");
        }

        inventory
    }

    /// Start from an explicit list, replacing whatever is stored under the default key
    pub fn with_weapons(storage: S, weapons: Vec<Weapon>) -> Result<Self> {
        let mut inventory = Self {
            storage,
            key: STORAGE_KEY.to_string(),
            weapons,
            selection: Selection::default(),
            dirty: true,
        };
        inventory.save()?;
        Ok(inventory)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// True if the last write failed and memory is ahead of storage
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All weapons, newest first
    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn get(&self, id: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id == id)
    }

    pub fn total_registered(&self) -> usize {
        self.weapons.len()
    }

    /// Weapons passing `criteria`, newest first
    pub fn visible(&self, criteria: &FilterCriteria) -> Vec<&Weapon> {
        filter::apply(&self.weapons, criteria)
    }

    /// Statistics over the weapons passing `criteria`
    pub fn stats(&self, criteria: &FilterCriteria) -> Stats {
        Stats::compute(self.visible(criteria))
    }

    pub fn view(&self, criteria: &FilterCriteria) -> InventoryView<'_> {
        let weapons = self.visible(criteria);
        let stats = Stats::compute(weapons.iter().copied());
        InventoryView {
            weapons,
            stats,
            selection: &self.selection,
            total_registered: self.weapons.len(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Register a weapon at the front of the inventory
    ///
    /// The caller is responsible for rejecting empty names.
    pub fn add(&mut self, new: NewWeapon) -> Result<&Weapon> {
        let weapon = new.into_weapon(generate_id(), now_ms());
        debug!(id = %weapon.id, name = %weapon.name, "add: registering weapon");
        self.weapons.insert(0, weapon);
        self.save()?;
        Ok(&self.weapons[0])
    }

    /// Flip the owned flag; returns false if nothing changed
    ///
    /// Unknown ids and calls made in selection mode are ignored.
    pub fn toggle_owned(&mut self, id: &str) -> Result<bool> {
        self.toggle_flag(id, |w| &mut w.owned)
    }

    /// Flip the optimized flag; returns false if nothing changed
    pub fn toggle_optimized(&mut self, id: &str) -> Result<bool> {
        self.toggle_flag(id, |w| &mut w.optimized)
    }

    fn toggle_flag(&mut self, id: &str, flag: fn(&mut Weapon) -> &mut bool) -> Result<bool> {
        if self.selection.is_active() {
            debug!(id, "toggle_flag: ignored in selection mode");
            return Ok(false);
        }

        let Some(weapon) = self.weapons.iter_mut().find(|w| w.id == id) else {
            debug!(id, "toggle_flag: no such weapon");
            return Ok(false);
        };

        let value = flag(weapon);
        *value = !*value;
        self.save()?;
        Ok(true)
    }

    // ========================================================================
    // Batch selection
    // ========================================================================

    pub fn enter_selection_mode(&mut self) {
        self.selection.enter();
    }

    pub fn exit_selection_mode(&mut self) {
        self.selection.exit();
    }

    pub fn toggle_selection_mode(&mut self) {
        self.selection.toggle_mode();
    }

    /// Flip selection of `id`; returns whether it is now selected
    pub fn toggle_selected(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Ask to delete the selection; rejected when nothing is selected
    pub fn request_delete(&mut self) -> Result<()> {
        self.selection.request_delete()
    }

    pub fn cancel_delete(&mut self) {
        self.selection.cancel_delete();
    }

    /// Delete every selected weapon and leave selection mode
    ///
    /// Returns the number of weapons removed. There is no undo.
    pub fn confirm_delete(&mut self) -> Result<usize> {
        let selected = self.selection.take_confirmed()?;

        let before = self.weapons.len();
        self.weapons.retain(|w| !selected.contains(&w.id));
        let removed = before - self.weapons.len();

        info!(selected = selected.len(), removed, "confirm_delete: bulk delete");
        self.save()?;
        Ok(removed)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Retry a failed write
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.save()
    }

    /// Write the full list, retrying once before giving up
    fn save(&mut self) -> Result<()> {
        let json = encode_inventory(&self.weapons)?;

        let result = self.storage.set(&self.key, &json).or_else(|first| {
            warn!(key = %self.key, error = %first, "Inventory write failed, retrying once");
            self.storage.set(&self.key, &json)
        });

        match result {
            Ok(()) => {
                self.dirty = false;
                debug!(key = %self.key, count = self.weapons.len(), "save: inventory written");
                Ok(())
            }
            Err(source) => {
                self.dirty = true;
                warn!(key = %self.key, error = %source, "Inventory write failed, changes kept in memory");
                Err(InventoryError::Storage {
                    key: self.key.clone(),
                    source,
                })
            }
        }
    }
}
