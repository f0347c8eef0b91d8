// Batch selection state for bulk deletion

use crate::error::{InventoryError, Result};
use std::collections::HashSet;

/// Where the selection flow currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPhase {
    #[default]
    Inactive,
    Selecting,
    /// Deletion requested, waiting for confirmation
    Confirming,
}

/// Selection mode flag plus the identifiers staged for deletion
#[derive(Debug, Clone, Default)]
pub struct Selection {
    phase: SelectionPhase,
    selected: HashSet<String>,
}

impl Selection {
    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != SelectionPhase::Inactive
    }

    pub fn is_confirming(&self) -> bool {
        self.phase == SelectionPhase::Confirming
    }

    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn enter(&mut self) {
        self.reset(SelectionPhase::Selecting);
    }

    pub fn exit(&mut self) {
        self.reset(SelectionPhase::Inactive);
    }

    pub fn toggle_mode(&mut self) {
        if self.is_active() { self.exit() } else { self.enter() }
    }

    /// Flip membership of `id`; returns whether it is now selected
    ///
    /// Ignored outside selection mode and while a deletion awaits confirmation.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.phase != SelectionPhase::Selecting {
            return self.selected.contains(id);
        }
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Move to confirmation; an empty selection is rejected without any transition
    pub fn request_delete(&mut self) -> Result<()> {
        if !self.is_active() {
            return Err(InventoryError::NotInSelectionMode);
        }
        if self.selected.is_empty() {
            return Err(InventoryError::EmptySelection);
        }
        self.phase = SelectionPhase::Confirming;
        Ok(())
    }

    /// Back out of confirmation, keeping the selection
    pub fn cancel_delete(&mut self) {
        if self.is_confirming() {
            self.phase = SelectionPhase::Selecting;
        }
    }

    /// Consume the confirmed selection and leave selection mode
    pub fn take_confirmed(&mut self) -> Result<HashSet<String>> {
        if !self.is_confirming() {
            return Err(InventoryError::DeletionNotRequested);
        }
        let selected = std::mem::take(&mut self.selected);
        self.phase = SelectionPhase::Inactive;
        Ok(selected)
    }

    fn reset(&mut self, phase: SelectionPhase) {
        self.phase = phase;
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_transitions_clear_selection() {
        let mut selection = Selection::default();
        selection.enter();
        selection.toggle("a");
        selection.request_delete().unwrap();

        selection.toggle_mode();
        assert_eq!(selection.phase(), SelectionPhase::Inactive);
        assert!(selection.selected().is_empty());

        selection.toggle_mode();
        assert_eq!(selection.phase(), SelectionPhase::Selecting);
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_toggle_membership() {
        let mut selection = Selection::default();
        assert!(!selection.toggle("a"));
        assert!(selection.selected().is_empty());

        selection.enter();
        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(!selection.toggle("a"));
        assert!(!selection.is_selected("a"));
    }

    #[test]
    fn test_request_delete_rejections() {
        let mut selection = Selection::default();
        assert!(matches!(selection.request_delete(), Err(InventoryError::NotInSelectionMode)));

        selection.enter();
        assert!(matches!(selection.request_delete(), Err(InventoryError::EmptySelection)));
        assert_eq!(selection.phase(), SelectionPhase::Selecting);
    }

    #[test]
    fn test_cancel_keeps_selection() {
        let mut selection = Selection::default();
        selection.enter();
        selection.toggle("a");
        selection.request_delete().unwrap();
        selection.cancel_delete();

        assert_eq!(selection.phase(), SelectionPhase::Selecting);
        assert!(selection.is_selected("a"));
        assert!(matches!(selection.take_confirmed(), Err(InventoryError::DeletionNotRequested)));
    }

    #[test]
    fn test_toggle_ignored_while_confirming() {
        let mut selection = Selection::default();
        selection.enter();
        selection.toggle("a");
        selection.request_delete().unwrap();

        assert!(selection.toggle("a"));
        assert!(!selection.toggle("b"));
        assert_eq!(selection.selected().len(), 1);
    }

    #[test]
    fn test_take_confirmed() {
        let mut selection = Selection::default();
        selection.enter();
        selection.toggle("a");
        selection.toggle("b");
        selection.request_delete().unwrap();

        let taken = selection.take_confirmed().unwrap();
        assert_eq!(taken.len(), 2);
        assert!(!selection.is_active());
        assert!(selection.selected().is_empty());
    }
}
