// Filtering of the inventory view

use crate::models::{Rarity, Weapon, WeaponType};
use std::collections::HashSet;
use std::str::FromStr;

/// Completion ("gen-sen") filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionFilter {
    #[default]
    Any,
    Completed,
    Pending,
}

/// Ownership filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnershipFilter {
    #[default]
    Any,
    Owned,
    NotOwned,
}

impl CompletionFilter {
    pub fn accepts(self, optimized: bool) -> bool {
        match self {
            CompletionFilter::Any => true,
            CompletionFilter::Completed => optimized,
            CompletionFilter::Pending => !optimized,
        }
    }
}

impl OwnershipFilter {
    pub fn accepts(self, owned: bool) -> bool {
        match self {
            OwnershipFilter::Any => true,
            OwnershipFilter::Owned => owned,
            OwnershipFilter::NotOwned => !owned,
        }
    }
}

impl FromStr for CompletionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "all" => Ok(CompletionFilter::Any),
            "completed" | "done" | "〇" => Ok(CompletionFilter::Completed),
            "pending" | "✖" => Ok(CompletionFilter::Pending),
            other => Err(format!("Invalid status filter: {}", other)),
        }
    }
}

impl FromStr for OwnershipFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "all" => Ok(OwnershipFilter::Any),
            "owned" | "yes" => Ok(OwnershipFilter::Owned),
            "not-owned" | "no" => Ok(OwnershipFilter::NotOwned),
            other => Err(format!("Invalid possession filter: {}", other)),
        }
    }
}

/// Criteria narrowing the visible weapons
///
/// Empty sets place no restriction. All conditions must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the name
    pub search: String,
    pub rarities: HashSet<Rarity>,
    pub types: HashSet<WeaponType>,
    pub basic_effects: HashSet<String>,
    pub additional_effects: HashSet<String>,
    pub skills: HashSet<String>,
    pub completion: CompletionFilter,
    pub ownership: OwnershipFilter,
}

impl FilterCriteria {
    /// True if `weapon` passes every condition
    pub fn matches(&self, weapon: &Weapon) -> bool {
        (self.search.is_empty() || weapon.name.to_lowercase().contains(&self.search.to_lowercase()))
            && allows(&self.rarities, &weapon.rarity)
            && allows(&self.types, &weapon.weapon_type)
            && allows(&self.basic_effects, &weapon.basic_effect)
            && allows(&self.additional_effects, &weapon.additional_effect)
            && allows(&self.skills, &weapon.skill)
            && self.completion.accepts(weapon.optimized)
            && self.ownership.accepts(weapon.owned)
    }

    /// True if no condition restricts anything
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn allows<T: std::hash::Hash + Eq>(set: &HashSet<T>, value: &T) -> bool {
    set.is_empty() || set.contains(value)
}

/// Weapons passing `criteria`, in inventory order
pub fn apply<'a>(weapons: &'a [Weapon], criteria: &FilterCriteria) -> Vec<&'a Weapon> {
    weapons.iter().filter(|w| criteria.matches(w)).collect()
}
