// Aggregate statistics over the visible weapons

use crate::models::Weapon;

/// Counts and rates over a set of weapons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    /// Weapons with optimization finished
    pub completed_count: usize,
    pub owned_count: usize,
    /// Percentage of owned weapons that are optimized
    pub optimization_rate: u32,
    /// Percentage of weapons that are owned
    pub ownership_rate: u32,
}

impl Stats {
    pub fn compute<'a, I>(weapons: I) -> Self
    where
        I: IntoIterator<Item = &'a Weapon>,
    {
        let mut stats = Stats::default();
        for weapon in weapons {
            stats.total += 1;
            stats.completed_count += weapon.optimized as usize;
            stats.owned_count += weapon.owned as usize;
        }
        stats.optimization_rate = percent(stats.completed_count, stats.owned_count);
        stats.ownership_rate = percent(stats.owned_count, stats.total);
        stats
    }
}

/// `part / whole` as a percentage rounded half up; 0 when `whole` is 0
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (whole * 2)) as u32
}
