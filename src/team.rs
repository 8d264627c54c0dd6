//! Team selection engine.
//!
//! A small state machine mapping asset ids to a chosen direction, with a
//! hard capacity limit enforced atomically at the point of toggle — never
//! by post-hoc correction. Selections live only for the current session.

use tracing::debug;

use crate::types::{Direction, SelectionEntry, SpotAsset};

/// Default maximum number of distinct assets in a team.
pub const DEFAULT_CAPACITY: usize = 5;

/// Rejection of a selection attempt once the team is at capacity.
///
/// This is a usage rejection, not a failure: state is unchanged and the
/// caller recovers by deselecting something first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("team is full: {capacity} assets already selected")]
pub struct TeamFull {
    pub capacity: usize,
}

/// What a successful toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleEffect {
    /// A new asset entered the team.
    Selected,
    /// An already-selected asset changed direction.
    Switched,
    /// The same (asset, direction) pair was toggled off.
    Deselected,
}

/// Owner of the selection mapping and the derived team view.
///
/// Entries are kept in a `Vec`, so iteration order is insertion order —
/// deterministic, and a direction switch keeps an entry's position.
#[derive(Debug)]
pub struct TeamSelector {
    capacity: usize,
    entries: Vec<SelectionEntry>,
}

impl TeamSelector {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Toggle an asset's direction.
    ///
    /// Toggling the current (asset, direction) pair deselects it. Toggling
    /// the opposite direction switches an existing entry and never counts
    /// against capacity — only a genuinely new asset beyond the limit is
    /// rejected, and then nothing changes.
    pub fn toggle(
        &mut self,
        asset_id: &str,
        direction: Direction,
    ) -> Result<ToggleEffect, TeamFull> {
        if let Some(pos) = self.entries.iter().position(|e| e.asset_id == asset_id) {
            if self.entries[pos].direction == direction {
                self.entries.remove(pos);
                debug!(asset_id, "Deselected");
                Ok(ToggleEffect::Deselected)
            } else {
                self.entries[pos].direction = direction;
                debug!(asset_id, %direction, "Switched direction");
                Ok(ToggleEffect::Switched)
            }
        } else if self.entries.len() >= self.capacity {
            debug!(asset_id, capacity = self.capacity, "Selection rejected: team full");
            Err(TeamFull {
                capacity: self.capacity,
            })
        } else {
            self.entries.push(SelectionEntry {
                asset_id: asset_id.to_string(),
                direction,
            });
            debug!(asset_id, %direction, "Selected");
            Ok(ToggleEffect::Selected)
        }
    }

    /// The derived team: all current selections in insertion order.
    /// Purely a projection, no side effect.
    pub fn team(&self) -> &[SelectionEntry] {
        &self.entries
    }

    /// The direction currently chosen for an asset, if any.
    pub fn direction_of(&self, asset_id: &str) -> Option<Direction> {
        self.entries
            .iter()
            .find(|e| e.asset_id == asset_id)
            .map(|e| e.direction)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Join the team with the crypto fetcher's canonical list for display.
    /// Entries whose asset is absent from the list are skipped.
    pub fn roster<'a>(&self, assets: &'a [SpotAsset]) -> Vec<(&'a SpotAsset, Direction)> {
        self.entries
            .iter()
            .filter_map(|entry| {
                assets
                    .iter()
                    .find(|a| a.id == entry.asset_id)
                    .map(|a| (a, entry.direction))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str) -> SpotAsset {
        SpotAsset {
            id: id.into(),
            display_name: id.to_uppercase(),
            symbol_upper: id.to_uppercase(),
            price_usd: 1.0,
            change_pct_24h: 0.0,
        }
    }

    #[test]
    fn test_toggle_selects_up_to_capacity() {
        let mut selector = TeamSelector::with_default_capacity();
        for id in ["a", "b", "c", "d", "e"] {
            assert_eq!(selector.toggle(id, Direction::Up), Ok(ToggleEffect::Selected));
        }
        assert_eq!(selector.len(), 5);
        assert!(selector.is_full());
    }

    #[test]
    fn test_sixth_asset_rejected_team_unchanged() {
        let mut selector = TeamSelector::with_default_capacity();
        for id in ["a", "b", "c", "d", "e"] {
            selector.toggle(id, Direction::Up).unwrap();
        }

        let result = selector.toggle("f", Direction::Down);
        assert_eq!(result, Err(TeamFull { capacity: 5 }));

        let ids: Vec<&str> = selector.team().iter().map(|e| e.asset_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_toggle_same_pair_deselects() {
        let mut selector = TeamSelector::with_default_capacity();
        selector.toggle("btc", Direction::Up).unwrap();
        assert_eq!(selector.len(), 1);

        assert_eq!(
            selector.toggle("btc", Direction::Up),
            Ok(ToggleEffect::Deselected)
        );
        assert!(selector.is_empty());

        // Third toggle re-adds it.
        assert_eq!(
            selector.toggle("btc", Direction::Up),
            Ok(ToggleEffect::Selected)
        );
        assert_eq!(selector.direction_of("btc"), Some(Direction::Up));
    }

    #[test]
    fn test_direction_switch_never_hits_capacity() {
        let mut selector = TeamSelector::with_default_capacity();
        for id in ["a", "b", "c", "d", "e"] {
            selector.toggle(id, Direction::Up).unwrap();
        }
        assert!(selector.is_full());

        // Capacity counts distinct assets, not direction slots.
        assert_eq!(
            selector.toggle("c", Direction::Down),
            Ok(ToggleEffect::Switched)
        );
        assert_eq!(selector.len(), 5);
        assert_eq!(selector.direction_of("c"), Some(Direction::Down));
    }

    #[test]
    fn test_switch_preserves_insertion_position() {
        let mut selector = TeamSelector::with_default_capacity();
        selector.toggle("a", Direction::Up).unwrap();
        selector.toggle("b", Direction::Up).unwrap();
        selector.toggle("a", Direction::Down).unwrap();

        let ids: Vec<&str> = selector.team().iter().map(|e| e.asset_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(selector.team()[0].direction, Direction::Down);
    }

    #[test]
    fn test_deselect_then_reselect_moves_to_end() {
        let mut selector = TeamSelector::with_default_capacity();
        selector.toggle("a", Direction::Up).unwrap();
        selector.toggle("b", Direction::Up).unwrap();
        selector.toggle("a", Direction::Up).unwrap(); // off
        selector.toggle("a", Direction::Up).unwrap(); // back on

        let ids: Vec<&str> = selector.team().iter().map(|e| e.asset_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_rejection_is_recoverable() {
        let mut selector = TeamSelector::new(2);
        selector.toggle("a", Direction::Up).unwrap();
        selector.toggle("b", Direction::Down).unwrap();
        assert!(selector.toggle("c", Direction::Up).is_err());

        // Deselect one, then the previously rejected asset fits.
        selector.toggle("a", Direction::Up).unwrap();
        assert_eq!(selector.toggle("c", Direction::Up), Ok(ToggleEffect::Selected));
    }

    #[test]
    fn test_team_full_display() {
        let e = TeamFull { capacity: 5 };
        assert_eq!(format!("{e}"), "team is full: 5 assets already selected");
    }

    #[test]
    fn test_roster_joins_and_skips_unknown() {
        let mut selector = TeamSelector::with_default_capacity();
        selector.toggle("btc", Direction::Up).unwrap();
        selector.toggle("gone", Direction::Down).unwrap();
        selector.toggle("eth", Direction::Down).unwrap();

        let assets = vec![asset("btc"), asset("eth"), asset("sol")];
        let roster = selector.roster(&assets);

        // "gone" is not in the canonical list anymore: skipped, order kept.
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].0.id, "btc");
        assert_eq!(roster[0].1, Direction::Up);
        assert_eq!(roster[1].0.id, "eth");
        assert_eq!(roster[1].1, Direction::Down);
    }

    #[test]
    fn test_empty_team_projection() {
        let selector = TeamSelector::with_default_capacity();
        assert!(selector.team().is_empty());
        assert!(selector.roster(&[asset("btc")]).is_empty());
        assert_eq!(selector.direction_of("btc"), None);
    }
}
