use std::collections::BTreeSet;
use tourney_api::{Player, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoSelection,
    Partial,
    All,
}

/// Tri-state of the "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllIndicator {
    Unchecked,
    Indeterminate,
    Checked,
}

impl SelectAllIndicator {
    pub fn glyph(&self) -> &'static str {
        match self {
            SelectAllIndicator::Unchecked => "[ ]",
            SelectAllIndicator::Indeterminate => "[-]",
            SelectAllIndicator::Checked => "[x]",
        }
    }
}

/// Player ids ticked in the players table, kept apart from the player cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSelection {
    ids: BTreeSet<PlayerId>,
}

impl PlayerSelection {
    pub fn toggle(&mut self, id: PlayerId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<PlayerId> {
        self.ids.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn select_all(&mut self, players: &[Player]) {
        self.ids.extend(players.iter().map(|p| p.id));
    }

    /// Checkbox click on "select all": checked -> clear, otherwise select
    /// every loaded player.
    pub fn toggle_all(&mut self, players: &[Player]) {
        if self.state(players.len()) == SelectionState::All {
            self.clear();
        } else {
            self.select_all(players);
        }
    }

    /// Drop ids that are no longer in the loaded list.
    pub fn retain_loaded(&mut self, players: &[Player]) {
        let loaded: BTreeSet<PlayerId> = players.iter().map(|p| p.id).collect();
        self.ids.retain(|id| loaded.contains(id));
    }

    pub fn state(&self, loaded: usize) -> SelectionState {
        match self.ids.len() {
            0 => SelectionState::NoSelection,
            n if n == loaded => SelectionState::All,
            _ => SelectionState::Partial,
        }
    }

    pub fn indicator(&self, loaded: usize) -> SelectAllIndicator {
        match self.state(loaded) {
            SelectionState::NoSelection => SelectAllIndicator::Unchecked,
            SelectionState::Partial => SelectAllIndicator::Indeterminate,
            SelectionState::All => SelectAllIndicator::Checked,
        }
    }

    pub fn bulk_delete_visible(&self) -> bool {
        !self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(ids: &[PlayerId]) -> Vec<Player> {
        ids.iter()
            .map(|&id| Player { id, name: format!("P{id}"), ..Default::default() })
            .collect()
    }

    #[test]
    fn select_then_deselect_restores_empty() {
        let mut sel = PlayerSelection::default();
        sel.toggle(7);
        assert!(sel.contains(7));
        sel.toggle(7);
        assert_eq!(sel, PlayerSelection::default());
        assert!(!sel.bulk_delete_visible());
    }

    #[test]
    fn indicator_follows_selection_size() {
        let list = players(&[1, 2, 3]);
        let mut sel = PlayerSelection::default();
        assert_eq!(sel.indicator(list.len()), SelectAllIndicator::Unchecked);

        sel.toggle(2);
        assert_eq!(sel.state(list.len()), SelectionState::Partial);
        assert_eq!(sel.indicator(list.len()), SelectAllIndicator::Indeterminate);
        assert!(sel.bulk_delete_visible());

        sel.toggle(1);
        sel.toggle(3);
        assert_eq!(sel.indicator(list.len()), SelectAllIndicator::Checked);
    }

    #[test]
    fn empty_table_is_never_checked() {
        let sel = PlayerSelection::default();
        assert_eq!(sel.indicator(0), SelectAllIndicator::Unchecked);
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let list = players(&[4, 5, 6]);
        let mut sel = PlayerSelection::default();
        sel.toggle(5);

        sel.toggle_all(&list);
        assert_eq!(sel.ids(), vec![4, 5, 6]);
        assert_eq!(sel.state(list.len()), SelectionState::All);

        sel.toggle_all(&list);
        assert!(sel.is_empty());
    }

    #[test]
    fn reload_prunes_missing_players() {
        let mut sel = PlayerSelection::default();
        sel.toggle(1);
        sel.toggle(2);
        sel.retain_loaded(&players(&[2, 3]));
        assert_eq!(sel.ids(), vec![2]);
    }
}
