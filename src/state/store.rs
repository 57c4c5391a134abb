use crate::state::selection::PlayerSelection;
use crate::state::shared::LoadStatus;
use tourney_api::{Match, MatchId, Player, PlayerId, Stats, Team, TeamId, TournamentSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Team,
    Player,
    Match,
}

impl Entity {
    pub fn label(&self) -> &'static str {
        match self {
            Entity::Team => "Team",
            Entity::Player => "Player",
            Entity::Match => "Match",
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            Entity::Team => "team",
            Entity::Player => "player",
            Entity::Match => "match",
        }
    }
}

/// Client-side copy of the backend collections.
///
/// Every list is the result of the last successful fetch and is only ever
/// replaced as a whole.
#[derive(Debug, Default)]
pub struct AdminStore {
    teams: Vec<Team>,
    players: Vec<Player>,
    matches: Vec<Match>,
    settings: Option<TournamentSettings>,
    stats: Option<(usize, usize, usize)>,
    team_status: LoadStatus,
    player_status: LoadStatus,
    match_status: LoadStatus,
    selection: PlayerSelection,
}

impl AdminStore {
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn settings(&self) -> Option<&TournamentSettings> {
        self.settings.as_ref()
    }

    /// (teams, players, matches) from the last stats fetch.
    pub fn stats(&self) -> Option<(usize, usize, usize)> {
        self.stats
    }

    pub fn status(&self, entity: Entity) -> LoadStatus {
        match entity {
            Entity::Team => self.team_status,
            Entity::Player => self.player_status,
            Entity::Match => self.match_status,
        }
    }

    pub fn len(&self, entity: Entity) -> usize {
        match entity {
            Entity::Team => self.teams.len(),
            Entity::Player => self.players.len(),
            Entity::Match => self.matches.len(),
        }
    }

    pub fn replace_teams(&mut self, teams: Vec<Team>) {
        self.teams = teams;
        self.team_status = LoadStatus::Loaded;
    }

    pub fn replace_players(&mut self, players: Vec<Player>) {
        self.selection.retain_loaded(&players);
        self.players = players;
        self.player_status = LoadStatus::Loaded;
    }

    pub fn replace_matches(&mut self, matches: Vec<Match>) {
        self.matches = matches;
        self.match_status = LoadStatus::Loaded;
    }

    pub fn replace_settings(&mut self, settings: TournamentSettings) {
        self.settings = Some(settings);
    }

    /// Stats reuse the three fetched lists as fresh caches.
    pub fn apply_stats(&mut self, stats: Stats) {
        self.stats = Some(stats.counts());
        self.replace_teams(stats.teams);
        self.replace_players(stats.players);
        self.replace_matches(stats.matches);
    }

    pub fn mark_stale(&mut self, entity: Entity) {
        let status = match entity {
            Entity::Team => &mut self.team_status,
            Entity::Player => &mut self.player_status,
            Entity::Match => &mut self.match_status,
        };
        *status = LoadStatus::Stale;
    }

    pub fn find_team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn find_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn selection(&self) -> &PlayerSelection {
        &self.selection
    }

    pub fn toggle_player(&mut self, id: PlayerId) {
        self.selection.toggle(id);
    }

    pub fn toggle_all_players(&mut self) {
        self.selection.toggle_all(&self.players);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Forget everything, e.g. on logout.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::selection::SelectionState;

    fn team(id: TeamId, name: &str) -> Team {
        Team { id, name: name.into(), ..Default::default() }
    }

    fn player(id: PlayerId) -> Player {
        Player { id, name: format!("P{id}"), team_id: 1, ..Default::default() }
    }

    #[test]
    fn lists_are_replaced_wholesale() {
        let mut store = AdminStore::default();
        assert_eq!(store.status(Entity::Team), LoadStatus::Loading);

        store.replace_teams(vec![team(1, "A"), team(2, "B")]);
        store.replace_teams(vec![team(3, "C")]);
        assert_eq!(store.teams().len(), 1);
        assert_eq!(store.find_team(3).map(|t| t.name.as_str()), Some("C"));
        assert!(store.find_team(1).is_none());
        assert_eq!(store.status(Entity::Team), LoadStatus::Loaded);
    }

    #[test]
    fn failed_refresh_keeps_previous_rows() {
        let mut store = AdminStore::default();
        store.replace_matches(vec![Match { id: 1, ..Default::default() }]);
        store.mark_stale(Entity::Match);
        assert_eq!(store.status(Entity::Match), LoadStatus::Stale);
        assert_eq!(store.len(Entity::Match), 1);
    }

    #[test]
    fn selection_is_independent_of_reload_order() {
        let mut store = AdminStore::default();
        store.replace_players(vec![player(1), player(2)]);
        store.toggle_all_players();
        assert_eq!(store.selection().state(store.players().len()), SelectionState::All);

        store.replace_players(vec![player(2), player(3)]);
        assert_eq!(store.selection().ids(), vec![2]);
        assert_eq!(store.selection().state(store.players().len()), SelectionState::Partial);
    }

    #[test]
    fn stats_refresh_all_caches_and_counts() {
        let mut store = AdminStore::default();
        store.apply_stats(Stats {
            teams: vec![team(1, "A")],
            players: vec![player(1), player(2)],
            matches: vec![],
        });
        assert_eq!(store.stats(), Some((1, 2, 0)));
        assert_eq!(store.players().len(), 2);
        assert_eq!(store.status(Entity::Match), LoadStatus::Loaded);
    }

    #[test]
    fn reset_clears_selection() {
        let mut store = AdminStore::default();
        store.replace_players(vec![player(1)]);
        store.toggle_player(1);
        store.reset();
        assert!(store.selection().is_empty());
        assert!(store.players().is_empty());
    }
}
