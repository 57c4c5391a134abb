use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use std::path::PathBuf;
use tourney_api::payload::{MatchPayload, MatchResultPayload, PlayerPayload, TeamPayload};
use tourney_api::{
    AuthStatus, Match, MatchId, Player, PlayerId, Stats, Team, TeamId, TournamentSettings,
};

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    CheckAuth,
    Login { username: String, password: String },
    Logout,
    LoadStats,
    /// Stats (and with them every list) plus settings, fetched concurrently.
    LoadAll,
    LoadTeams,
    LoadPlayers,
    LoadMatches,
    LoadSettings,
    /// `id: None` creates, `Some` updates.
    SaveTeam { id: Option<TeamId>, team: TeamPayload, logo: Option<PathBuf> },
    DeleteTeam { id: TeamId },
    SavePlayer { id: Option<PlayerId>, player: PlayerPayload },
    DeletePlayer { id: PlayerId },
    BulkDeletePlayers { ids: Vec<PlayerId> },
    SaveMatch { id: Option<MatchId>, fixture: MatchPayload },
    DeleteMatch { id: MatchId },
    SaveMatchResult { id: MatchId, result: MatchResultPayload },
    SaveSettings { settings: TournamentSettings },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    Stats,
    Teams,
    Players,
    Matches,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    SaveTeam,
    DeleteTeam,
    SavePlayer,
    DeletePlayer,
    BulkDeletePlayers,
    SaveMatch,
    DeleteMatch,
    SaveMatchResult,
    SaveSettings,
}

impl Mutation {
    /// Lists to re-fetch once the backend accepted the change. Recording a
    /// result leaves the counts alone, so stats are skipped there.
    pub fn refreshes(&self) -> Vec<NetworkRequest> {
        match self {
            Mutation::SaveTeam | Mutation::DeleteTeam => {
                vec![NetworkRequest::LoadTeams, NetworkRequest::LoadStats]
            }
            Mutation::SavePlayer | Mutation::DeletePlayer | Mutation::BulkDeletePlayers => {
                vec![NetworkRequest::LoadPlayers, NetworkRequest::LoadStats]
            }
            Mutation::SaveMatch | Mutation::DeleteMatch => {
                vec![NetworkRequest::LoadMatches, NetworkRequest::LoadStats]
            }
            Mutation::SaveMatchResult => vec![NetworkRequest::LoadMatches],
            Mutation::SaveSettings => vec![NetworkRequest::LoadSettings],
        }
    }

    /// Whether success closes the open form.
    pub fn closes_form(&self) -> bool {
        matches!(
            self,
            Mutation::SaveTeam
                | Mutation::SavePlayer
                | Mutation::SaveMatch
                | Mutation::SaveMatchResult
                | Mutation::SaveSettings
        )
    }

    /// Alert body when a non-OK response carries no `error` field.
    pub fn fallback_error(&self) -> &'static str {
        match self {
            Mutation::SaveTeam => "Failed to save team",
            Mutation::DeleteTeam => "Failed to delete team",
            Mutation::SavePlayer => "Failed to save player",
            Mutation::DeletePlayer => "Failed to delete player",
            Mutation::BulkDeletePlayers => "Failed to delete players",
            Mutation::SaveMatch => "Failed to save match",
            Mutation::DeleteMatch => "Failed to delete match",
            Mutation::SaveMatchResult => "Failed to update result",
            Mutation::SaveSettings => "Failed to update settings",
        }
    }

    /// Alert when the request never got a response.
    pub fn transport_error(&self) -> &'static str {
        match self {
            Mutation::SaveTeam => "Error saving team",
            Mutation::DeleteTeam => "Error deleting team",
            Mutation::SavePlayer => "Error saving player",
            Mutation::DeletePlayer => "Error deleting player",
            Mutation::BulkDeletePlayers => "Failed to delete players. Please try again.",
            Mutation::SaveMatch => "Error saving match",
            Mutation::DeleteMatch => "Error deleting match",
            Mutation::SaveMatchResult => "Error updating result",
            Mutation::SaveSettings => "Error updating settings",
        }
    }
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    AuthChecked { status: AuthStatus },
    LoginFailed { message: String },
    LoggedOut,
    StatsLoaded { stats: Stats },
    TeamsLoaded { teams: Vec<Team> },
    PlayersLoaded { players: Vec<Player> },
    MatchesLoaded { matches: Vec<Match> },
    SettingsLoaded { settings: TournamentSettings },
    LoadFailed { target: LoadTarget, message: String },
    Mutated { mutation: Mutation, message: String, warning: Option<String> },
    MutationFailed { mutation: Mutation, message: String },
    /// Several replies produced by one request.
    Batch(Vec<NetworkResponse>),
}

impl NetworkResponse {
    pub fn is_failure(&self) -> bool {
        match self {
            NetworkResponse::LoadFailed { .. }
            | NetworkResponse::MutationFailed { .. }
            | NetworkResponse::LoginFailed { .. } => true,
            NetworkResponse::Batch(responses) => responses.iter().any(NetworkResponse::is_failure),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
