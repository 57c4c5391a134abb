//! Table row models. Pure projections of the cached lists; `draw` only
//! turns these into cells.

use crate::state::selection::PlayerSelection;
use crate::state::shared::format_date;
use tourney_api::{Match, MatchId, Player, PlayerId, Team, TeamId};

pub const EMPTY_TEAMS: &str = "No teams found";
pub const EMPTY_PLAYERS: &str = "No players found";
pub const EMPTY_MATCHES: &str = "No matches found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRow {
    pub id: TeamId,
    pub name: String,
    pub coach: String,
    pub home_ground: String,
    pub players: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub selected: bool,
    pub name: String,
    pub team: String,
    pub role: String,
    pub jersey: String,
    pub stats: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub id: MatchId,
    pub date: String,
    pub fixture: String,
    pub venue: String,
    pub round: String,
    pub status: String,
    pub result: String,
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

pub fn team_rows(teams: &[Team]) -> Vec<TeamRow> {
    teams
        .iter()
        .map(|t| TeamRow {
            id: t.id,
            name: t.name.clone(),
            coach: or_placeholder(t.coach_name.as_deref(), "N/A"),
            home_ground: or_placeholder(t.home_ground.as_deref(), "N/A"),
            players: t.player_count.to_string(),
        })
        .collect()
}

pub fn player_rows(players: &[Player], selection: &PlayerSelection) -> Vec<PlayerRow> {
    players
        .iter()
        .map(|p| PlayerRow {
            id: p.id,
            selected: selection.contains(p.id),
            name: p.name.clone(),
            team: p.team_name.clone(),
            role: p.role.clone(),
            jersey: p
                .jersey_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            stats: format!(
                "{} runs, {} wickets",
                p.runs_scored.unwrap_or(0),
                p.wickets_taken.unwrap_or(0)
            ),
        })
        .collect()
}

pub fn match_rows(matches: &[Match]) -> Vec<MatchRow> {
    matches
        .iter()
        .map(|m| MatchRow {
            id: m.id,
            date: format_date(&m.match_date),
            fixture: m.fixture_label(),
            venue: or_placeholder(m.venue.as_deref(), "TBD"),
            round: m.round.clone(),
            status: m.status.clone(),
            result: result_text(m),
        })
        .collect()
}

fn result_text(m: &Match) -> String {
    if !m.has_result() {
        return String::new();
    }
    let scores = match (m.team_a_score.as_deref(), m.team_b_score.as_deref()) {
        (Some(a), Some(b)) if !a.is_empty() || !b.is_empty() => format!("{a} - {b}"),
        _ => String::new(),
    };
    let winner = m
        .winner_name
        .clone()
        .or_else(|| match m.winner_id {
            Some(id) if id == m.team_a_id => Some(m.team_a_name.clone()),
            Some(id) if id == m.team_b_id => Some(m.team_b_name.clone()),
            _ => None,
        })
        .map(|w| format!("{w} won"))
        .unwrap_or_default();
    [scores, winner]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}
