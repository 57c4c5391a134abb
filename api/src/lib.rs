pub mod client;
pub mod payload;

use serde::{Deserialize, Deserializer, Serialize};

pub type TeamId = i64;
pub type PlayerId = i64;
pub type MatchId = i64;

// ---------------------------------------------------------------------------
// Domain records as served by the tournament backend. Unknown fields are
// ignored, optional columns default to None.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub coach_name: Option<String>,
    #[serde(default)]
    pub home_ground: Option<String>,
    #[serde(default)]
    pub logo_path: Option<String>,
    /// Computed by the backend; never sent back.
    #[serde(default)]
    pub player_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    #[serde(default)]
    pub team_name: String,
    pub role: String,
    #[serde(default)]
    pub jersey_number: Option<u32>,
    #[serde(default)]
    pub batting_style: Option<String>,
    #[serde(default)]
    pub bowling_style: Option<String>,
    #[serde(default)]
    pub matches_played: Option<u32>,
    #[serde(default)]
    pub runs_scored: Option<u32>,
    #[serde(default)]
    pub wickets_taken: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// `YYYY-MM-DD`
    pub match_date: String,
    #[serde(default)]
    pub match_day: String,
    #[serde(default)]
    pub match_time: Option<String>,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    #[serde(default)]
    pub team_a_name: String,
    #[serde(default)]
    pub team_b_name: String,
    #[serde(default)]
    pub venue: Option<String>,
    pub round: String,
    #[serde(default = "default_match_status", deserialize_with = "status_or_default")]
    pub status: String,
    #[serde(default)]
    pub winner_id: Option<TeamId>,
    #[serde(default)]
    pub winner_name: Option<String>,
    #[serde(default)]
    pub team_a_score: Option<String>,
    #[serde(default)]
    pub team_b_score: Option<String>,
    #[serde(default)]
    pub result_summary: Option<String>,
}

fn default_match_status() -> String {
    "scheduled".to_string()
}

/// Rows edited without a status come back as `"status": null`.
fn status_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_match_status))
}

impl Match {
    pub fn has_result(&self) -> bool {
        self.winner_id.is_some()
    }

    pub fn fixture_label(&self) -> String {
        format!("{} vs {}", self.team_a_name, self.team_b_name)
    }
}

/// The single active tournament record. Always written back in full.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    pub tournament_name: String,
    pub total_teams: u32,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthStatus {
    pub fn is_admin(&self) -> bool {
        self.authenticated && self.user.as_ref().is_some_and(|u| u.role == "admin")
    }
}

/// Success body of every mutating call. Create calls carry the new id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MutationReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub match_id: Option<MatchId>,
}

/// Entity counts shown on the dashboard, plus the lists they were taken from.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
}

impl Stats {
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.teams.len(), self.players.len(), self.matches.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_ignores_unknown_columns_and_defaults_optionals() {
        let raw = r#"{"id": 3, "name": "Falcons", "captain_name": null, "created_at": "2024-01-01"}"#;
        let team: Team = serde_json::from_str(raw).unwrap();
        assert_eq!(team.id, 3);
        assert_eq!(team.name, "Falcons");
        assert_eq!(team.coach_name, None);
        assert_eq!(team.player_count, 0);
    }

    #[test]
    fn match_status_defaults_to_scheduled() {
        let raw = r#"{"id": 1, "match_date": "2024-01-01", "team_a_id": 1, "team_b_id": 2, "round": "League"}"#;
        let m: Match = serde_json::from_str(raw).unwrap();
        assert_eq!(m.status, "scheduled");
        assert!(!m.has_result());
    }

    #[test]
    fn null_match_status_reads_as_scheduled() {
        let raw = r#"[
            {"id": 4, "match_date": "2024-02-10", "team_a_id": 1, "team_b_id": 2, "round": "Final", "status": null},
            {"id": 5, "match_date": "2024-02-11", "team_a_id": 2, "team_b_id": 3, "round": "League", "status": "completed"}
        ]"#;
        let matches: Vec<Match> = serde_json::from_str(raw).unwrap();
        assert_eq!(matches[0].status, "scheduled");
        assert_eq!(matches[1].status, "completed");
    }

    #[test]
    fn auth_status_requires_admin_role() {
        let viewer = AuthStatus {
            authenticated: true,
            user: Some(User { id: 2, username: "v".into(), role: "viewer".into() }),
        };
        let admin = AuthStatus {
            authenticated: true,
            user: Some(User { id: 1, username: "admin".into(), role: "admin".into() }),
        };
        assert!(!viewer.is_admin());
        assert!(admin.is_admin());
        assert!(!AuthStatus::default().is_admin());
    }
}
