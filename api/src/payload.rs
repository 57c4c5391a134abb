//! Request bodies sent to the backend. Field names match the backend columns.

use crate::{PlayerId, TeamId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamPayload {
    pub name: String,
    pub coach_name: String,
    pub home_ground: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPayload {
    pub name: String,
    pub team_id: TeamId,
    pub role: String,
    pub jersey_number: Option<u32>,
    pub batting_style: String,
    pub bowling_style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchPayload {
    pub match_date: String,
    /// English weekday of `match_date`, e.g. "Monday".
    pub match_day: String,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub venue: String,
    pub match_time: String,
    pub round: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResultPayload {
    pub winner_id: TeamId,
    pub team_a_score: String,
    pub team_b_score: String,
    pub result_summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkDeletePayload {
    pub player_ids: Vec<PlayerId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
    pub remember: bool,
}
