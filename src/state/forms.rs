use crate::state::shared::{parse_date, weekday_name};
use std::path::PathBuf;
use std::str::FromStr;
use tourney_api::payload::{MatchPayload, MatchResultPayload, PlayerPayload, TeamPayload};
use tourney_api::{Match, Player, Team, TournamentSettings};

pub const PLAYER_ROLES: [&str; 4] = ["Batsman", "Bowler", "All-rounder", "Wicket-keeper"];
pub const MATCH_STATUSES: [&str; 4] = ["scheduled", "live", "completed", "cancelled"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Integer,
    /// `YYYY-MM-DD`
    Date,
    Choice(Vec<Choice>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Raw input; for choices, the selected option's value.
    pub value: String,
    pub required: bool,
}

impl Field {
    fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind, value: String::new(), required: false }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn display_value(&self) -> String {
        match &self.kind {
            FieldKind::Secret => "*".repeat(self.value.chars().count()),
            FieldKind::Choice(options) => options
                .iter()
                .find(|c| c.value == self.value)
                .map(|c| c.label.clone())
                .unwrap_or_else(|| {
                    if self.value.is_empty() {
                        "Select...".to_string()
                    } else {
                        self.value.clone()
                    }
                }),
            _ => self.value.clone(),
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Team,
    Player,
    Match,
    Result,
    Settings,
    Login,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub kind: FormKind,
    pub mode: FormMode,
    pub fields: Vec<Field>,
    pub focus: usize,
}

fn team_choices(teams: &[Team]) -> Vec<Choice> {
    teams.iter().map(|t| Choice::new(t.id.to_string(), t.name.clone())).collect()
}

fn fixed_choices(values: &[&str]) -> Vec<Choice> {
    values.iter().map(|v| Choice::new(*v, *v)).collect()
}

impl FormState {
    fn new(kind: FormKind, mode: FormMode, fields: Vec<Field>) -> Self {
        Self { kind, mode, fields, focus: 0 }
    }

    pub fn team(team: Option<&Team>) -> Self {
        let mode = team.map_or(FormMode::Create, |t| FormMode::Edit(t.id));
        let fields = vec![
            Field::new("name", "Team Name", FieldKind::Text)
                .required()
                .with_value(team.map(|t| t.name.clone()).unwrap_or_default()),
            Field::new("coach_name", "Coach", FieldKind::Text)
                .with_value(team.and_then(|t| t.coach_name.clone()).unwrap_or_default()),
            Field::new("home_ground", "Home Ground", FieldKind::Text)
                .with_value(team.and_then(|t| t.home_ground.clone()).unwrap_or_default()),
            Field::new("logo", "Logo File", FieldKind::Text),
        ];
        Self::new(FormKind::Team, mode, fields)
    }

    pub fn player(player: Option<&Player>, teams: &[Team]) -> Self {
        let mode = player.map_or(FormMode::Create, |p| FormMode::Edit(p.id));
        let fields = vec![
            Field::new("name", "Player Name", FieldKind::Text)
                .required()
                .with_value(player.map(|p| p.name.clone()).unwrap_or_default()),
            Field::new("team_id", "Team", FieldKind::Choice(team_choices(teams)))
                .required()
                .with_value(player.map(|p| p.team_id.to_string()).unwrap_or_default()),
            Field::new("role", "Role", FieldKind::Choice(fixed_choices(&PLAYER_ROLES)))
                .required()
                .with_value(player.map(|p| p.role.clone()).unwrap_or_default()),
            Field::new("jersey_number", "Jersey Number", FieldKind::Integer).with_value(
                player
                    .and_then(|p| p.jersey_number)
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
            ),
            Field::new("batting_style", "Batting Style", FieldKind::Text)
                .with_value(player.and_then(|p| p.batting_style.clone()).unwrap_or_default()),
            Field::new("bowling_style", "Bowling Style", FieldKind::Text)
                .with_value(player.and_then(|p| p.bowling_style.clone()).unwrap_or_default()),
        ];
        Self::new(FormKind::Player, mode, fields)
    }

    pub fn fixture(fixture: Option<&Match>, teams: &[Team]) -> Self {
        let mode = fixture.map_or(FormMode::Create, |m| FormMode::Edit(m.id));
        let fields = vec![
            Field::new("match_date", "Date", FieldKind::Date)
                .required()
                .with_value(fixture.map(|m| m.match_date.clone()).unwrap_or_default()),
            Field::new("match_time", "Time", FieldKind::Text)
                .with_value(fixture.and_then(|m| m.match_time.clone()).unwrap_or_default()),
            Field::new("team_a_id", "Team A", FieldKind::Choice(team_choices(teams)))
                .required()
                .with_value(fixture.map(|m| m.team_a_id.to_string()).unwrap_or_default()),
            Field::new("team_b_id", "Team B", FieldKind::Choice(team_choices(teams)))
                .required()
                .with_value(fixture.map(|m| m.team_b_id.to_string()).unwrap_or_default()),
            Field::new("venue", "Venue", FieldKind::Text)
                .with_value(fixture.and_then(|m| m.venue.clone()).unwrap_or_default()),
            Field::new("round", "Round", FieldKind::Text)
                .required()
                .with_value(fixture.map(|m| m.round.clone()).unwrap_or_default()),
            Field::new("status", "Status", FieldKind::Choice(fixed_choices(&MATCH_STATUSES)))
                .with_value(
                    fixture
                        .map(|m| m.status.clone())
                        .unwrap_or_else(|| MATCH_STATUSES[0].to_string()),
                ),
        ];
        Self::new(FormKind::Match, mode, fields)
    }

    /// Winner choices are the two sides of the fixture. Stored scores and
    /// summary are pre-filled only once a winner has been recorded.
    pub fn result(fixture: &Match) -> Self {
        let choices = vec![
            Choice::new(fixture.team_a_id.to_string(), fixture.team_a_name.clone()),
            Choice::new(fixture.team_b_id.to_string(), fixture.team_b_name.clone()),
        ];
        let recorded = fixture.winner_id.is_some();
        let stored = |value: &Option<String>| {
            if recorded { value.clone().unwrap_or_default() } else { String::new() }
        };
        let fields = vec![
            Field::new("winner_id", "Winner", FieldKind::Choice(choices))
                .required()
                .with_value(fixture.winner_id.unwrap_or(fixture.team_a_id).to_string()),
            Field::new("team_a_score", "Team A Score", FieldKind::Text)
                .with_value(stored(&fixture.team_a_score)),
            Field::new("team_b_score", "Team B Score", FieldKind::Text)
                .with_value(stored(&fixture.team_b_score)),
            Field::new("result_summary", "Summary", FieldKind::Text)
                .with_value(stored(&fixture.result_summary)),
        ];
        Self::new(FormKind::Result, FormMode::Edit(fixture.id), fields)
    }

    pub fn settings(settings: Option<&TournamentSettings>) -> Self {
        let fields = vec![
            Field::new("tournament_name", "Tournament Name", FieldKind::Text)
                .required()
                .with_value(settings.map(|s| s.tournament_name.clone()).unwrap_or_default()),
            Field::new("total_teams", "Total Teams", FieldKind::Integer)
                .required()
                .with_value(settings.map(|s| s.total_teams.to_string()).unwrap_or_default()),
            Field::new("start_date", "Start Date", FieldKind::Date)
                .with_value(settings.and_then(|s| s.start_date.clone()).unwrap_or_default()),
            Field::new("end_date", "End Date", FieldKind::Date)
                .with_value(settings.and_then(|s| s.end_date.clone()).unwrap_or_default()),
        ];
        Self::new(FormKind::Settings, FormMode::Create, fields)
    }

    pub fn login() -> Self {
        let fields = vec![
            Field::new("username", "Username", FieldKind::Text).required(),
            Field::new("password", "Password", FieldKind::Secret).required(),
        ];
        Self::new(FormKind::Login, FormMode::Create, fields)
    }

    pub fn title(&self) -> String {
        let verb = match self.mode {
            FormMode::Create => "Add",
            FormMode::Edit(_) => "Edit",
        };
        match self.kind {
            FormKind::Team => format!("{verb} Team"),
            FormKind::Player => format!("{verb} Player"),
            FormKind::Match => format!("{verb} Match"),
            FormKind::Result => "Match Result".to_string(),
            FormKind::Settings => "Tournament Settings".to_string(),
            FormKind::Login => "Admin Login".to_string(),
        }
    }

    pub fn edit_id(&self) -> Option<i64> {
        match self.mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    pub fn focused(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        if field.is_choice() {
            if c == ' ' {
                self.cycle_choice(true);
            }
            return;
        }
        if field.kind == FieldKind::Integer && !c.is_ascii_digit() {
            return;
        }
        field.value.push(c);
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus)
            && !field.is_choice()
        {
            field.value.pop();
        }
    }

    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        let FieldKind::Choice(options) = &field.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = options.iter().position(|c| c.value == field.value);
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        field.value = options[next].value.clone();
    }

    /// Swap in a fresh team list for every team picker, keeping picks.
    pub fn refresh_team_choices(&mut self, teams: &[Team]) {
        for field in &mut self.fields {
            if matches!(field.key, "team_id" | "team_a_id" | "team_b_id") {
                field.kind = FieldKind::Choice(team_choices(teams));
            }
        }
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.trim())
            .unwrap_or("")
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.into();
        }
    }

    // -----------------------------------------------------------------------
    // Validation and payloads
    // -----------------------------------------------------------------------

    /// Required, numeric and date constraints only.
    pub fn validate(&self) -> Result<(), String> {
        for field in &self.fields {
            let value = field.value.trim();
            if value.is_empty() {
                if field.required {
                    return Err(format!("Please fill out {}.", field.label));
                }
                continue;
            }
            match field.kind {
                FieldKind::Integer if value.parse::<u32>().is_err() => {
                    return Err(format!("{} must be a whole number.", field.label));
                }
                FieldKind::Date if parse_date(value).is_none() => {
                    return Err(format!("{} must be a date (YYYY-MM-DD).", field.label));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, String> {
        let value = self.value(key);
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("Invalid value for {key}: {value}"))
    }

    fn required_parsed<T: FromStr>(&self, key: &str) -> Result<T, String> {
        self.parsed(key)?
            .ok_or_else(|| format!("Missing value for {key}"))
    }

    fn optional_text(&self, key: &str) -> Option<String> {
        Some(self.value(key).to_string()).filter(|v| !v.is_empty())
    }

    /// Team body plus the logo file to upload afterwards, if one was given.
    pub fn team_payload(&self) -> Result<(TeamPayload, Option<PathBuf>), String> {
        self.validate()?;
        let payload = TeamPayload {
            name: self.value("name").to_string(),
            coach_name: self.value("coach_name").to_string(),
            home_ground: self.value("home_ground").to_string(),
        };
        Ok((payload, self.optional_text("logo").map(PathBuf::from)))
    }

    pub fn player_payload(&self) -> Result<PlayerPayload, String> {
        self.validate()?;
        Ok(PlayerPayload {
            name: self.value("name").to_string(),
            team_id: self.required_parsed("team_id")?,
            role: self.value("role").to_string(),
            jersey_number: self.parsed("jersey_number")?,
            batting_style: self.value("batting_style").to_string(),
            bowling_style: self.value("bowling_style").to_string(),
        })
    }

    pub fn match_payload(&self) -> Result<MatchPayload, String> {
        self.validate()?;
        let match_date = self.value("match_date").to_string();
        let match_day = weekday_name(&match_date)
            .ok_or_else(|| format!("Invalid date: {match_date}"))?
            .to_string();
        Ok(MatchPayload {
            match_date,
            match_day,
            team_a_id: self.required_parsed("team_a_id")?,
            team_b_id: self.required_parsed("team_b_id")?,
            venue: self.value("venue").to_string(),
            match_time: self.value("match_time").to_string(),
            round: self.value("round").to_string(),
            status: self.value("status").to_string(),
        })
    }

    pub fn result_payload(&self) -> Result<MatchResultPayload, String> {
        self.validate()?;
        Ok(MatchResultPayload {
            winner_id: self.required_parsed("winner_id")?,
            team_a_score: self.value("team_a_score").to_string(),
            team_b_score: self.value("team_b_score").to_string(),
            result_summary: self.value("result_summary").to_string(),
        })
    }

    pub fn settings_payload(&self) -> Result<TournamentSettings, String> {
        self.validate()?;
        Ok(TournamentSettings {
            tournament_name: self.value("tournament_name").to_string(),
            total_teams: self.required_parsed("total_teams")?,
            start_date: self.optional_text("start_date"),
            end_date: self.optional_text("end_date"),
        })
    }

    pub fn login_credentials(&self) -> Result<(String, String), String> {
        self.validate()?;
        // Passwords are sent as typed.
        let password = self
            .fields
            .iter()
            .find(|f| f.key == "password")
            .map(|f| f.value.clone())
            .unwrap_or_default();
        Ok((self.value("username").to_string(), password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams() -> Vec<Team> {
        vec![
            Team { id: 1, name: "Falcons".into(), ..Default::default() },
            Team { id: 2, name: "Hawks".into(), ..Default::default() },
        ]
    }

    fn played_match() -> Match {
        Match {
            id: 30,
            match_date: "2024-01-06".into(),
            team_a_id: 1,
            team_b_id: 2,
            team_a_name: "Falcons".into(),
            team_b_name: "Hawks".into(),
            round: "Final".into(),
            status: "completed".into(),
            winner_id: Some(2),
            team_a_score: Some("120/9".into()),
            team_b_score: Some("121/4".into()),
            result_summary: Some("Hawks won by 6 wickets".into()),
            ..Default::default()
        }
    }

    #[test]
    fn blank_team_form_is_create_mode() {
        let form = FormState::team(None);
        assert_eq!(form.mode, FormMode::Create);
        assert_eq!(form.title(), "Add Team");
        assert!(form.fields.iter().all(|f| f.value.is_empty()));
        assert_eq!(form.team_payload().unwrap_err(), "Please fill out Team Name.");
    }

    #[test]
    fn edit_team_form_round_trips_fields() {
        let team = Team {
            id: 3,
            name: "Falcons".into(),
            coach_name: Some("Ravi".into()),
            ..Default::default()
        };
        let mut form = FormState::team(Some(&team));
        assert_eq!(form.title(), "Edit Team");
        assert_eq!(form.edit_id(), Some(3));

        let (payload, logo) = form.team_payload().unwrap();
        assert_eq!(payload.name, "Falcons");
        assert_eq!(payload.coach_name, "Ravi");
        assert_eq!(payload.home_ground, "");
        assert!(logo.is_none());

        form.set_value("logo", "/tmp/falcons.png");
        let (_, logo) = form.team_payload().unwrap();
        assert_eq!(logo, Some(PathBuf::from("/tmp/falcons.png")));
    }

    #[test]
    fn result_form_prefills_recorded_result() {
        let form = FormState::result(&played_match());
        assert_eq!(form.value("winner_id"), "2");
        assert_eq!(form.value("team_a_score"), "120/9");
        assert_eq!(form.value("team_b_score"), "121/4");
        assert_eq!(form.value("result_summary"), "Hawks won by 6 wickets");
        assert_eq!(form.fields[0].display_value(), "Hawks");

        let payload = form.result_payload().unwrap();
        assert_eq!(payload.winner_id, 2);
        assert_eq!(payload.result_summary, "Hawks won by 6 wickets");
    }

    #[test]
    fn result_form_without_winner_ignores_stale_scores() {
        let mut fixture = played_match();
        fixture.winner_id = None;
        let form = FormState::result(&fixture);
        assert_eq!(form.value("winner_id"), "1");
        assert_eq!(form.value("team_a_score"), "");
        assert_eq!(form.value("result_summary"), "");
    }

    #[test]
    fn match_payload_derives_weekday() {
        let mut form = FormState::fixture(None, &teams());
        form.set_value("match_date", "2024-01-01");
        form.set_value("team_a_id", "1");
        form.set_value("team_b_id", "2");
        form.set_value("round", "Group A");

        let payload = form.match_payload().unwrap();
        assert_eq!(payload.match_day, "Monday");
        assert_eq!(payload.team_a_id, 1);
        assert_eq!(payload.team_b_id, 2);
        assert_eq!(payload.status, "scheduled");
    }

    #[test]
    fn match_date_must_be_a_date() {
        let mut form = FormState::fixture(None, &teams());
        form.set_value("match_date", "next tuesday");
        form.set_value("team_a_id", "1");
        form.set_value("team_b_id", "2");
        form.set_value("round", "Group A");
        assert_eq!(form.match_payload().unwrap_err(), "Date must be a date (YYYY-MM-DD).");
    }

    #[test]
    fn player_jersey_is_optional() {
        let mut form = FormState::player(None, &teams());
        form.set_value("name", "Asha");
        form.set_value("team_id", "2");
        form.set_value("role", "Bowler");
        let payload = form.player_payload().unwrap();
        assert_eq!(payload.jersey_number, None);
        assert_eq!(payload.team_id, 2);

        form.set_value("jersey_number", "18");
        assert_eq!(form.player_payload().unwrap().jersey_number, Some(18));
    }

    #[test]
    fn choices_cycle_through_teams() {
        let mut form = FormState::player(None, &teams());
        form.next_field();
        assert_eq!(form.focused().map(|f| f.key), Some("team_id"));
        form.cycle_choice(true);
        assert_eq!(form.value("team_id"), "1");
        form.cycle_choice(true);
        assert_eq!(form.value("team_id"), "2");
        form.cycle_choice(true);
        assert_eq!(form.value("team_id"), "1");
        form.cycle_choice(false);
        assert_eq!(form.value("team_id"), "2");
    }

    #[test]
    fn typing_respects_field_kind() {
        let mut form = FormState::player(None, &[]);
        form.focus = 3;
        for c in "1a2".chars() {
            form.insert_char(c);
        }
        assert_eq!(form.value("jersey_number"), "12");
        form.backspace();
        assert_eq!(form.value("jersey_number"), "1");
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = FormState::login();
        form.prev_field();
        assert_eq!(form.focus, 1);
        form.next_field();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn refreshed_team_list_keeps_pick() {
        let mut form = FormState::player(None, &[]);
        form.set_value("team_id", "2");
        assert_eq!(form.fields[1].display_value(), "2");
        form.refresh_team_choices(&teams());
        assert_eq!(form.fields[1].display_value(), "Hawks");
    }

    #[test]
    fn settings_payload_is_full_record() {
        let mut form = FormState::settings(None);
        form.set_value("tournament_name", "Cup");
        form.set_value("total_teams", "8");
        form.set_value("start_date", "2024-01-01");
        form.set_value("end_date", "2024-02-01");
        assert_eq!(
            form.settings_payload().unwrap(),
            TournamentSettings {
                tournament_name: "Cup".into(),
                total_teams: 8,
                start_date: Some("2024-01-01".into()),
                end_date: Some("2024-02-01".into()),
            }
        );
    }

    #[test]
    fn login_masks_password() {
        let mut form = FormState::login();
        form.set_value("username", "admin");
        form.set_value("password", "secret");
        assert_eq!(form.fields[1].display_value(), "******");
        assert_eq!(
            form.login_credentials().unwrap(),
            ("admin".to_string(), "secret".to_string())
        );
    }
}
