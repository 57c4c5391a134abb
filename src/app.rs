use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Dialog, Screen};
use crate::state::forms::{FormKind, FormState};
use crate::state::messages::{LoadTarget, Mutation, NetworkRequest, NetworkResponse};
use crate::state::store::Entity;
use log::{debug, info, warn};
use tourney_api::{AuthStatus, Match, Player, Stats, Team, TournamentSettings};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Dashboard,
    Teams,
    Players,
    Matches,
    Settings,
    Help,
}

impl MenuItem {
    pub fn entity(&self) -> Option<Entity> {
        match self {
            MenuItem::Teams => Some(Entity::Team),
            MenuItem::Players => Some(Entity::Player),
            MenuItem::Matches => Some(Entity::Match),
            _ => None,
        }
    }
}

fn load_request(entity: Entity) -> NetworkRequest {
    match entity {
        Entity::Team => NetworkRequest::LoadTeams,
        Entity::Player => NetworkRequest::LoadPlayers,
        Entity::Match => NetworkRequest::LoadMatches,
    }
}

/// Every user action and network response lands here. Methods that need
/// the backend return the requests to send instead of sending them.
pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self { state: AppState::new(), settings }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Routes a worker reply to its handler and returns the requests it asks for.
    pub fn apply_response(&mut self, response: NetworkResponse) -> Vec<NetworkRequest> {
        match response {
            NetworkResponse::LoadingStateChanged { .. } => Vec::new(),
            NetworkResponse::AuthChecked { status } => self.on_auth_checked(status),
            NetworkResponse::LoginFailed { message } => {
                self.on_login_failed(message);
                Vec::new()
            }
            NetworkResponse::LoggedOut => {
                self.on_logged_out();
                Vec::new()
            }
            NetworkResponse::StatsLoaded { stats } => {
                self.on_stats_loaded(stats);
                Vec::new()
            }
            NetworkResponse::TeamsLoaded { teams } => {
                self.on_teams_loaded(teams);
                Vec::new()
            }
            NetworkResponse::PlayersLoaded { players } => {
                self.on_players_loaded(players);
                Vec::new()
            }
            NetworkResponse::MatchesLoaded { matches } => {
                self.on_matches_loaded(matches);
                Vec::new()
            }
            NetworkResponse::SettingsLoaded { settings } => {
                self.on_settings_loaded(settings);
                Vec::new()
            }
            NetworkResponse::LoadFailed { target, message } => {
                warn!("{target:?} not refreshed: {message}");
                self.on_load_failed(target);
                Vec::new()
            }
            NetworkResponse::Mutated { mutation, message, warning } => {
                self.on_mutated(mutation, message, warning)
            }
            NetworkResponse::MutationFailed { mutation, message } => {
                self.on_mutation_failed(mutation, message);
                Vec::new()
            }
            NetworkResponse::Batch(responses) => responses
                .into_iter()
                .flat_map(|response| self.apply_response(response))
                .collect(),
        }
    }

    /// Admins get the dashboard and a full load; everyone else the login screen.
    pub fn on_auth_checked(&mut self, status: AuthStatus) -> Vec<NetworkRequest> {
        let is_admin = status.is_admin();
        let was_authenticated = status.authenticated;
        self.state.auth = status;

        if is_admin {
            info!("admin session confirmed");
            self.state.screen = Screen::Admin;
            self.state.login = Default::default();
            return vec![NetworkRequest::LoadAll];
        }

        self.state.screen = Screen::Login;
        self.state.store.reset();
        self.state.modal = None;
        if was_authenticated {
            self.state.login.message = Some("Admin access required".to_string());
        }
        Vec::new()
    }

    pub fn on_login_failed(&mut self, message: String) {
        self.state.login.message = Some(message);
    }

    pub fn on_logged_out(&mut self) {
        info!("logged out");
        self.state.auth = AuthStatus::default();
        self.state.store.reset();
        self.state.modal = None;
        self.state.dialogs.clear();
        self.state.login = Default::default();
        self.state.cursors = Default::default();
        self.state.screen = Screen::Login;
    }

    pub fn on_stats_loaded(&mut self, stats: Stats) {
        self.state.store.apply_stats(stats);
        self.after_teams_changed();
        for entity in [Entity::Team, Entity::Player, Entity::Match] {
            let len = self.state.store.len(entity);
            self.state.cursors.clamp(entity, len);
        }
    }

    pub fn on_teams_loaded(&mut self, teams: Vec<Team>) {
        self.state.store.replace_teams(teams);
        self.state.cursors.clamp(Entity::Team, self.state.store.len(Entity::Team));
        self.after_teams_changed();
    }

    pub fn on_players_loaded(&mut self, players: Vec<Player>) {
        self.state.store.replace_players(players);
        self.state.cursors.clamp(Entity::Player, self.state.store.len(Entity::Player));
    }

    pub fn on_matches_loaded(&mut self, matches: Vec<Match>) {
        self.state.store.replace_matches(matches);
        self.state.cursors.clamp(Entity::Match, self.state.store.len(Entity::Match));
    }

    pub fn on_settings_loaded(&mut self, settings: TournamentSettings) {
        self.state.store.replace_settings(settings);
    }

    /// Tables keep their last rows; only the title shows they are out of date.
    pub fn on_load_failed(&mut self, target: LoadTarget) {
        let store = &mut self.state.store;
        match target {
            LoadTarget::Teams => store.mark_stale(Entity::Team),
            LoadTarget::Players => store.mark_stale(Entity::Player),
            LoadTarget::Matches => store.mark_stale(Entity::Match),
            LoadTarget::Stats => {
                for entity in [Entity::Team, Entity::Player, Entity::Match] {
                    if store.len(entity) == 0 {
                        store.mark_stale(entity);
                    }
                }
            }
            LoadTarget::Settings => {}
        }
    }

    pub fn on_mutated(
        &mut self,
        mutation: Mutation,
        message: String,
        warning: Option<String>,
    ) -> Vec<NetworkRequest> {
        if mutation.closes_form() {
            self.state.modal = None;
        }
        if mutation == Mutation::BulkDeletePlayers {
            self.state.store.clear_selection();
        }
        self.state.push_dialog(Dialog::info(message));
        if let Some(warning) = warning {
            self.state.push_dialog(Dialog::error(warning));
        }
        if self.state.screen != Screen::Admin {
            debug!("{mutation:?} finished after the session ended, not refreshing");
            return Vec::new();
        }
        mutation.refreshes()
    }

    /// The form stays open and the selection is kept so the user can retry.
    pub fn on_mutation_failed(&mut self, mutation: Mutation, message: String) {
        debug!("{mutation:?} rejected");
        self.state.push_dialog(Dialog::error(message));
    }

    /// Player and match forms pick from the team list, which may arrive late.
    fn after_teams_changed(&mut self) {
        let teams = self.state.store.teams();
        if let Some(form) = self.state.modal.as_mut()
            && matches!(form.kind, FormKind::Player | FormKind::Match)
        {
            form.refresh_team_choices(teams);
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Table navigation
    // -----------------------------------------------------------------------

    pub fn cursor_down(&mut self) {
        if let Some(entity) = self.state.active_tab.entity() {
            let len = self.state.store.len(entity);
            self.state.cursors.down(entity, len);
        }
    }

    pub fn cursor_up(&mut self) {
        if let Some(entity) = self.state.active_tab.entity() {
            self.state.cursors.up(entity);
        }
    }

    /// Id of the row under the cursor in the active tab.
    pub fn selected_id(&self) -> Option<(Entity, i64)> {
        let entity = self.state.active_tab.entity()?;
        let index = self.state.cursors.get(entity);
        let store = &self.state.store;
        let id = match entity {
            Entity::Team => store.teams().get(index)?.id,
            Entity::Player => store.players().get(index)?.id,
            Entity::Match => store.matches().get(index)?.id,
        };
        Some((entity, id))
    }

    // -----------------------------------------------------------------------
    // Create / edit / delete
    // -----------------------------------------------------------------------

    pub fn show_add_form(&mut self, entity: Entity) -> Vec<NetworkRequest> {
        let teams = self.state.store.teams();
        let form = match entity {
            Entity::Team => FormState::team(None),
            Entity::Player => FormState::player(None, teams),
            Entity::Match => FormState::fixture(None, teams),
        };
        self.open_form(form)
    }

    /// Forms are filled from the cache only. A row that has gone missing
    /// since the last fetch is reported and its list reloaded.
    pub fn edit(&mut self, entity: Entity, id: i64) -> Vec<NetworkRequest> {
        let store = &self.state.store;
        let form = match entity {
            Entity::Team => store.find_team(id).map(|t| FormState::team(Some(t))),
            Entity::Player => store
                .find_player(id)
                .map(|p| FormState::player(Some(p), store.teams())),
            Entity::Match => store
                .find_match(id)
                .map(|m| FormState::fixture(Some(m), store.teams())),
        };
        match form {
            Some(form) => self.open_form(form),
            None => self.missing_row(entity),
        }
    }

    pub fn open_result(&mut self, id: i64) -> Vec<NetworkRequest> {
        match self.state.store.find_match(id).map(FormState::result) {
            Some(form) => self.open_form(form),
            None => self.missing_row(Entity::Match),
        }
    }

    pub fn open_settings(&mut self) {
        self.state.modal = Some(FormState::settings(self.state.store.settings()));
    }

    pub fn delete(&mut self, entity: Entity, id: i64) {
        let request = match entity {
            Entity::Team => NetworkRequest::DeleteTeam { id },
            Entity::Player => NetworkRequest::DeletePlayer { id },
            Entity::Match => NetworkRequest::DeleteMatch { id },
        };
        self.state.push_dialog(Dialog::Confirm {
            message: format!("Are you sure you want to delete this {}?", entity.noun()),
            request,
        });
    }

    pub fn close_modal(&mut self) {
        self.state.modal = None;
    }

    fn open_form(&mut self, form: FormState) -> Vec<NetworkRequest> {
        let needs_teams = matches!(form.kind, FormKind::Player | FormKind::Match)
            && self.state.store.teams().is_empty();
        self.state.modal = Some(form);
        if needs_teams {
            vec![NetworkRequest::LoadTeams]
        } else {
            Vec::new()
        }
    }

    fn missing_row(&mut self, entity: Entity) -> Vec<NetworkRequest> {
        self.state.push_dialog(Dialog::error(format!(
            "{} is no longer loaded. Refreshing the list.",
            entity.label()
        )));
        vec![load_request(entity)]
    }

    /// Builds the request for the open form. Invalid input raises an alert
    /// and nothing is sent.
    pub fn submit_form(&mut self) -> Vec<NetworkRequest> {
        let Some(form) = self.state.modal.as_ref() else {
            return Vec::new();
        };
        let id = form.edit_id();
        let request = match form.kind {
            FormKind::Team => form
                .team_payload()
                .map(|(team, logo)| NetworkRequest::SaveTeam { id, team, logo }),
            FormKind::Player => form
                .player_payload()
                .map(|player| NetworkRequest::SavePlayer { id, player }),
            FormKind::Match => form
                .match_payload()
                .map(|fixture| NetworkRequest::SaveMatch { id, fixture }),
            FormKind::Result => form.result_payload().and_then(|result| {
                id.map(|id| NetworkRequest::SaveMatchResult { id, result })
                    .ok_or_else(|| "No match selected".to_string())
            }),
            FormKind::Settings => form
                .settings_payload()
                .map(|settings| NetworkRequest::SaveSettings { settings }),
            FormKind::Login => return self.submit_login(),
        };
        match request {
            Ok(request) => vec![request],
            Err(message) => {
                self.state.push_dialog(Dialog::error(message));
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Bulk selection
    // -----------------------------------------------------------------------

    pub fn toggle_player_at_cursor(&mut self) {
        if let Some((Entity::Player, id)) = self.selected_id() {
            self.state.store.toggle_player(id);
        }
    }

    pub fn toggle_all_players(&mut self) {
        self.state.store.toggle_all_players();
    }

    pub fn bulk_delete(&mut self) {
        let ids = self.state.store.selection().ids();
        if ids.is_empty() {
            self.state.push_dialog(Dialog::error("No players selected"));
            return;
        }
        self.state.push_dialog(Dialog::Confirm {
            message: format!(
                "Are you sure you want to delete {} player(s)? This action cannot be undone.",
                ids.len()
            ),
            request: NetworkRequest::BulkDeletePlayers { ids },
        });
    }

    // -----------------------------------------------------------------------
    // Dialogs and session
    // -----------------------------------------------------------------------

    /// Closes the front dialog. A confirmed `Confirm` yields its request.
    pub fn answer_dialog(&mut self, accepted: bool) -> Vec<NetworkRequest> {
        match self.state.dismiss_dialog() {
            Some(Dialog::Confirm { request, .. }) if accepted => vec![request],
            _ => Vec::new(),
        }
    }

    pub fn submit_login(&mut self) -> Vec<NetworkRequest> {
        match self.state.login.form.login_credentials() {
            Ok((username, password)) => {
                self.state.login.message = None;
                vec![NetworkRequest::Login { username, password }]
            }
            Err(message) => {
                self.state.login.message = Some(message);
                Vec::new()
            }
        }
    }

    pub fn logout(&mut self) -> Vec<NetworkRequest> {
        vec![NetworkRequest::Logout]
    }

    /// The form keystrokes go to: the login form or the open modal.
    pub fn active_form(&mut self) -> Option<&mut FormState> {
        match self.state.screen {
            Screen::Login => Some(&mut self.state.login.form),
            Screen::Admin => self.state.modal.as_mut(),
            Screen::Connecting => None,
        }
    }
}
