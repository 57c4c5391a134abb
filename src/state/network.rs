use crate::state::messages::{LoadTarget, Mutation, NetworkRequest, NetworkResponse};
use crate::state::shared::{error_alert, mutation_error_text};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tourney_api::client::{ApiResult, TourneyApi};
use tourney_api::payload::{MatchPayload, PlayerPayload, TeamPayload};
use tourney_api::{MatchId, MutationReceipt, PlayerId, TeamId};

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Success alert text plus an optional follow-up warning.
type MutationOutcome = (String, Option<String>);

/// Executes requests one at a time, so two mutations never overlap.
pub struct NetworkWorker {
    client: TourneyApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: TourneyApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let response = self.handle(request).await;

            debug!("network request complete");
            self.stop_loading_animation(!response.is_failure()).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle(&self, request: NetworkRequest) -> NetworkResponse {
        match request {
            NetworkRequest::CheckAuth => NetworkResponse::AuthChecked {
                status: self.client.check_auth().await,
            },
            NetworkRequest::Login { username, password } => {
                self.handle_login(&username, &password).await
            }
            NetworkRequest::Logout => {
                if let Err(e) = self.client.logout().await {
                    warn!("logout failed: {e}");
                }
                NetworkResponse::LoggedOut
            }
            NetworkRequest::LoadStats => loaded(
                LoadTarget::Stats,
                self.client
                    .fetch_stats()
                    .await
                    .map(|stats| NetworkResponse::StatsLoaded { stats }),
            ),
            NetworkRequest::LoadAll => {
                let (stats, settings) =
                    tokio::join!(self.client.fetch_stats(), self.client.fetch_settings());
                NetworkResponse::Batch(vec![
                    loaded(LoadTarget::Stats, stats.map(|stats| NetworkResponse::StatsLoaded { stats })),
                    loaded(
                        LoadTarget::Settings,
                        settings.map(|settings| NetworkResponse::SettingsLoaded { settings }),
                    ),
                ])
            }
            NetworkRequest::LoadTeams => loaded(
                LoadTarget::Teams,
                self.client
                    .fetch_teams()
                    .await
                    .map(|teams| NetworkResponse::TeamsLoaded { teams }),
            ),
            NetworkRequest::LoadPlayers => loaded(
                LoadTarget::Players,
                self.client
                    .fetch_players()
                    .await
                    .map(|players| NetworkResponse::PlayersLoaded { players }),
            ),
            NetworkRequest::LoadMatches => loaded(
                LoadTarget::Matches,
                self.client
                    .fetch_matches()
                    .await
                    .map(|matches| NetworkResponse::MatchesLoaded { matches }),
            ),
            NetworkRequest::LoadSettings => loaded(
                LoadTarget::Settings,
                self.client
                    .fetch_settings()
                    .await
                    .map(|settings| NetworkResponse::SettingsLoaded { settings }),
            ),
            NetworkRequest::SaveTeam { id, team, logo } => mutated(
                Mutation::SaveTeam,
                self.handle_save_team(id, &team, logo).await,
            ),
            NetworkRequest::DeleteTeam { id } => mutated(
                Mutation::DeleteTeam,
                self.client
                    .delete_team(id)
                    .await
                    .map(|receipt| deleted(receipt, "Team deleted successfully")),
            ),
            NetworkRequest::SavePlayer { id, player } => mutated(
                Mutation::SavePlayer,
                self.handle_save_player(id, &player).await,
            ),
            NetworkRequest::DeletePlayer { id } => mutated(
                Mutation::DeletePlayer,
                self.client
                    .delete_player(id)
                    .await
                    .map(|receipt| deleted(receipt, "Player deleted successfully")),
            ),
            NetworkRequest::BulkDeletePlayers { ids } => mutated(
                Mutation::BulkDeletePlayers,
                self.handle_bulk_delete(&ids).await,
            ),
            NetworkRequest::SaveMatch { id, fixture } => mutated(
                Mutation::SaveMatch,
                self.handle_save_match(id, &fixture).await,
            ),
            NetworkRequest::DeleteMatch { id } => mutated(
                Mutation::DeleteMatch,
                self.client
                    .delete_match(id)
                    .await
                    .map(|receipt| deleted(receipt, "Match deleted successfully")),
            ),
            NetworkRequest::SaveMatchResult { id, result } => mutated(
                Mutation::SaveMatchResult,
                self.client
                    .update_match_result(id, &result)
                    .await
                    .map(|_| ("Result updated successfully".to_string(), None)),
            ),
            NetworkRequest::SaveSettings { settings } => mutated(
                Mutation::SaveSettings,
                self.client
                    .update_settings(&settings)
                    .await
                    .map(|_| ("Tournament settings updated successfully".to_string(), None)),
            ),
        }
    }

    async fn handle_login(&self, username: &str, password: &str) -> NetworkResponse {
        debug!("logging in as {username}");
        match self.client.login(username, password).await {
            Ok(_) => NetworkResponse::AuthChecked {
                status: self.client.check_auth().await,
            },
            Err(e) => {
                warn!("login failed: {e}");
                let message = match e.backend_message() {
                    Some(msg) => error_alert(msg),
                    None => "Login failed. Please try again.".to_string(),
                };
                NetworkResponse::LoginFailed { message }
            }
        }
    }

    /// Save the team, then upload the logo against the new or edited id.
    /// A failed upload does not undo the save; it comes back as a warning.
    async fn handle_save_team(
        &self,
        id: Option<TeamId>,
        team: &TeamPayload,
        logo: Option<PathBuf>,
    ) -> ApiResult<MutationOutcome> {
        let receipt = match id {
            Some(id) => self.client.update_team(id, team).await?,
            None => self.client.create_team(team).await?,
        };
        let message = if id.is_some() {
            "Team updated successfully"
        } else {
            "Team created successfully"
        };

        let Some(logo) = logo else {
            return Ok((message.to_string(), None));
        };

        let warning = match receipt.team_id.or(id) {
            Some(team_id) => match self.client.upload_team_logo(team_id, &logo).await {
                Ok(_) => {
                    info!("uploaded logo for team {team_id}");
                    None
                }
                Err(e) => {
                    warn!("logo upload for team {team_id} failed: {e}");
                    Some(format!("Team saved, but logo upload failed: {e}"))
                }
            },
            None => Some("Team saved, but logo upload skipped: no team id returned".to_string()),
        };
        Ok((message.to_string(), warning))
    }

    async fn handle_save_player(
        &self,
        id: Option<PlayerId>,
        player: &PlayerPayload,
    ) -> ApiResult<MutationOutcome> {
        match id {
            Some(id) => {
                self.client.update_player(id, player).await?;
                Ok(("Player updated successfully".to_string(), None))
            }
            None => {
                self.client.create_player(player).await?;
                Ok(("Player created successfully".to_string(), None))
            }
        }
    }

    async fn handle_bulk_delete(&self, ids: &[PlayerId]) -> ApiResult<MutationOutcome> {
        debug!("bulk deleting {} players", ids.len());
        let receipt = self.client.bulk_delete_players(ids).await?;
        let message = receipt
            .message
            .unwrap_or_else(|| format!("{} player(s) deleted successfully", ids.len()));
        Ok((message, None))
    }

    async fn handle_save_match(
        &self,
        id: Option<MatchId>,
        fixture: &MatchPayload,
    ) -> ApiResult<MutationOutcome> {
        match id {
            Some(id) => {
                self.client.update_match(id, fixture).await?;
                Ok(("Match updated successfully".to_string(), None))
            }
            None => {
                self.client.create_match(fixture).await?;
                Ok(("Match created successfully".to_string(), None))
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

fn deleted(receipt: MutationReceipt, fallback: &str) -> MutationOutcome {
    (receipt.message.unwrap_or_else(|| fallback.to_string()), None)
}

fn loaded(target: LoadTarget, result: ApiResult<NetworkResponse>) -> NetworkResponse {
    result.unwrap_or_else(|e| {
        error!("Failed to load {target:?}: {e}");
        NetworkResponse::LoadFailed { target, message: e.to_string() }
    })
}

fn mutated(mutation: Mutation, result: ApiResult<MutationOutcome>) -> NetworkResponse {
    match result {
        Ok((message, warning)) => NetworkResponse::Mutated { mutation, message, warning },
        Err(e) => {
            error!("{mutation:?} failed: {e}");
            NetworkResponse::MutationFailed {
                mutation,
                message: mutation_error_text(&e, mutation.fallback_error(), mutation.transport_error()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    /// Run one request through a worker and return the first non-spinner reply.
    async fn round_trip(server: &Server, request: NetworkRequest) -> NetworkResponse {
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        let worker = NetworkWorker::new(
            TourneyApi::new().with_base_url(server.url()),
            req_rx,
            resp_tx,
        );
        let task = tokio::spawn(worker.run());
        req_tx.send(request).await.unwrap();

        let mut reply = None;
        while let Some(response) = resp_rx.recv().await {
            if !matches!(response, NetworkResponse::LoadingStateChanged { .. }) {
                reply = Some(response);
                break;
            }
        }
        task.abort();
        reply.expect("worker replied")
    }

    #[tokio::test]
    async fn bulk_delete_reports_backend_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/players/bulk-delete")
            .match_body(Matcher::Json(json!({"player_ids": [2, 5, 9]})))
            .with_body(r#"{"message": "Deleted 3 players"}"#)
            .expect(1)
            .create_async()
            .await;

        let response = round_trip(&server, NetworkRequest::BulkDeletePlayers { ids: vec![2, 5, 9] }).await;
        mock.assert_async().await;
        match response {
            NetworkResponse::Mutated { mutation, message, warning } => {
                assert_eq!(mutation, Mutation::BulkDeletePlayers);
                assert_eq!(message, "Deleted 3 players");
                assert!(warning.is_none());
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_delete_uses_backend_error() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/api/teams/4")
            .with_status(403)
            .with_body(r#"{"error": "Admin access required"}"#)
            .create_async()
            .await;

        match round_trip(&server, NetworkRequest::DeleteTeam { id: 4 }).await {
            NetworkResponse::MutationFailed { mutation, message } => {
                assert_eq!(mutation, Mutation::DeleteTeam);
                assert_eq!(message, "Error: Admin access required");
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn logo_failure_is_a_warning_not_an_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/teams")
            .with_status(201)
            .with_body(r#"{"message": "Team created successfully", "team_id": 11}"#)
            .create_async()
            .await;
        let upload = server
            .mock("POST", "/api/teams/11/logo")
            .with_status(400)
            .with_body(r#"{"error": "Invalid file type"}"#)
            .create_async()
            .await;

        let logo = std::env::temp_dir().join("tourney-admin-logo-test.bmp");
        std::fs::write(&logo, b"BM").unwrap();
        let request = NetworkRequest::SaveTeam {
            id: None,
            team: TeamPayload { name: "Falcons".into(), ..Default::default() },
            logo: Some(logo.clone()),
        };
        let response = round_trip(&server, request).await;
        let _ = std::fs::remove_file(&logo);
        upload.assert_async().await;

        match response {
            NetworkResponse::Mutated { message, warning, .. } => {
                assert_eq!(message, "Team created successfully");
                let warning = warning.expect("upload failure surfaces");
                assert!(warning.starts_with("Team saved, but logo upload failed"));
                assert!(warning.contains("Invalid file type"));
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn edited_team_logo_uses_edited_id() {
        let mut server = Server::new_async().await;
        server
            .mock("PUT", "/api/teams/6")
            .with_body(r#"{"message": "Team updated successfully"}"#)
            .create_async()
            .await;
        let upload = server
            .mock("POST", "/api/teams/6/logo")
            .with_body(r#"{"message": "Logo uploaded successfully"}"#)
            .create_async()
            .await;

        let logo = std::env::temp_dir().join("tourney-admin-logo-edit.png");
        std::fs::write(&logo, b"png").unwrap();
        let request = NetworkRequest::SaveTeam {
            id: Some(6),
            team: TeamPayload { name: "Hawks".into(), ..Default::default() },
            logo: Some(logo.clone()),
        };
        let response = round_trip(&server, request).await;
        let _ = std::fs::remove_file(&logo);
        upload.assert_async().await;
        assert!(matches!(
            response,
            NetworkResponse::Mutated { warning: None, .. }
        ));
    }

    #[tokio::test]
    async fn failed_list_load_is_reported_not_alerted() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/matches")
            .with_status(500)
            .create_async()
            .await;

        let response = round_trip(&server, NetworkRequest::LoadMatches).await;
        assert!(matches!(
            response,
            NetworkResponse::LoadFailed { target: LoadTarget::Matches, .. }
        ));
    }

    #[tokio::test]
    async fn startup_load_fetches_lists_and_settings_together() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/teams")
            .with_body(r#"[{"id": 1, "name": "Falcons"}]"#)
            .create_async()
            .await;
        server.mock("GET", "/api/players").with_body("[]").create_async().await;
        server.mock("GET", "/api/matches").with_body("[]").create_async().await;
        server
            .mock("GET", "/api/tournament/settings")
            .with_status(500)
            .create_async()
            .await;

        let response = round_trip(&server, NetworkRequest::LoadAll).await;
        assert!(response.is_failure());
        let NetworkResponse::Batch(replies) = response else {
            panic!("unexpected response {response:?}");
        };
        assert!(matches!(
            &replies[0],
            NetworkResponse::StatsLoaded { stats } if stats.counts() == (1, 0, 0)
        ));
        assert!(matches!(
            replies[1],
            NetworkResponse::LoadFailed { target: LoadTarget::Settings, .. }
        ));
    }

    #[tokio::test]
    async fn rejected_login_shows_backend_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_body(r#"{"error": "Invalid username or password"}"#)
            .create_async()
            .await;

        let request = NetworkRequest::Login { username: "admin".into(), password: "nope".into() };
        match round_trip(&server, request).await {
            NetworkResponse::LoginFailed { message } => {
                assert_eq!(message, "Error: Invalid username or password");
            }
            other => panic!("unexpected response {other:?}"),
        }
    }
}
