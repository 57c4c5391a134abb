use crate::payload::{
    BulkDeletePayload, LoginPayload, MatchPayload, MatchResultPayload, PlayerPayload, TeamPayload,
};
use crate::{
    AuthStatus, Match, MatchId, MutationReceipt, Player, PlayerId, Stats, Team, TeamId,
    TournamentSettings,
};
use futures_util::future::try_join3;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the tournament backend's REST API.
///
/// One `reqwest::Client` with a cookie store is shared by every call, so the
/// session cookie issued by `/api/auth/login` rides along on later requests.
#[derive(Debug, Clone)]
pub struct TourneyApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for TourneyApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("tourney-admin/0.1 (terminal admin console)")
                .cookie_store(true)
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    /// Non-2xx response. `message` is the body's `error` field when present.
    Api {
        status: u16,
        message: Option<String>,
        url: String,
    },
    Parsing(serde_json::Error, String),
    Io(std::io::Error, String),
}

impl ApiError {
    /// The backend-provided error text, if the server sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(..) | ApiError::Parsing(..) | ApiError::Io(..))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api { status, message: Some(msg), url } => {
                write!(f, "API error {status} for {url}: {msg}")
            }
            ApiError::Api { status, message: None, url } => write!(f, "API error {status} for {url}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Io(e, path) => write!(f, "Could not read {path}: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl TourneyApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Query the session. Any failure is reported as "not authenticated".
    pub async fn check_auth(&self) -> AuthStatus {
        match self.get::<AuthStatus>("/api/auth/check").await {
            Ok(status) => status,
            Err(e) => {
                warn!("auth check failed: {e}");
                AuthStatus::default()
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<MutationReceipt> {
        let body = LoginPayload {
            username: username.to_string(),
            password: password.to_string(),
            remember: false,
        };
        self.send_json(Method::POST, "/api/auth/login", &body).await
    }

    pub async fn logout(&self) -> ApiResult<MutationReceipt> {
        self.send_empty(Method::POST, "/api/auth/logout").await
    }

    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    pub async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
        self.get("/api/teams").await
    }

    pub async fn fetch_players(&self) -> ApiResult<Vec<Player>> {
        self.get("/api/players").await
    }

    pub async fn fetch_matches(&self) -> ApiResult<Vec<Match>> {
        self.get("/api/matches").await
    }

    /// Fetch all three collections concurrently.
    pub async fn fetch_stats(&self) -> ApiResult<Stats> {
        let (teams, players, matches) =
            try_join3(self.fetch_teams(), self.fetch_players(), self.fetch_matches()).await?;
        Ok(Stats { teams, players, matches })
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    pub async fn create_team(&self, team: &TeamPayload) -> ApiResult<MutationReceipt> {
        self.send_json(Method::POST, "/api/teams", team).await
    }

    pub async fn update_team(&self, id: TeamId, team: &TeamPayload) -> ApiResult<MutationReceipt> {
        self.send_json(Method::PUT, &format!("/api/teams/{id}"), team).await
    }

    pub async fn delete_team(&self, id: TeamId) -> ApiResult<MutationReceipt> {
        self.send_empty(Method::DELETE, &format!("/api/teams/{id}")).await
    }

    /// Multipart upload of a logo image under the `logo` part.
    pub async fn upload_team_logo(&self, id: TeamId, file: &Path) -> ApiResult<MutationReceipt> {
        let display = file.display().to_string();
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| ApiError::Io(e, display.clone()))?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .unwrap_or(display);
        let form = Form::new().part("logo", Part::bytes(bytes).file_name(file_name));

        let path = format!("/api/teams/{id}/logo");
        let url = self.url(&path);
        debug!("POST {url} (multipart)");
        let request = self.client.post(&url).multipart(form);
        self.execute(request, url).await
    }

    // -----------------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------------

    pub async fn create_player(&self, player: &PlayerPayload) -> ApiResult<MutationReceipt> {
        self.send_json(Method::POST, "/api/players", player).await
    }

    pub async fn update_player(
        &self,
        id: PlayerId,
        player: &PlayerPayload,
    ) -> ApiResult<MutationReceipt> {
        self.send_json(Method::PUT, &format!("/api/players/{id}"), player).await
    }

    pub async fn delete_player(&self, id: PlayerId) -> ApiResult<MutationReceipt> {
        self.send_empty(Method::DELETE, &format!("/api/players/{id}")).await
    }

    /// Delete many players in one call.
    pub async fn bulk_delete_players(&self, ids: &[PlayerId]) -> ApiResult<MutationReceipt> {
        let body = BulkDeletePayload { player_ids: ids.to_vec() };
        self.send_json(Method::POST, "/api/players/bulk-delete", &body).await
    }

    // -----------------------------------------------------------------------
    // Matches
    // -----------------------------------------------------------------------

    pub async fn create_match(&self, fixture: &MatchPayload) -> ApiResult<MutationReceipt> {
        self.send_json(Method::POST, "/api/matches", fixture).await
    }

    pub async fn update_match(
        &self,
        id: MatchId,
        fixture: &MatchPayload,
    ) -> ApiResult<MutationReceipt> {
        self.send_json(Method::PUT, &format!("/api/matches/{id}"), fixture).await
    }

    pub async fn delete_match(&self, id: MatchId) -> ApiResult<MutationReceipt> {
        self.send_empty(Method::DELETE, &format!("/api/matches/{id}")).await
    }

    pub async fn update_match_result(
        &self,
        id: MatchId,
        result: &MatchResultPayload,
    ) -> ApiResult<MutationReceipt> {
        self.send_json(Method::PUT, &format!("/api/matches/{id}/result"), result).await
    }

    // -----------------------------------------------------------------------
    // Tournament settings
    // -----------------------------------------------------------------------

    pub async fn fetch_settings(&self) -> ApiResult<TournamentSettings> {
        self.get("/api/tournament/settings").await
    }

    pub async fn update_settings(&self, settings: &TournamentSettings) -> ApiResult<MutationReceipt> {
        self.send_json(Method::PUT, "/api/tournament/settings", settings).await
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;
        let text = read_success(response, &url).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parsing(e, url))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<MutationReceipt> {
        let url = self.url(path);
        debug!("{method} {url}");
        let request = self.client.request(method, &url).json(body);
        self.execute(request, url).await
    }

    async fn send_empty(&self, method: Method, path: &str) -> ApiResult<MutationReceipt> {
        let url = self.url(path);
        debug!("{method} {url}");
        let request = self.client.request(method, &url);
        self.execute(request, url).await
    }

    async fn execute(&self, request: RequestBuilder, url: String) -> ApiResult<MutationReceipt> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;
        let text = read_success(response, &url).await?;
        parse_receipt(&text).map_err(|e| ApiError::Parsing(e, url))
    }
}

/// Return the body of a 2xx response, or an `ApiError::Api` carrying the
/// backend's `error` field.
async fn read_success(response: Response, url: &str) -> ApiResult<String> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e, url.to_owned()))?;

    if status.is_success() {
        return Ok(text);
    }

    Err(ApiError::Api {
        status: status.as_u16(),
        message: extract_error_message(&text),
        url: url.to_owned(),
    })
}

fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

fn parse_receipt(body: &str) -> Result<MutationReceipt, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(MutationReceipt::default());
    }
    serde_json::from_str(body)
}
