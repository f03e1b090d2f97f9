use crate::records::sort_newest_first;
use crate::store::{LOCAL_USER_ID, LocalStore};
use crate::{AttendanceRecord, GameStatus, RecordPatch, ScheduleEntry};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Storage(String),
    Unauthorized(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Storage(msg) => write!(f, "Storage error: {msg}"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub token: Option<String>,
    pub admin: bool,
}

// ---------------------------------------------------------------------------
// Remote document store
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    uid: String,
    token: String,
}

#[derive(Deserialize)]
struct Created {
    id: String,
}

/// A pushed snapshot on the record subscription socket.
#[derive(Debug, Deserialize)]
pub struct RecordSnapshot {
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
}

pub fn parse_snapshot(text: &str) -> ApiResult<Vec<AttendanceRecord>> {
    let mut snapshot: RecordSnapshot = serde_json::from_str(text)
        .map_err(|e| ApiError::Other(format!("invalid record snapshot: {e}")))?;
    sort_newest_first(&mut snapshot.records);
    Ok(snapshot.records)
}

/// JSON-over-HTTP document store.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::Other(format!("invalid API url {base_url:?}: {e}")))?;
        Ok(Self {
            client: Client::builder()
                .user_agent("ticketbook/0.1 (terminal attendance log)")
                .build()
                .unwrap_or_default(),
            base_url,
            timeout: Duration::from_secs(10),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn url_with(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<String> {
        let raw = self.url(path);
        Url::parse_with_params(&raw, params)
            .map(String::from)
            .map_err(|e| ApiError::Other(format!("invalid url {raw}: {e}")))
    }

    async fn sign_in(&self, path: &str, credentials: Option<Credentials<'_>>) -> ApiResult<AuthResponse> {
        let url = self.url(path);
        let mut request = self.client.post(&url);
        if let Some(credentials) = &credentials {
            request = request.json(credentials);
        }
        let response = self.send(request, &url).await?;
        read_json(response, &url).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, token: Option<&str>) -> ApiResult<T> {
        let response = self.send(authorize(self.client.get(url), token), url).await?;
        read_json(response, url).await
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> ApiResult<Response> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ApiError::Unauthorized(format!("{} for {url}", response.status())))
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(url.to_owned())),
            _ => response
                .error_for_status()
                .map_err(|e| ApiError::Api(e, url.to_owned())),
        }
    }

    async fn list_games(&self, order: SortOrder, token: Option<&str>) -> ApiResult<Vec<ScheduleEntry>> {
        let url = self.url_with("/games", &[("orderBy", "date"), ("direction", order.as_param())])?;
        self.get(&url, token).await
    }

    async fn list_records(&self, user_id: &str, token: Option<&str>) -> ApiResult<Vec<AttendanceRecord>> {
        let url = self.url_with(
            "/records",
            &[("userId", user_id), ("orderBy", "createdAt"), ("direction", "desc")],
        )?;
        let mut records: Vec<AttendanceRecord> = self.get(&url, token).await?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn get_record(&self, id: &str, token: Option<&str>) -> ApiResult<AttendanceRecord> {
        self.get(&self.url(&format!("/records/{id}")), token).await
    }

    async fn create<T: Serialize>(&self, path: &str, body: &T, token: Option<&str>) -> ApiResult<String> {
        let url = self.url(path);
        let response = self
            .send(authorize(self.client.post(&url), token).json(body), &url)
            .await?;
        read_json::<Created>(response, &url).await.map(|c| c.id)
    }

    async fn patch<T: Serialize>(&self, path: &str, body: &T, token: Option<&str>) -> ApiResult<()> {
        let url = self.url(path);
        self.send(authorize(self.client.patch(&url), token).json(body), &url)
            .await
            .map(|_| ())
    }

    async fn delete(&self, path: &str, token: Option<&str>) -> ApiResult<()> {
        let url = self.url(path);
        self.send(authorize(self.client.delete(&url), token), &url)
            .await
            .map(|_| ())
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parsing(e, url.to_owned()))
}

/// `http://host/api` → `ws://host/api`, `https` → `wss`.
pub fn derive_ws_base(api_url: &str) -> String {
    let api_url = api_url.trim().trim_end_matches('/');
    if let Some(rest) = api_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = api_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        api_url.to_string()
    }
}

pub fn subscription_url(ws_base: &str, user_id: &str) -> ApiResult<String> {
    let raw = format!("{}/records/subscribe", ws_base.trim_end_matches('/'));
    Url::parse_with_params(&raw, &[("userId", user_id)])
        .map(String::from)
        .map_err(|e| ApiError::Other(format!("invalid subscription url {raw}: {e}")))
}

/// Game PATCH body. Missing scores go out as `null` so a remote store
/// clears them instead of keeping the old values.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameUpdate<'a> {
    date: &'a str,
    time: &'a str,
    home_team_id: &'a str,
    away_team_id: &'a str,
    stadium: &'a str,
    home_score: Option<i32>,
    away_score: Option<i32>,
    status: GameStatus,
}

impl<'a> From<&'a ScheduleEntry> for GameUpdate<'a> {
    fn from(entry: &'a ScheduleEntry) -> Self {
        GameUpdate {
            date: &entry.date,
            time: &entry.time,
            home_team_id: &entry.home_team_id,
            away_team_id: &entry.away_team_id,
            stadium: &entry.stadium,
            home_score: entry.home_score,
            away_score: entry.away_score,
            status: entry.status,
        }
    }
}

// ---------------------------------------------------------------------------
// TicketApi: the persistence collaborator the app talks to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Backend {
    Local(LocalStore),
    Remote(RemoteStore),
}

#[derive(Debug, Clone)]
pub struct TicketApi {
    backend: Backend,
    session: Option<Session>,
}

impl TicketApi {
    pub fn local(data_dir: impl AsRef<Path>) -> Self {
        Self {
            backend: Backend::Local(LocalStore::new(data_dir)),
            session: None,
        }
    }

    pub fn remote(base_url: &str) -> ApiResult<Self> {
        Ok(Self {
            backend: Backend::Remote(RemoteStore::new(base_url)?),
            session: None,
        })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.backend, Backend::Remote(_))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub async fn sign_in_anonymously(&mut self) -> ApiResult<Session> {
        let session = match &self.backend {
            Backend::Local(_) => local_session(false),
            Backend::Remote(remote) => {
                let auth = remote.sign_in("/auth/anonymous", None).await?;
                Session { uid: auth.uid, token: Some(auth.token), admin: false }
            }
        };
        self.session = Some(session.clone());
        Ok(session)
    }

    pub async fn sign_in_admin(&mut self, email: &str, password: &str) -> ApiResult<Session> {
        let session = match &self.backend {
            Backend::Local(_) => local_session(true),
            Backend::Remote(remote) => {
                if email.trim().is_empty() || password.is_empty() {
                    return Err(ApiError::Unauthorized("admin email and password are required".into()));
                }
                let credentials = Credentials { email: email.trim(), password };
                let auth = remote.sign_in("/auth/login", Some(credentials)).await?;
                Session { uid: auth.uid, token: Some(auth.token), admin: true }
            }
        };
        self.session = Some(session.clone());
        Ok(session)
    }

    pub async fn list_games(&self, order: SortOrder) -> ApiResult<Vec<ScheduleEntry>> {
        match &self.backend {
            Backend::Local(local) => local.list_games(order),
            Backend::Remote(remote) => remote.list_games(order, self.token()).await,
        }
    }

    /// Records of the signed-in user, newest first.
    pub async fn list_records(&self) -> ApiResult<Vec<AttendanceRecord>> {
        let session = self.require_session()?;
        match &self.backend {
            Backend::Local(local) => local.list_records(&session.uid),
            Backend::Remote(remote) => remote.list_records(&session.uid, self.token()).await,
        }
    }

    pub async fn get_record(&self, id: &str) -> ApiResult<AttendanceRecord> {
        let session = self.require_session()?;
        match &self.backend {
            Backend::Local(local) => local.get_record(&session.uid, id),
            Backend::Remote(remote) => remote.get_record(id, self.token()).await,
        }
    }

    /// Store a new record for the signed-in user, returning its id.
    pub async fn create_record(&self, record: &AttendanceRecord) -> ApiResult<String> {
        let session = self.require_session()?;
        let record = AttendanceRecord {
            id: String::new(),
            user_id: session.uid.clone(),
            ..record.clone()
        };
        match &self.backend {
            Backend::Local(local) => local.create_record(&record),
            Backend::Remote(remote) => remote.create("/records", &record, self.token()).await,
        }
    }

    pub async fn update_record(&self, id: &str, patch: &RecordPatch) -> ApiResult<()> {
        let session = self.require_session()?;
        match &self.backend {
            Backend::Local(local) => local.update_record(&session.uid, id, patch),
            Backend::Remote(remote) => remote.patch(&format!("/records/{id}"), patch, self.token()).await,
        }
    }

    pub async fn delete_record(&self, id: &str) -> ApiResult<()> {
        let session = self.require_session()?;
        match &self.backend {
            Backend::Local(local) => local.delete_record(&session.uid, id),
            Backend::Remote(remote) => remote.delete(&format!("/records/{id}"), self.token()).await,
        }
    }

    pub async fn create_game(&self, entry: &ScheduleEntry) -> ApiResult<String> {
        self.require_admin()?;
        let entry = ScheduleEntry { id: String::new(), ..entry.clone() };
        match &self.backend {
            Backend::Local(local) => local.create_game(&entry),
            Backend::Remote(remote) => remote.create("/games", &entry, self.token()).await,
        }
    }

    pub async fn update_game(&self, id: &str, entry: &ScheduleEntry) -> ApiResult<()> {
        self.require_admin()?;
        match &self.backend {
            Backend::Local(local) => {
                let entry = ScheduleEntry { id: String::new(), ..entry.clone() };
                local.update_game(id, &entry)
            }
            Backend::Remote(remote) => {
                remote
                    .patch(&format!("/games/{id}"), &GameUpdate::from(entry), self.token())
                    .await
            }
        }
    }

    /// Create when `entry.id` is empty, update otherwise. Returns the id.
    pub async fn save_game(&self, entry: &ScheduleEntry) -> ApiResult<String> {
        if entry.id.is_empty() {
            self.create_game(entry).await
        } else {
            self.update_game(&entry.id, entry).await?;
            Ok(entry.id.clone())
        }
    }

    fn token(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.token.as_deref())
    }

    fn require_session(&self) -> ApiResult<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| ApiError::Unauthorized("not signed in".into()))
    }

    fn require_admin(&self) -> ApiResult<&Session> {
        let session = self.require_session()?;
        if !session.admin {
            return Err(ApiError::Unauthorized("admin sign-in required".into()));
        }
        Ok(session)
    }
}

fn local_session(admin: bool) -> Session {
    Session {
        uid: LOCAL_USER_ID.to_string(),
        token: None,
        admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Outcome, Side};
    use mockito::Matcher;
    use tempfile::tempdir;

    fn sample_record() -> AttendanceRecord {
        AttendanceRecord {
            date: "2025-05-05 (월)".into(),
            matchup: "KIA 타이거즈 vs LG 트윈스".into(),
            result: Outcome::Lose,
            score: "3:5".into(),
            stadium: "잠실 야구장".into(),
            my_side: Side::Away,
            ..Default::default()
        }
    }

    async fn signed_in(server: &mockito::ServerGuard) -> TicketApi {
        let mut api = TicketApi::remote(&server.url()).unwrap();
        api.session = Some(Session { uid: "u1".into(), token: Some("tok".into()), admin: false });
        api
    }

    #[test]
    fn ws_base_follows_scheme() {
        assert_eq!(derive_ws_base("https://tickets.example/api/"), "wss://tickets.example/api");
        assert_eq!(derive_ws_base("http://localhost:8080"), "ws://localhost:8080");
        assert_eq!(
            subscription_url("ws://localhost:8080", "u 1").unwrap(),
            "ws://localhost:8080/records/subscribe?userId=u+1"
        );
    }

    #[test]
    fn snapshot_is_sorted_newest_first() {
        let raw = r#"{"records":[
            {"id":"a","date":"2025-04-01 (화)","matchup":"a vs b","createdAt":"2025-04-01T10:00:00Z"},
            {"id":"b","date":"2025-05-01 (목)","matchup":"a vs b","createdAt":"2025-05-01T10:00:00Z"}
        ]}"#;
        let records = parse_snapshot(raw).unwrap();
        assert_eq!(records[0].id, "b");
        assert!(parse_snapshot("nope").is_err());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(TicketApi::remote("not a url"), Err(ApiError::Other(_))));
    }

    #[tokio::test]
    async fn anonymous_sign_in_stores_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/anonymous")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"uid":"u1","token":"tok"}"#)
            .create_async()
            .await;

        let mut api = TicketApi::remote(&server.url()).unwrap();
        let session = api.sign_in_anonymously().await.unwrap();
        mock.assert_async().await;
        assert_eq!(session.uid, "u1");
        assert!(!session.admin);
        assert_eq!(api.token(), Some("tok"));
    }

    #[tokio::test]
    async fn admin_login_rejects_bad_credentials() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(serde_json::json!({"email":"a@b.c","password":"x"})))
            .with_status(401)
            .create_async()
            .await;

        let mut api = TicketApi::remote(&server.url()).unwrap();
        let err = api.sign_in_admin("a@b.c", "x").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert!(api.session().is_none());
    }

    #[tokio::test]
    async fn list_games_sends_order_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/games")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("orderBy".into(), "date".into()),
                Matcher::UrlEncoded("direction".into(), "desc".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":"g1","date":"2025-05-05","time":"14:00","homeTeamId":"lg",
                     "awayTeamId":"kia","stadium":"잠실 야구장","homeScore":5,"awayScore":3,
                     "status":"finished"}]"#,
            )
            .create_async()
            .await;

        let api = TicketApi::remote(&server.url()).unwrap();
        let games = api.list_games(SortOrder::Descending).await.unwrap();
        mock.assert_async().await;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].status, GameStatus::Finished);
    }

    #[tokio::test]
    async fn list_records_requires_session() {
        let server = mockito::Server::new_async().await;
        let api = TicketApi::remote(&server.url()).unwrap();
        assert!(matches!(api.list_records().await, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn list_records_filters_by_user_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/records")
            .match_query(Matcher::UrlEncoded("userId".into(), "u1".into()))
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"r1","date":"2024-04-01 (월)","matchup":"a vs b","result":"WIN"}]"#)
            .create_async()
            .await;

        let api = signed_in(&server).await;
        let records = api.list_records().await.unwrap();
        mock.assert_async().await;
        assert_eq!(records[0].result, Outcome::Win);
        assert_eq!(records[0].my_side, Side::Home);
    }

    #[tokio::test]
    async fn create_record_stamps_user_and_returns_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/records")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "userId": "u1",
                "myTeamSide": "AWAY",
                "result": "LOSE",
                "score": "3:5"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"r9"}"#)
            .create_async()
            .await;

        let api = signed_in(&server).await;
        let id = api.create_record(&sample_record()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(id, "r9");
    }

    #[tokio::test]
    async fn missing_record_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/records/zzz").with_status(404).create_async().await;

        let api = signed_in(&server).await;
        assert!(matches!(api.get_record("zzz").await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_and_delete_record() {
        let mut server = mockito::Server::new_async().await;
        let patch_mock = server
            .mock("PATCH", "/records/r1")
            .match_body(Matcher::Json(serde_json::json!({
                "seat": "외야",
                "myTeamSide": "HOME",
                "result": "WIN"
            })))
            .with_status(204)
            .create_async()
            .await;
        let delete_mock = server.mock("DELETE", "/records/r1").with_status(204).create_async().await;

        let api = signed_in(&server).await;
        let patch = RecordPatch { seat: "외야".into(), my_side: Side::Home, result: Outcome::Win };
        api.update_record("r1", &patch).await.unwrap();
        api.delete_record("r1").await.unwrap();
        patch_mock.assert_async().await;
        delete_mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_an_api_error() {
        let mut server = mockito::Server::new_async().await;
        server.mock("DELETE", "/records/r1").with_status(500).create_async().await;

        let api = signed_in(&server).await;
        assert!(matches!(api.delete_record("r1").await, Err(ApiError::Api(..))));
    }

    #[tokio::test]
    async fn game_writes_need_admin() {
        let server = mockito::Server::new_async().await;
        let api = signed_in(&server).await;
        let entry = ScheduleEntry { date: "2026-04-01".into(), ..Default::default() };
        assert!(matches!(api.save_game(&entry).await, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn game_update_clears_scores_with_nulls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/games/g1")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "homeTeamId": "lg",
                "homeScore": null,
                "awayScore": null,
                "status": "scheduled",
            })))
            .with_status(200)
            .create_async()
            .await;

        let mut api = signed_in(&server).await;
        api.session = Some(Session { uid: "u1".into(), token: Some("tok".into()), admin: true });
        let entry = ScheduleEntry {
            id: "g1".into(),
            date: "2026-04-01".into(),
            home_team_id: "lg".into(),
            away_team_id: "kia".into(),
            status: GameStatus::Scheduled,
            ..Default::default()
        };
        assert_eq!(api.save_game(&entry).await.unwrap(), "g1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn local_backend_round_trip() {
        let dir = tempdir().unwrap();
        let mut api = TicketApi::local(dir.path());
        assert!(!api.is_remote());

        let session = api.sign_in_anonymously().await.unwrap();
        assert_eq!(session.uid, LOCAL_USER_ID);

        let id = api.create_record(&sample_record()).await.unwrap();
        let records = api.list_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].user_id, LOCAL_USER_ID);

        api.sign_in_admin("", "").await.unwrap();
        let entry = ScheduleEntry {
            date: "2026-04-01".into(),
            time: "18:30".into(),
            home_team_id: "ssg".into(),
            away_team_id: "kiwoom".into(),
            stadium: "인천 SSG 랜더스필드".into(),
            ..Default::default()
        };
        let game_id = api.save_game(&entry).await.unwrap();
        let edited = ScheduleEntry { id: game_id.clone(), time: "14:00".into(), ..entry };
        assert_eq!(api.save_game(&edited).await.unwrap(), game_id);
        let games = api.list_games(SortOrder::Ascending).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].time, "14:00");
    }
}
