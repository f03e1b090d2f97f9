use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use ticketbook_api::client::{ApiError, SortOrder, TicketApi};
use ticketbook_api::{AttendanceRecord, RecordPatch, ScheduleEntry};
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Owns the store client and runs requests one at a time, in arrival order.
pub struct NetworkWorker {
    api: TicketApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        api: TicketApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            api,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let is_create = matches!(request, NetworkRequest::CreateRecord { .. });
            let result = match request {
                NetworkRequest::SignIn => self.handle_sign_in().await,
                NetworkRequest::SignInAdmin { email, password } => {
                    self.handle_sign_in_admin(email, password).await
                }
                NetworkRequest::LoadGames => self.handle_load_games().await,
                NetworkRequest::LoadRecords => self.handle_load_records().await,
                NetworkRequest::CreateRecord { record } => self.handle_create_record(record).await,
                NetworkRequest::UpdateRecord { id, patch } => self.handle_update_record(id, patch).await,
                NetworkRequest::DeleteRecord { id } => self.handle_delete_record(id).await,
                NetworkRequest::SaveGame { entry } => self.handle_save_game(entry).await,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| {
                let message = err.to_string();
                if is_create {
                    NetworkResponse::RecordCreateFailed { message }
                } else {
                    NetworkResponse::Error { message }
                }
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_sign_in(&mut self) -> Result<NetworkResponse, ApiError> {
        debug!("signing in anonymously");
        let session = self.api.sign_in_anonymously().await?;
        info!("signed in as {}", session.uid);
        Ok(NetworkResponse::SignedIn { session })
    }

    async fn handle_sign_in_admin(&mut self, email: String, password: String) -> Result<NetworkResponse, ApiError> {
        debug!("signing in as admin {email}");
        let session = self.api.sign_in_admin(&email, &password).await?;
        info!("admin session for {}", session.uid);
        Ok(NetworkResponse::SignedIn { session })
    }

    async fn handle_load_games(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading schedule");
        let games = self.api.list_games(SortOrder::Ascending).await?;
        Ok(NetworkResponse::GamesLoaded { games })
    }

    async fn handle_load_records(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading records");
        let records = self.api.list_records().await?;
        Ok(NetworkResponse::RecordsLoaded { records })
    }

    async fn handle_create_record(&self, record: AttendanceRecord) -> Result<NetworkResponse, ApiError> {
        debug!("creating record for {}", record.matchup);
        let id = self.api.create_record(&record).await?;
        Ok(NetworkResponse::RecordCreated { id })
    }

    async fn handle_update_record(&self, id: String, patch: RecordPatch) -> Result<NetworkResponse, ApiError> {
        debug!("updating record {id}");
        self.api.update_record(&id, &patch).await?;
        Ok(NetworkResponse::RecordUpdated { id, patch })
    }

    async fn handle_delete_record(&self, id: String) -> Result<NetworkResponse, ApiError> {
        debug!("deleting record {id}");
        self.api.delete_record(&id).await?;
        Ok(NetworkResponse::RecordDeleted { id })
    }

    async fn handle_save_game(&self, entry: ScheduleEntry) -> Result<NetworkResponse, ApiError> {
        debug!("saving game {} {} vs {}", entry.date, entry.away_team_id, entry.home_team_id);
        let id = self.api.save_game(&entry).await?;
        Ok(NetworkResponse::GameSaved { id })
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use ticketbook_api::{Outcome, Side};

    async fn next_payload(responses: &mut mpsc::Receiver<NetworkResponse>) -> NetworkResponse {
        loop {
            match responses.recv().await {
                Some(NetworkResponse::LoadingStateChanged { .. }) => continue,
                Some(other) => return other,
                None => panic!("worker hung up"),
            }
        }
    }

    #[tokio::test]
    async fn worker_serves_local_store_requests_in_order() {
        let dir = tempdir().unwrap();
        let (req_tx, req_rx) = mpsc::channel(10);
        let (resp_tx, mut resp_rx) = mpsc::channel(100);
        let worker = NetworkWorker::new(TicketApi::local(dir.path()), req_rx, resp_tx);
        let task = tokio::spawn(worker.run());

        req_tx.send(NetworkRequest::SignIn).await.unwrap();
        assert!(matches!(next_payload(&mut resp_rx).await, NetworkResponse::SignedIn { .. }));

        let record = AttendanceRecord {
            date: "2025-05-05 (월)".into(),
            matchup: "KIA 타이거즈 vs LG 트윈스".into(),
            result: Outcome::Lose,
            score: "3:5".into(),
            stadium: "잠실 야구장".into(),
            my_side: Side::Away,
            ..Default::default()
        };
        req_tx.send(NetworkRequest::CreateRecord { record }).await.unwrap();
        let NetworkResponse::RecordCreated { id } = next_payload(&mut resp_rx).await else {
            panic!("expected RecordCreated");
        };

        req_tx.send(NetworkRequest::LoadRecords).await.unwrap();
        let NetworkResponse::RecordsLoaded { records } = next_payload(&mut resp_rx).await else {
            panic!("expected RecordsLoaded");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);

        task.abort();
    }

    #[tokio::test]
    async fn failures_become_error_responses() {
        let dir = tempdir().unwrap();
        let (req_tx, req_rx) = mpsc::channel(10);
        let (resp_tx, mut resp_rx) = mpsc::channel(100);
        let task = tokio::spawn(NetworkWorker::new(TicketApi::local(dir.path()), req_rx, resp_tx).run());

        // No sign-in yet.
        req_tx.send(NetworkRequest::LoadRecords).await.unwrap();
        let NetworkResponse::Error { message } = next_payload(&mut resp_rx).await else {
            panic!("expected Error");
        };
        assert!(message.contains("not signed in"));

        let record = AttendanceRecord { date: "2025-05-05 (월)".into(), ..Default::default() };
        req_tx.send(NetworkRequest::CreateRecord { record }).await.unwrap();
        let NetworkResponse::RecordCreateFailed { message } = next_payload(&mut resp_rx).await else {
            panic!("expected RecordCreateFailed");
        };
        assert!(message.contains("not signed in"));

        task.abort();
    }
}
