use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use ticketbook_api::client::Session;
use ticketbook_api::{AttendanceRecord, RecordPatch, ScheduleEntry};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    SignIn,
    SignInAdmin { email: String, password: String },
    LoadGames,
    LoadRecords,
    CreateRecord { record: AttendanceRecord },
    UpdateRecord { id: String, patch: RecordPatch },
    DeleteRecord { id: String },
    SaveGame { entry: ScheduleEntry },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    SignedIn { session: Session },
    GamesLoaded { games: Vec<ScheduleEntry> },
    RecordsLoaded { records: Vec<AttendanceRecord> },
    RecordCreated { id: String },
    RecordUpdated { id: String, patch: RecordPatch },
    RecordDeleted { id: String },
    GameSaved { id: String },
    /// A `CreateRecord` failed; the draft is still unsaved.
    RecordCreateFailed { message: String },
    Error { message: String },
}

/// Pushed by the record subscription socket.
#[derive(Debug, Clone)]
pub enum SubscriptionEvent {
    Connected,
    Disconnected,
    Snapshot(Vec<AttendanceRecord>),
    Error(String),
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
