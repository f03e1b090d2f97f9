use crate::client::{ApiError, ApiResult, SortOrder};
use crate::records::sort_newest_first;
use crate::schedule::sort_entries;
use crate::{AttendanceRecord, RecordPatch, ScheduleEntry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const LOCAL_USER_ID: &str = "local";
const STORE_FILE: &str = "store.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    records: Vec<AttendanceRecord>,
    #[serde(default)]
    games: Vec<ScheduleEntry>,
}

/// Single-file JSON document store for offline use.
///
/// Every call re-reads the file so edits from another process show up on the
/// next refresh. Writes replace the whole document.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list_games(&self, order: SortOrder) -> ApiResult<Vec<ScheduleEntry>> {
        let mut games = self.load()?.games;
        sort_entries(&mut games);
        if order == SortOrder::Descending {
            games.reverse();
        }
        Ok(games)
    }

    pub fn create_game(&self, entry: &ScheduleEntry) -> ApiResult<String> {
        let mut doc = self.load()?;
        let id = next_id("g");
        doc.games.push(ScheduleEntry { id: id.clone(), ..entry.clone() });
        self.save(&doc)?;
        Ok(id)
    }

    pub fn update_game(&self, id: &str, entry: &ScheduleEntry) -> ApiResult<()> {
        let mut doc = self.load()?;
        let slot = doc
            .games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("game {id}")))?;
        *slot = ScheduleEntry { id: id.to_string(), ..entry.clone() };
        self.save(&doc)
    }

    pub fn list_records(&self, user_id: &str) -> ApiResult<Vec<AttendanceRecord>> {
        let mut records: Vec<AttendanceRecord> = self
            .load()?
            .records
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    pub fn get_record(&self, user_id: &str, id: &str) -> ApiResult<AttendanceRecord> {
        self.load()?
            .records
            .into_iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .ok_or_else(|| ApiError::NotFound(format!("record {id}")))
    }

    pub fn create_record(&self, record: &AttendanceRecord) -> ApiResult<String> {
        let mut doc = self.load()?;
        let id = next_id("r");
        doc.records.push(AttendanceRecord { id: id.clone(), ..record.clone() });
        self.save(&doc)?;
        Ok(id)
    }

    pub fn update_record(&self, user_id: &str, id: &str, patch: &RecordPatch) -> ApiResult<()> {
        let mut doc = self.load()?;
        let record = owned_record(&mut doc, user_id, id)?;
        patch.apply(record);
        self.save(&doc)
    }

    pub fn delete_record(&self, user_id: &str, id: &str) -> ApiResult<()> {
        let mut doc = self.load()?;
        owned_record(&mut doc, user_id, id)?;
        doc.records.retain(|r| r.id != id);
        self.save(&doc)
    }

    fn load(&self) -> ApiResult<Document> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Document::default()),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| ApiError::Storage(format!("invalid {}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(ApiError::Storage(format!("could not read {}: {e}", self.path.display()))),
        }
    }

    fn save(&self, doc: &Document) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ApiError::Storage(format!("could not create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| ApiError::Storage(format!("could not encode store: {e}")))?;

        // Write-then-rename.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| ApiError::Storage(format!("could not write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| ApiError::Storage(format!("could not replace {}: {e}", self.path.display())))
    }
}

fn owned_record<'a>(doc: &'a mut Document, user_id: &str, id: &str) -> ApiResult<&'a mut AttendanceRecord> {
    let record = doc
        .records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("record {id}")))?;
    if record.user_id != user_id {
        return Err(ApiError::Unauthorized(format!("record {id} belongs to another user")));
    }
    Ok(record)
}

fn next_id(prefix: &str) -> String {
    static SEQ: AtomicU32 = AtomicU32::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}{nanos:x}{seq:04x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameStatus, Outcome, Side};
    use tempfile::tempdir;

    fn record(user: &str) -> AttendanceRecord {
        AttendanceRecord {
            user_id: user.into(),
            date: "2025-05-05 (월)".into(),
            matchup: "KIA 타이거즈 vs LG 트윈스".into(),
            result: Outcome::Lose,
            score: "3:5".into(),
            stadium: "잠실 야구장".into(),
            seat: "1루".into(),
            my_side: Side::Away,
            created_at: None,
            ..Default::default()
        }
    }

    fn game(date: &str, time: &str) -> ScheduleEntry {
        ScheduleEntry {
            date: date.into(),
            time: time.into(),
            home_team_id: "lg".into(),
            away_team_id: "kia".into(),
            stadium: "잠실 야구장".into(),
            status: GameStatus::Scheduled,
            ..Default::default()
        }
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(store.list_games(SortOrder::Ascending).unwrap().is_empty());
        assert!(store.list_records(LOCAL_USER_ID).unwrap().is_empty());
    }

    #[test]
    fn record_crud_round_trip() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("nested"));

        let id = store.create_record(&record(LOCAL_USER_ID)).unwrap();
        let saved = store.get_record(LOCAL_USER_ID, &id).unwrap();
        assert_eq!(saved.id, id);
        assert_eq!(saved.score, "3:5");

        let patch = RecordPatch { seat: "외야".into(), my_side: Side::Home, result: Outcome::Win };
        store.update_record(LOCAL_USER_ID, &id, &patch).unwrap();
        let updated = store.get_record(LOCAL_USER_ID, &id).unwrap();
        assert_eq!(updated.result, Outcome::Win);
        assert_eq!(updated.seat, "외야");
        assert_eq!(updated.matchup, saved.matchup);

        store.delete_record(LOCAL_USER_ID, &id).unwrap();
        assert!(matches!(store.get_record(LOCAL_USER_ID, &id), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn records_are_scoped_to_their_owner() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let id = store.create_record(&record("someone-else")).unwrap();

        assert!(store.list_records(LOCAL_USER_ID).unwrap().is_empty());
        assert!(matches!(store.delete_record(LOCAL_USER_ID, &id), Err(ApiError::Unauthorized(_))));
        assert_eq!(store.list_records("someone-else").unwrap().len(), 1);
    }

    #[test]
    fn games_list_in_requested_order() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.create_game(&game("2025-05-06", "18:30")).unwrap();
        store.create_game(&game("2025-05-05", "18:30")).unwrap();
        store.create_game(&game("2025-05-05", "14:00")).unwrap();

        let asc: Vec<(String, String)> = store
            .list_games(SortOrder::Ascending)
            .unwrap()
            .into_iter()
            .map(|g| (g.date, g.time))
            .collect();
        assert_eq!(asc[0], ("2025-05-05".to_string(), "14:00".to_string()));
        assert_eq!(store.list_games(SortOrder::Descending).unwrap()[0].date, "2025-05-06");
    }

    #[test]
    fn update_game_keeps_id() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let id = store.create_game(&game("2025-05-05", "18:30")).unwrap();

        let finished = ScheduleEntry {
            home_score: Some(5),
            away_score: Some(3),
            status: GameStatus::Finished,
            ..game("2025-05-05", "18:30")
        };
        store.update_game(&id, &finished).unwrap();
        let games = store.list_games(SortOrder::Ascending).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, id);
        assert_eq!(games[0].status, GameStatus::Finished);

        assert!(matches!(store.update_game("nope", &finished), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.list_games(SortOrder::Ascending), Err(ApiError::Storage(_))));
    }
}
