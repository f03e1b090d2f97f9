use crate::outcome::parse_score_text;
use crate::{GameStatus, ScheduleEntry, team_by_id};
use chrono::NaiveDate;
use std::fmt;

pub const GAME_TIMES: [&str; 3] = ["14:00", "17:00", "18:30"];
pub const DEFAULT_GAME_TIME: &str = "18:30";

pub const STADIUMS: [&str; 9] = [
    "잠실 야구장",
    "고척 스카이돔",
    "인천 SSG 랜더스필드",
    "수원 KT 위즈 파크",
    "한화생명 이글스파크",
    "대구 삼성 라이온즈 파크",
    "광주-기아 챔피언스 필드",
    "사직 야구장",
    "창원 NC 파크",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameFormError {
    MissingField(&'static str),
    InvalidDate(String),
    InvalidScore(String),
}

impl fmt::Display for GameFormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameFormError::MissingField(field) => write!(f, "{field} is required"),
            GameFormError::InvalidDate(raw) => write!(f, "Date must be YYYY-MM-DD, got {raw:?}"),
            GameFormError::InvalidScore(raw) => write!(f, "Score must be a number, got {raw:?}"),
        }
    }
}

impl std::error::Error for GameFormError {}

/// Editable copy of a schedule entry in the admin console.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameForm {
    pub id: Option<String>,
    pub date: String,
    pub time: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub stadium: String,
    pub home_score: String,
    pub away_score: String,
    status: GameStatus,
}

impl GameForm {
    pub fn new_entry(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: DEFAULT_GAME_TIME.to_string(),
            ..Self::default()
        }
    }

    pub fn from_entry(entry: &ScheduleEntry) -> Self {
        Self {
            id: (!entry.id.is_empty()).then(|| entry.id.clone()),
            date: entry.date.clone(),
            time: entry.time.clone(),
            home_team_id: entry.home_team_id.clone(),
            away_team_id: entry.away_team_id.clone(),
            stadium: entry.stadium.clone(),
            home_score: entry.home_score.map(|s| s.to_string()).unwrap_or_default(),
            away_score: entry.away_score.map(|s| s.to_string()).unwrap_or_default(),
            status: entry.status,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// New entries take the home club's ballpark; edits keep their stadium.
    pub fn set_home_team(&mut self, team_id: &str) {
        self.home_team_id = team_id.to_string();
        if self.is_new()
            && let Some(team) = team_by_id(team_id)
        {
            self.stadium = team.stadium.to_string();
        }
    }

    /// Step through [`GAME_TIMES`], wrapping around.
    pub fn cycle_time(&mut self) {
        let next = GAME_TIMES
            .iter()
            .position(|t| *t == self.time)
            .map(|i| (i + 1) % GAME_TIMES.len())
            .unwrap_or(0);
        self.time = GAME_TIMES[next].to_string();
    }

    pub fn validate(&self) -> Result<ScheduleEntry, GameFormError> {
        let required = [
            ("date", &self.date),
            ("time", &self.time),
            ("home team", &self.home_team_id),
            ("away team", &self.away_team_id),
            ("stadium", &self.stadium),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(GameFormError::MissingField(*field));
        }

        let date = self.date.trim();
        if !is_calendar_date(date) {
            return Err(GameFormError::InvalidDate(date.to_string()));
        }

        let home_score = score_field(&self.home_score)?;
        let away_score = score_field(&self.away_score)?;

        let status = match (home_score, away_score) {
            (Some(_), Some(_)) => GameStatus::Finished,
            _ if self.is_new() => GameStatus::Scheduled,
            _ => match self.status {
                GameStatus::Finished => GameStatus::Scheduled,
                other => other,
            },
        };

        Ok(ScheduleEntry {
            id: self.id.clone().unwrap_or_default(),
            date: date.to_string(),
            time: self.time.trim().to_string(),
            home_team_id: self.home_team_id.clone(),
            away_team_id: self.away_team_id.clone(),
            stadium: self.stadium.trim().to_string(),
            home_score,
            away_score,
            status,
        })
    }
}

/// `YYYY-MM-DD`, zero padded, naming a real day.
fn is_calendar_date(date: &str) -> bool {
    let shape_ok = date.len() == 10
        && date.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    shape_ok && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

fn score_field(text: &str) -> Result<Option<i32>, GameFormError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_score_text(text)
        .map(Some)
        .ok_or_else(|| GameFormError::InvalidScore(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> GameForm {
        let mut form = GameForm::new_entry("2026-04-01");
        form.set_home_team("ssg");
        form.away_team_id = "kiwoom".into();
        form
    }

    #[test]
    fn new_entry_defaults_to_evening_slot() {
        let form = GameForm::new_entry("2026-04-01");
        assert!(form.is_new());
        assert_eq!(form.time, DEFAULT_GAME_TIME);
    }

    #[test]
    fn home_team_prefills_stadium_for_new_entries() {
        let form = filled();
        assert_eq!(form.stadium, "인천 SSG 랜더스필드");

        let existing = ScheduleEntry {
            id: "g9".into(),
            stadium: "울산 문수 야구장".into(),
            ..Default::default()
        };
        let mut edit = GameForm::from_entry(&existing);
        edit.set_home_team("lotte");
        assert_eq!(edit.stadium, "울산 문수 야구장");
    }

    #[test]
    fn time_chips_cycle() {
        let mut form = filled();
        form.cycle_time();
        assert_eq!(form.time, "14:00");
        form.cycle_time();
        assert_eq!(form.time, "17:00");
        form.time = "11:00".into();
        form.cycle_time();
        assert_eq!(form.time, "14:00");
    }

    #[test]
    fn validate_reports_missing_field() {
        let mut form = filled();
        form.away_team_id.clear();
        assert_eq!(form.validate(), Err(GameFormError::MissingField("away team")));
    }

    #[test]
    fn validate_rejects_bad_dates() {
        let mut form = filled();
        for bad in ["2026-4-1", "2026/04/01", "2026-02-30", "26-04-01x"] {
            form.date = bad.into();
            assert!(matches!(form.validate(), Err(GameFormError::InvalidDate(_))), "{bad}");
        }
    }

    #[test]
    fn validate_rejects_non_numeric_score() {
        let mut form = filled();
        form.home_score = "five".into();
        assert_eq!(form.validate(), Err(GameFormError::InvalidScore("five".into())));
    }

    #[test]
    fn both_scores_finish_the_game() {
        let mut form = filled();
        let entry = form.validate().unwrap();
        assert_eq!(entry.status, GameStatus::Scheduled);
        assert_eq!(entry.home_score, None);

        form.home_score = "4".into();
        assert_eq!(form.validate().unwrap().status, GameStatus::Scheduled);

        form.away_score = "2".into();
        let entry = form.validate().unwrap();
        assert_eq!(entry.status, GameStatus::Finished);
        assert_eq!((entry.away_score, entry.home_score), (Some(2), Some(4)));
    }

    #[test]
    fn editing_keeps_canceled_status() {
        let existing = ScheduleEntry {
            id: "g2".into(),
            date: "2025-07-01".into(),
            time: "18:30".into(),
            home_team_id: "nc".into(),
            away_team_id: "lotte".into(),
            stadium: "창원 NC 파크".into(),
            status: GameStatus::Canceled,
            ..Default::default()
        };
        let entry = GameForm::from_entry(&existing).validate().unwrap();
        assert_eq!(entry.status, GameStatus::Canceled);
        assert_eq!(entry.id, "g2");
    }

    #[test]
    fn every_home_ballpark_is_a_stadium_choice() {
        for team in crate::TEAMS.iter() {
            assert!(STADIUMS.contains(&team.stadium), "{} missing from STADIUMS", team.stadium);
        }
    }
}
