pub mod admin;
pub mod client;
pub mod draft;
pub mod outcome;
pub mod reconcile;
pub mod records;
pub mod schedule;
pub mod scoreboard;
pub mod store;

pub use outcome::{Outcome, Side, compute_outcome};
pub use scoreboard::{Matchup, ParseError, Score, parse_matchup, parse_score};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Team catalog (the ten KBO clubs)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    pub id: &'static str,
    pub name: &'static str,
    pub primary_color: &'static str,   // hex, "#RRGGBB"
    pub secondary_color: &'static str, // hex, "#RRGGBB"
    pub stadium: &'static str,         // home ballpark
}

pub static TEAMS: [Team; 10] = [
    Team {
        id: "kia",
        name: "KIA 타이거즈",
        primary_color: "#EA0029",
        secondary_color: "#05141F",
        stadium: "광주-기아 챔피언스 필드",
    },
    Team {
        id: "samsung",
        name: "삼성 라이온즈",
        primary_color: "#074CA1",
        secondary_color: "#FFFFFF",
        stadium: "대구 삼성 라이온즈 파크",
    },
    Team {
        id: "lg",
        name: "LG 트윈스",
        primary_color: "#C30452",
        secondary_color: "#000000",
        stadium: "잠실 야구장",
    },
    Team {
        id: "doosan",
        name: "두산 베어스",
        primary_color: "#131230",
        secondary_color: "#D2282F",
        stadium: "잠실 야구장",
    },
    Team {
        id: "kt",
        name: "KT 위즈",
        primary_color: "#000000",
        secondary_color: "#FF0000",
        stadium: "수원 KT 위즈 파크",
    },
    Team {
        id: "ssg",
        name: "SSG 랜더스",
        primary_color: "#CE0E2D",
        secondary_color: "#FFB81C",
        stadium: "인천 SSG 랜더스필드",
    },
    Team {
        id: "nc",
        name: "NC 다이노스",
        primary_color: "#315288",
        secondary_color: "#C7A079",
        stadium: "창원 NC 파크",
    },
    Team {
        id: "lotte",
        name: "롯데 자이언츠",
        primary_color: "#041E42",
        secondary_color: "#D00F31",
        stadium: "사직 야구장",
    },
    Team {
        id: "hanwha",
        name: "한화 이글스",
        primary_color: "#F37321",
        secondary_color: "#07111F",
        stadium: "한화생명 이글스파크",
    },
    Team {
        id: "kiwoom",
        name: "키움 히어로즈",
        primary_color: "#570514",
        secondary_color: "#A1A1A4",
        stadium: "고척 스카이돔",
    },
];

pub fn team_by_id(id: &str) -> Option<&'static Team> {
    TEAMS.iter().find(|t| t.id == id)
}

pub fn team_by_name(name: &str) -> Option<&'static Team> {
    TEAMS.iter().find(|t| t.name == name)
}

/// Display name for a team id. Unknown ids pass through unchanged.
pub fn team_name(id: &str) -> String {
    team_by_id(id)
        .map(|t| t.name.to_string())
        .unwrap_or_else(|| id.to_string())
}

// ---------------------------------------------------------------------------
// Schedule entries ("games" collection)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Scheduled,
    Playing,
    Finished,
    Canceled,
}

impl GameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "SCH",
            GameStatus::Playing => "LIVE",
            GameStatus::Finished => "FNL",
            GameStatus::Canceled => "CXL",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub date: String, // YYYY-MM-DD
    #[serde(default)]
    pub time: String, // HH:MM
    pub home_team_id: String,
    pub away_team_id: String,
    #[serde(default)]
    pub stadium: String,
    /// Present only once the game has concluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<i32>,
    #[serde(default)]
    pub status: GameStatus,
}

impl ScheduleEntry {
    pub fn year(&self) -> Option<i32> {
        self.date.split('-').next()?.parse().ok()
    }

    pub fn month(&self) -> Option<u32> {
        self.date.split('-').nth(1)?.parse().ok()
    }

    pub fn home_name(&self) -> String {
        team_name(&self.home_team_id)
    }

    pub fn away_name(&self) -> String {
        team_name(&self.away_team_id)
    }
}

// ---------------------------------------------------------------------------
// Attendance records ("records" collection)
// ---------------------------------------------------------------------------

/// A user's personal log of one attended game.
///
/// Legacy documents are read leniently: the side may be missing (reads as
/// HOME) or stored under `mySide`, and unknown result labels read as
/// SCHEDULED.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub date: String,    // "YYYY-MM-DD (Weekday)"
    pub matchup: String, // "Away vs Home"
    #[serde(default)]
    pub result: Outcome,
    #[serde(default)]
    pub score: String, // "Away:Home", empty until played
    #[serde(default)]
    pub stadium: String,
    #[serde(default)]
    pub seat: String,
    #[serde(rename = "myTeamSide", alias = "mySide", default)]
    pub my_side: Side,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// The `YYYY-MM-DD` part of the display date.
    pub fn date_key(&self) -> &str {
        records::date_key(&self.date)
    }

    pub fn matchup(&self) -> Matchup {
        parse_matchup(&self.matchup)
    }
}

/// Fields the detail screen writes back after an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub seat: String,
    #[serde(rename = "myTeamSide")]
    pub my_side: Side,
    pub result: Outcome,
}

impl RecordPatch {
    pub fn from_record(record: &AttendanceRecord) -> Self {
        Self {
            seat: record.seat.clone(),
            my_side: record.my_side,
            result: record.result,
        }
    }

    pub fn apply(&self, record: &mut AttendanceRecord) {
        record.seat = self.seat.clone();
        record.my_side = self.my_side;
        record.result = self.result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_ten_unique_teams() {
        let mut ids: Vec<&str> = TEAMS.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn team_lookup_by_id_and_name() {
        assert_eq!(team_by_id("lg").map(|t| t.name), Some("LG 트윈스"));
        assert_eq!(team_by_name("KIA 타이거즈").map(|t| t.id), Some("kia"));
        assert!(team_by_id("yankees").is_none());
    }

    #[test]
    fn unknown_team_name_falls_back_to_id() {
        assert_eq!(team_name("hanwha"), "한화 이글스");
        assert_eq!(team_name("yankees"), "yankees");
    }

    #[test]
    fn schedule_entry_reads_camel_case_document() {
        let raw = r#"{
            "id": "g1",
            "date": "2025-05-05",
            "time": "14:00",
            "homeTeamId": "doosan",
            "awayTeamId": "lg",
            "stadium": "잠실 야구장",
            "homeScore": 3,
            "awayScore": 7,
            "status": "finished"
        }"#;
        let entry: ScheduleEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.status, GameStatus::Finished);
        assert_eq!(entry.home_score, Some(3));
        assert_eq!(entry.year(), Some(2025));
        assert_eq!(entry.month(), Some(5));
    }

    #[test]
    fn unplayed_entry_omits_scores_when_written() {
        let entry = ScheduleEntry {
            date: "2026-03-23".into(),
            time: "14:00".into(),
            home_team_id: "lotte".into(),
            away_team_id: "nc".into(),
            stadium: "사직 야구장".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("homeScore").is_none());
        assert!(json.get("id").is_none());
        assert_eq!(json["status"], "scheduled");
    }

    #[test]
    fn legacy_record_without_side_reads_as_home() {
        let raw = r#"{
            "userId": "u1",
            "date": "2024-04-01 (월)",
            "matchup": "LG 트윈스 vs 한화 이글스",
            "result": "WIN",
            "score": "2:5",
            "stadium": "한화생명 이글스파크",
            "seat": "101"
        }"#;
        let record: AttendanceRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.my_side, Side::Home);
        assert_eq!(record.date_key(), "2024-04-01");
    }

    #[test]
    fn record_accepts_my_side_alias_and_unknown_result() {
        let raw = r#"{
            "date": "2024-04-01 (월)",
            "matchup": "a vs b",
            "result": "VS",
            "mySide": "AWAY"
        }"#;
        let record: AttendanceRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.my_side, Side::Away);
        assert_eq!(record.result, Outcome::Scheduled);
    }

    #[test]
    fn record_writes_team_side_field() {
        let record = AttendanceRecord {
            date: "2025-06-12 (목)".into(),
            matchup: "KIA 타이거즈 vs 삼성 라이온즈".into(),
            result: Outcome::Lose,
            score: "1:4".into(),
            my_side: Side::Away,
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["myTeamSide"], "AWAY");
        assert_eq!(json["result"], "LOSE");
        assert!(json.get("mySide").is_none());
    }

    #[test]
    fn patch_applies_only_edited_fields() {
        let mut record = AttendanceRecord {
            seat: "old".into(),
            score: "3:5".into(),
            result: Outcome::Win,
            ..Default::default()
        };
        let patch = RecordPatch {
            seat: "new".into(),
            my_side: Side::Away,
            result: Outcome::Lose,
        };
        patch.apply(&mut record);
        assert_eq!(record.seat, "new");
        assert_eq!(record.score, "3:5");
        assert_eq!(record.result, Outcome::Lose);
    }
}
