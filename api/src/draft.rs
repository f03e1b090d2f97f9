use crate::outcome::{Outcome, Side, compute_outcome, compute_outcome_from_text};
use crate::scoreboard::Matchup;
use crate::{AttendanceRecord, GameStatus, ScheduleEntry, Team, team_name};
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use std::fmt;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Language of the weekday abbreviation in record dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayLocale {
    #[default]
    Korean,
    English,
}

impl DisplayLocale {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ko" | "ko-kr" | "ko_kr" => Some(DisplayLocale::Korean),
            "en" | "en-us" | "en_us" => Some(DisplayLocale::English),
            _ => None,
        }
    }

    pub fn weekday(&self, day: Weekday) -> &'static str {
        match self {
            DisplayLocale::Korean => match day {
                Weekday::Mon => "월",
                Weekday::Tue => "화",
                Weekday::Wed => "수",
                Weekday::Thu => "목",
                Weekday::Fri => "금",
                Weekday::Sat => "토",
                Weekday::Sun => "일",
            },
            DisplayLocale::English => match day {
                Weekday::Mon => "Mon",
                Weekday::Tue => "Tue",
                Weekday::Wed => "Wed",
                Weekday::Thu => "Thu",
                Weekday::Fri => "Fri",
                Weekday::Sat => "Sat",
                Weekday::Sun => "Sun",
            },
        }
    }
}

/// Result used for a finished game when the user's team played on neither side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NeutralFallback {
    /// Score the game from the home side, the side the draft defaults to.
    #[default]
    HomePerspective,
    /// Missing scores count as 0; level scores are a DRAW, anything else a WIN.
    Legacy,
}

impl NeutralFallback {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "home" | "home-perspective" => Some(NeutralFallback::HomePerspective),
            "legacy" => Some(NeutralFallback::Legacy),
            _ => None,
        }
    }

    fn resolve(&self, away_score: Option<i32>, home_score: Option<i32>) -> Outcome {
        match self {
            NeutralFallback::HomePerspective => compute_outcome(Side::Home, away_score, home_score),
            NeutralFallback::Legacy => {
                if away_score.unwrap_or(0) == home_score.unwrap_or(0) {
                    Outcome::Draw
                } else {
                    Outcome::Win
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DraftOptions {
    pub locale: DisplayLocale,
    pub neutral_fallback: NeutralFallback,
}

// ---------------------------------------------------------------------------
// Schedule-to-draft mapping
// ---------------------------------------------------------------------------

/// An unsaved record, as shown in the new-record form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftRecord {
    pub date: String, // "YYYY-MM-DD (Weekday)"
    pub away_team: String,
    pub home_team: String,
    pub stadium: String,
    pub away_score: String, // form text; empty until played
    pub home_score: String,
    pub my_side: Side,
    pub result: Outcome,
    pub seat: String,
}

impl DraftRecord {
    pub fn matchup(&self) -> Matchup {
        Matchup::new(self.away_team.clone(), self.home_team.clone())
    }
}

/// `2025-05-05` → `2025-05-05 (월)`. Dates that do not parse pass through.
pub fn format_display_date(date: &str, locale: DisplayLocale) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(day) => format!("{} ({})", day.format("%Y-%m-%d"), locale.weekday(day.weekday())),
        Err(_) => date.to_string(),
    }
}

/// Which side `team` plays on in `entry`, if either.
pub fn side_of(entry: &ScheduleEntry, team: &Team) -> Option<Side> {
    if entry.home_team_id == team.id {
        Some(Side::Home)
    } else if entry.away_team_id == team.id {
        Some(Side::Away)
    } else {
        None
    }
}

/// Pre-fill a draft from a schedule entry and the user's team.
pub fn draft_from_schedule(
    entry: &ScheduleEntry,
    selected_team: Option<&Team>,
    options: &DraftOptions,
) -> DraftRecord {
    let affiliation = selected_team.and_then(|team| side_of(entry, team));
    let my_side = affiliation.unwrap_or(Side::Home);

    let (away_score, home_score, result) = if entry.status == GameStatus::Scheduled {
        (String::new(), String::new(), Outcome::Scheduled)
    } else {
        let result = match affiliation {
            Some(side) => compute_outcome(side, entry.away_score, entry.home_score),
            None => options.neutral_fallback.resolve(entry.away_score, entry.home_score),
        };
        (score_text(entry.away_score), score_text(entry.home_score), result)
    };

    DraftRecord {
        date: format_display_date(&entry.date, options.locale),
        away_team: team_name(&entry.away_team_id),
        home_team: team_name(&entry.home_team_id),
        stadium: entry.stadium.clone(),
        away_score,
        home_score,
        my_side,
        result,
        seat: String::new(),
    }
}

fn score_text(score: Option<i32>) -> String {
    score.map(|s| s.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Draft edit session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DraftPhase {
    #[default]
    Empty,
    AutoFilled,
    Saved,
    Discarded,
}

impl DraftPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DraftPhase::Saved | DraftPhase::Discarded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Date,
    Teams,
    Stadium,
}

impl DraftField {
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Date => "date",
            DraftField::Teams => "teams",
            DraftField::Stadium => "stadium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// No game has been picked yet.
    NotFilled,
    /// The session already ended in Saved or Discarded.
    Closed(DraftPhase),
    MissingField(DraftField),
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::NotFilled => write!(f, "Pick a game first"),
            DraftError::Closed(phase) => write!(f, "Draft already closed ({phase:?})"),
            DraftError::MissingField(field) => write!(f, "Missing required field: {}", field.label()),
        }
    }
}

impl std::error::Error for DraftError {}

/// One pass through the new-record form.
///
/// `Empty → AutoFilled` on picking a game, edits keep it `AutoFilled`, and it
/// ends in `Saved` or `Discarded`. Nothing returns to `Empty`.
#[derive(Debug, Clone, Default)]
pub struct DraftSession {
    phase: DraftPhase,
    draft: DraftRecord,
    options: DraftOptions,
}

impl DraftSession {
    pub fn new(options: DraftOptions) -> Self {
        Self { options, ..Self::default() }
    }

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    pub fn options(&self) -> &DraftOptions {
        &self.options
    }

    pub fn draft(&self) -> Option<&DraftRecord> {
        match self.phase {
            DraftPhase::Empty | DraftPhase::Discarded => None,
            DraftPhase::AutoFilled | DraftPhase::Saved => Some(&self.draft),
        }
    }

    /// Fill (or refill) the form from a schedule entry. The seat survives a re-pick.
    pub fn select_entry(
        &mut self,
        entry: &ScheduleEntry,
        selected_team: Option<&Team>,
    ) -> Result<(), DraftError> {
        if self.phase.is_terminal() {
            return Err(DraftError::Closed(self.phase));
        }
        let seat = std::mem::take(&mut self.draft.seat);
        self.draft = DraftRecord { seat, ..draft_from_schedule(entry, selected_team, &self.options) };
        self.phase = DraftPhase::AutoFilled;
        Ok(())
    }

    pub fn set_side(&mut self, side: Side) -> Result<(), DraftError> {
        self.ensure_editable()?;
        self.draft.my_side = side;
        self.rederive_result();
        Ok(())
    }

    pub fn toggle_side(&mut self) -> Result<(), DraftError> {
        let side = self.draft.my_side.opposite();
        self.set_side(side)
    }

    pub fn set_away_score(&mut self, text: impl Into<String>) -> Result<(), DraftError> {
        self.ensure_editable()?;
        self.draft.away_score = text.into();
        self.rederive_result();
        Ok(())
    }

    pub fn set_home_score(&mut self, text: impl Into<String>) -> Result<(), DraftError> {
        self.ensure_editable()?;
        self.draft.home_score = text.into();
        self.rederive_result();
        Ok(())
    }

    pub fn set_seat(&mut self, seat: impl Into<String>) -> Result<(), DraftError> {
        self.ensure_editable()?;
        self.draft.seat = seat.into();
        Ok(())
    }

    /// Build the record to persist. The session stays `AutoFilled` until the
    /// store confirms with [`DraftSession::mark_saved`].
    pub fn submission(&self, user_id: &str, now: DateTime<Utc>) -> Result<AttendanceRecord, DraftError> {
        self.ensure_editable()?;
        let d = &self.draft;

        let missing = [
            (d.date.trim().is_empty(), DraftField::Date),
            (d.away_team.trim().is_empty() || d.home_team.trim().is_empty(), DraftField::Teams),
            (d.stadium.trim().is_empty(), DraftField::Stadium),
        ];
        if let Some((_, field)) = missing.iter().find(|(is_missing, _)| *is_missing) {
            return Err(DraftError::MissingField(*field));
        }

        let score = if d.result == Outcome::Scheduled {
            String::new()
        } else {
            format!("{}:{}", d.away_score.trim(), d.home_score.trim())
        };

        Ok(AttendanceRecord {
            id: String::new(),
            user_id: user_id.to_string(),
            date: d.date.clone(),
            matchup: d.matchup().to_string(),
            result: d.result,
            score,
            stadium: d.stadium.clone(),
            seat: d.seat.clone(),
            my_side: d.my_side,
            created_at: Some(now),
        })
    }

    pub fn mark_saved(&mut self) -> Result<(), DraftError> {
        self.ensure_editable()?;
        self.phase = DraftPhase::Saved;
        Ok(())
    }

    pub fn discard(&mut self) -> Result<(), DraftError> {
        if self.phase.is_terminal() {
            return Err(DraftError::Closed(self.phase));
        }
        self.phase = DraftPhase::Discarded;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), DraftError> {
        match self.phase {
            DraftPhase::AutoFilled => Ok(()),
            DraftPhase::Empty => Err(DraftError::NotFilled),
            phase => Err(DraftError::Closed(phase)),
        }
    }

    /// Empty or non-numeric score text counts as unplayed.
    fn rederive_result(&mut self) {
        let d = &mut self.draft;
        d.result = compute_outcome_from_text(d.my_side, &d.away_score, &d.home_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team_by_id;
    use chrono::TimeZone;

    fn finished(home: &str, away: &str, home_score: Option<i32>, away_score: Option<i32>) -> ScheduleEntry {
        ScheduleEntry {
            id: "g1".into(),
            date: "2025-05-05".into(),
            time: "14:00".into(),
            home_team_id: home.into(),
            away_team_id: away.into(),
            stadium: "잠실 야구장".into(),
            home_score,
            away_score,
            status: GameStatus::Finished,
        }
    }

    fn scheduled() -> ScheduleEntry {
        ScheduleEntry {
            status: GameStatus::Scheduled,
            home_score: None,
            away_score: None,
            ..finished("lg", "kia", None, None)
        }
    }

    #[test]
    fn display_date_uses_locale_weekday() {
        // 2025-05-05 was a Monday.
        assert_eq!(format_display_date("2025-05-05", DisplayLocale::Korean), "2025-05-05 (월)");
        assert_eq!(format_display_date("2025-05-05", DisplayLocale::English), "2025-05-05 (Mon)");
        assert_eq!(format_display_date("someday", DisplayLocale::Korean), "someday");
    }

    #[test]
    fn away_fan_sees_a_loss() {
        let entry = finished("lg", "kia", Some(5), Some(3));
        let draft = draft_from_schedule(&entry, team_by_id("kia"), &DraftOptions::default());
        assert_eq!(draft.my_side, Side::Away);
        assert_eq!(draft.result, Outcome::Lose);
        assert_eq!(draft.away_score, "3");
        assert_eq!(draft.home_score, "5");
    }

    #[test]
    fn home_fan_sees_a_win() {
        let entry = finished("lg", "kia", Some(5), Some(3));
        let draft = draft_from_schedule(&entry, team_by_id("lg"), &DraftOptions::default());
        assert_eq!(draft.my_side, Side::Home);
        assert_eq!(draft.result, Outcome::Win);
        assert_eq!(draft.home_team, "LG 트윈스");
        assert_eq!(draft.away_team, "KIA 타이거즈");
    }

    #[test]
    fn scheduled_game_is_scheduled_for_everyone() {
        for team in [team_by_id("lg"), team_by_id("kia"), team_by_id("nc"), None] {
            let draft = draft_from_schedule(&scheduled(), team, &DraftOptions::default());
            assert_eq!(draft.result, Outcome::Scheduled);
            assert!(draft.home_score.is_empty() && draft.away_score.is_empty());
        }
    }

    #[test]
    fn unknown_team_ids_pass_through() {
        let entry = finished("yankees", "kia", Some(1), Some(2));
        let draft = draft_from_schedule(&entry, None, &DraftOptions::default());
        assert_eq!(draft.home_team, "yankees");
    }

    #[test]
    fn neutral_fan_defaults_to_home_perspective() {
        let entry = finished("lg", "kia", Some(2), Some(6));
        let draft = draft_from_schedule(&entry, team_by_id("nc"), &DraftOptions::default());
        assert_eq!(draft.my_side, Side::Home);
        assert_eq!(draft.result, Outcome::Lose);
    }

    #[test]
    fn legacy_neutral_fallback_reports_win_or_draw() {
        let options = DraftOptions { neutral_fallback: NeutralFallback::Legacy, ..Default::default() };
        let lost = finished("lg", "kia", Some(2), Some(6));
        assert_eq!(draft_from_schedule(&lost, team_by_id("nc"), &options).result, Outcome::Win);
        let level = finished("lg", "kia", Some(4), Some(4));
        assert_eq!(draft_from_schedule(&level, None, &options).result, Outcome::Draw);
    }

    #[test]
    fn canceled_game_without_scores_is_scheduled_for_fans() {
        let mut entry = finished("lg", "kia", None, None);
        entry.status = GameStatus::Canceled;
        let draft = draft_from_schedule(&entry, team_by_id("lg"), &DraftOptions::default());
        assert_eq!(draft.result, Outcome::Scheduled);
    }

    #[test]
    fn session_starts_empty_and_rejects_edits() {
        let mut session = DraftSession::new(DraftOptions::default());
        assert_eq!(session.phase(), DraftPhase::Empty);
        assert!(session.draft().is_none());
        assert_eq!(session.set_side(Side::Away), Err(DraftError::NotFilled));
    }

    #[test]
    fn side_and_score_edits_rederive_result() {
        let mut session = DraftSession::new(DraftOptions::default());
        session
            .select_entry(&finished("lg", "kia", Some(5), Some(3)), team_by_id("lg"))
            .unwrap();
        assert_eq!(session.draft().unwrap().result, Outcome::Win);

        session.set_side(Side::Away).unwrap();
        assert_eq!(session.draft().unwrap().result, Outcome::Lose);

        session.set_away_score("5").unwrap();
        assert_eq!(session.draft().unwrap().result, Outcome::Draw);

        session.set_home_score("").unwrap();
        assert_eq!(session.draft().unwrap().result, Outcome::Scheduled);
        assert_eq!(session.phase(), DraftPhase::AutoFilled);

        session.set_home_score("2").unwrap();
        assert_eq!(session.draft().unwrap().result, Outcome::Win);
    }

    #[test]
    fn non_numeric_score_saves_as_scheduled() {
        let mut session = DraftSession::new(DraftOptions::default());
        session
            .select_entry(&finished("lg", "kia", Some(5), Some(3)), team_by_id("lg"))
            .unwrap();
        session.set_home_score("abc").unwrap();
        let record = session.submission("u1", Utc::now()).unwrap();
        assert_eq!(record.result, Outcome::Scheduled);
        assert_eq!(record.score, "");

        session.set_home_score("5").unwrap();
        session.set_away_score("").unwrap();
        let record = session.submission("u1", Utc::now()).unwrap();
        assert_eq!(record.result, Outcome::Scheduled);
        assert_eq!(record.score, "");
    }

    #[test]
    fn side_change_on_unplayed_game_stays_scheduled() {
        let mut session = DraftSession::new(DraftOptions::default());
        session.select_entry(&scheduled(), team_by_id("lg")).unwrap();
        session.toggle_side().unwrap();
        assert_eq!(session.draft().unwrap().result, Outcome::Scheduled);
    }

    #[test]
    fn reselecting_keeps_seat() {
        let mut session = DraftSession::new(DraftOptions::default());
        session.select_entry(&scheduled(), None).unwrap();
        session.set_seat("3루 응원석").unwrap();
        session
            .select_entry(&finished("lg", "kia", Some(1), Some(0)), team_by_id("kia"))
            .unwrap();
        let draft = session.draft().unwrap();
        assert_eq!(draft.seat, "3루 응원석");
        assert_eq!(draft.result, Outcome::Lose);
    }

    #[test]
    fn submission_builds_storage_record() {
        let mut session = DraftSession::new(DraftOptions::default());
        session
            .select_entry(&finished("lg", "kia", Some(5), Some(3)), team_by_id("kia"))
            .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 12, 0, 0).unwrap();
        let record = session.submission("u1", now).unwrap();
        assert_eq!(record.matchup, "KIA 타이거즈 vs LG 트윈스");
        assert_eq!(record.score, "3:5");
        assert_eq!(record.result, Outcome::Lose);
        assert_eq!(record.my_side, Side::Away);
        assert_eq!(record.date, "2025-05-05 (월)");
        assert_eq!(record.created_at, Some(now));
        assert_eq!(session.phase(), DraftPhase::AutoFilled);
    }

    #[test]
    fn scheduled_submission_has_empty_score() {
        let mut session = DraftSession::new(DraftOptions::default());
        session.select_entry(&scheduled(), team_by_id("kia")).unwrap();
        let record = session.submission("u1", Utc::now()).unwrap();
        assert_eq!(record.score, "");
        assert_eq!(record.result, Outcome::Scheduled);
    }

    #[test]
    fn submission_requires_stadium() {
        let mut entry = finished("lg", "kia", Some(5), Some(3));
        entry.stadium = String::new();
        let mut session = DraftSession::new(DraftOptions::default());
        session.select_entry(&entry, None).unwrap();
        assert_eq!(
            session.submission("u1", Utc::now()),
            Err(DraftError::MissingField(DraftField::Stadium))
        );
    }

    #[test]
    fn terminal_states_are_final() {
        let mut session = DraftSession::new(DraftOptions::default());
        session.select_entry(&scheduled(), None).unwrap();
        session.mark_saved().unwrap();
        assert_eq!(session.phase(), DraftPhase::Saved);
        assert!(session.select_entry(&scheduled(), None).is_err());
        assert!(session.discard().is_err());

        let mut other = DraftSession::new(DraftOptions::default());
        other.discard().unwrap();
        assert_eq!(other.phase(), DraftPhase::Discarded);
        assert_eq!(other.set_seat("x"), Err(DraftError::Closed(DraftPhase::Discarded)));
    }
}
