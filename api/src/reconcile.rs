use crate::outcome::{Outcome, Side, compute_outcome};
use crate::scoreboard::parse_score;
use crate::AttendanceRecord;

/// A user's edit of a saved record. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEdit {
    pub new_side: Option<Side>,
    pub new_seat: Option<String>,
}

impl RecordEdit {
    pub fn side(side: Side) -> Self {
        Self { new_side: Some(side), new_seat: None }
    }

    pub fn seat(seat: impl Into<String>) -> Self {
        Self { new_side: None, new_seat: Some(seat.into()) }
    }
}

/// Apply `edit` to a copy of `existing`, re-deriving the result when the
/// cheering side changes. A score that cannot be parsed keeps the old result.
pub fn reconcile(existing: &AttendanceRecord, edit: &RecordEdit) -> AttendanceRecord {
    let mut updated = existing.clone();

    if let Some(side) = edit.new_side
        && side != existing.my_side
    {
        updated.result = recompute_result(side, &existing.score, existing.result);
        updated.my_side = side;
    }

    if let Some(seat) = &edit.new_seat {
        updated.seat = seat.clone();
    }

    updated
}

fn recompute_result(side: Side, score: &str, current: Outcome) -> Outcome {
    if current == Outcome::Scheduled && score.trim().is_empty() {
        return Outcome::Scheduled;
    }
    match parse_score(score) {
        Ok(s) => compute_outcome(side, Some(s.away), Some(s.home)),
        Err(_) => current,
    }
}
