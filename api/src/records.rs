use crate::AttendanceRecord;
use crate::outcome::Outcome;
use std::collections::BTreeSet;

/// `"2025-05-05 (월)"` → `"2025-05-05"`.
pub fn date_key(display_date: &str) -> &str {
    display_date.split(' ').next().unwrap_or(display_date)
}

pub fn record_year(record: &AttendanceRecord) -> Option<i32> {
    record.date_key().split('-').next()?.parse().ok()
}

/// Records of `year`, newest first. Records without a creation time sort
/// last, ties fall back to the game date.
pub fn records_for_year(records: &[AttendanceRecord], year: i32) -> Vec<AttendanceRecord> {
    let mut filtered: Vec<AttendanceRecord> = records
        .iter()
        .filter(|r| record_year(r) == Some(year))
        .cloned()
        .collect();
    sort_newest_first(&mut filtered);
    filtered
}

pub fn sort_newest_first(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.date_key().cmp(a.date_key()))
    });
}

/// Years that have at least one record, plus `current_year`, descending.
pub fn record_years(records: &[AttendanceRecord], current_year: i32) -> Vec<i32> {
    let mut years: BTreeSet<i32> = records.iter().filter_map(record_year).collect();
    years.insert(current_year);
    years.into_iter().rev().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub win: usize,
    pub lose: usize,
    pub draw: usize,
    pub scheduled: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.win + self.lose + self.draw + self.scheduled
    }

    /// Wins over decided games, `None` before any decided game.
    pub fn win_rate(&self) -> Option<f64> {
        let decided = self.win + self.lose + self.draw;
        (decided > 0).then(|| self.win as f64 / decided as f64)
    }
}

pub fn tally(records: &[AttendanceRecord]) -> Tally {
    records.iter().fold(Tally::default(), |mut t, r| {
        match r.result {
            Outcome::Win => t.win += 1,
            Outcome::Lose => t.lose += 1,
            Outcome::Draw => t.draw += 1,
            Outcome::Scheduled => t.scheduled += 1,
        }
        t
    })
}
