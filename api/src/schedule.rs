use crate::records::date_key;
use crate::{AttendanceRecord, ScheduleEntry};
use std::collections::{BTreeSet, HashSet};

/// All games of one day, in start-time order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    pub date: String,
    pub entries: Vec<ScheduleEntry>,
}

pub fn sort_entries(entries: &mut [ScheduleEntry]) {
    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
}

/// Distinct years with games, descending. `current_year` is always offered.
pub fn available_years(entries: &[ScheduleEntry], current_year: i32) -> Vec<i32> {
    let mut years: BTreeSet<i32> = entries.iter().filter_map(ScheduleEntry::year).collect();
    years.insert(current_year);
    years.into_iter().rev().collect()
}

pub fn filter_year(entries: &[ScheduleEntry], year: i32) -> Vec<ScheduleEntry> {
    let prefix = year.to_string();
    entries
        .iter()
        .filter(|e| e.date.starts_with(&prefix))
        .cloned()
        .collect()
}

pub fn filter_month(entries: &[ScheduleEntry], month: u32) -> Vec<ScheduleEntry> {
    entries
        .iter()
        .filter(|e| e.month() == Some(month))
        .cloned()
        .collect()
}

pub fn months_in(entries: &[ScheduleEntry]) -> Vec<u32> {
    let months: BTreeSet<u32> = entries.iter().filter_map(ScheduleEntry::month).collect();
    months.into_iter().collect()
}

/// Keep `selected` when it still has games, else jump to the first month.
/// With no months at all the selection is left as is.
pub fn resolve_month(months: &[u32], selected: Option<u32>) -> Option<u32> {
    match (selected, months.first()) {
        (Some(m), _) if months.contains(&m) => Some(m),
        (_, Some(first)) => Some(*first),
        (selected, None) => selected,
    }
}

/// Consecutive runs of the same date. Expects sorted input.
pub fn group_by_date(entries: &[ScheduleEntry]) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();
    for entry in entries {
        match groups.last_mut() {
            Some(group) if group.date == entry.date => group.entries.push(entry.clone()),
            _ => groups.push(DateGroup {
                date: entry.date.clone(),
                entries: vec![entry.clone()],
            }),
        }
    }
    groups
}

/// Days the user already has a record for.
pub fn recorded_dates(records: &[AttendanceRecord]) -> HashSet<String> {
    records
        .iter()
        .map(|r| date_key(&r.date).to_string())
        .filter(|d| !d.is_empty())
        .collect()
}

pub fn is_recorded(entry: &ScheduleEntry, recorded: &HashSet<String>) -> bool {
    recorded.contains(&entry.date)
}
