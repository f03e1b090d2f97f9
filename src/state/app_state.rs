use crate::app::MenuItem;
use ticketbook_api::admin::{GameForm, STADIUMS};
use ticketbook_api::client::Session;
use ticketbook_api::draft::{DraftOptions, DraftSession};
use ticketbook_api::records::{record_years, records_for_year};
use ticketbook_api::reconcile::{RecordEdit, reconcile};
use ticketbook_api::schedule::{available_years, filter_month, filter_year, months_in, resolve_month, sort_entries};
use ticketbook_api::{AttendanceRecord, RecordPatch, ScheduleEntry, TEAMS};

// ---------------------------------------------------------------------------
// Single-line text input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub active: bool,
}

impl TextInput {
    pub fn start(&mut self, initial: &str) {
        self.value = initial.to_string();
        self.active = true;
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    /// Leave edit mode and hand back the text.
    pub fn finish(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.value)
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.value.clear();
    }
}

fn step(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (selected + 1).min(len - 1)
    } else {
        selected.saturating_sub(1)
    }
}

fn cycle<T: PartialEq + Copy>(options: &[T], current: T) -> Option<T> {
    let idx = options.iter().position(|o| *o == current).map(|i| i + 1).unwrap_or(0);
    options.get(idx % options.len().max(1)).copied()
}

// ---------------------------------------------------------------------------
// Records list
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecordsState {
    pub year: i32,
    pub selected: usize,
}

impl RecordsState {
    pub fn new(year: i32) -> Self {
        Self { year, selected: 0 }
    }

    pub fn visible(&self, records: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
        records_for_year(records, self.year)
    }

    pub fn cycle_year(&mut self, records: &[AttendanceRecord], current_year: i32) {
        if let Some(year) = cycle(&record_years(records, current_year), self.year) {
            self.year = year;
            self.selected = 0;
        }
    }

    pub fn move_selection(&mut self, records: &[AttendanceRecord], forward: bool) {
        self.selected = step(self.selected, self.visible(records).len(), forward);
    }

    pub fn selected_record(&self, records: &[AttendanceRecord]) -> Option<AttendanceRecord> {
        self.visible(records).into_iter().nth(self.selected)
    }

    pub fn clamp(&mut self, records: &[AttendanceRecord]) {
        let len = self.visible(records).len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Record detail
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecordDetailState {
    pub record: Option<AttendanceRecord>,
    pub seat: TextInput,
    pub confirm_delete: bool,
}

impl RecordDetailState {
    pub fn open(&mut self, record: AttendanceRecord) {
        self.record = Some(record);
        self.seat.cancel();
        self.confirm_delete = false;
    }

    pub fn close(&mut self) {
        self.record = None;
        self.seat.cancel();
        self.confirm_delete = false;
    }

    /// Patch for cheering the other side, with the result re-derived.
    pub fn toggle_side(&self) -> Option<(String, RecordPatch)> {
        let record = self.record.as_ref()?;
        self.patch_with(RecordEdit::side(record.my_side.opposite()))
    }

    pub fn begin_seat_edit(&mut self) {
        let seat = self.record.as_ref().map(|r| r.seat.clone()).unwrap_or_default();
        self.seat.start(&seat);
    }

    pub fn commit_seat(&mut self) -> Option<(String, RecordPatch)> {
        let seat = self.seat.finish();
        self.patch_with(RecordEdit::seat(seat))
    }

    fn patch_with(&self, edit: RecordEdit) -> Option<(String, RecordPatch)> {
        let record = self.record.as_ref()?;
        let updated = reconcile(record, &edit);
        (updated != *record).then(|| (record.id.clone(), RecordPatch::from_record(&updated)))
    }
}

// ---------------------------------------------------------------------------
// Schedule browser (also drives the new-record game picker)
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ScheduleState {
    pub year: i32,
    pub month: Option<u32>,
    pub selected: usize,
}

impl ScheduleState {
    pub fn new(year: i32) -> Self {
        Self { year, month: None, selected: 0 }
    }

    pub fn years(&self, games: &[ScheduleEntry], current_year: i32) -> Vec<i32> {
        available_years(games, current_year)
    }

    pub fn months(&self, games: &[ScheduleEntry]) -> Vec<u32> {
        months_in(&filter_year(games, self.year))
    }

    /// Re-point the month after the year or the schedule changed.
    pub fn sync(&mut self, games: &[ScheduleEntry]) {
        let months = self.months(games);
        self.month = resolve_month(&months, self.month);
        let len = self.visible(games).len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn visible(&self, games: &[ScheduleEntry]) -> Vec<ScheduleEntry> {
        let in_year = filter_year(games, self.year);
        let mut entries = match self.month {
            Some(month) => filter_month(&in_year, month),
            None => in_year,
        };
        sort_entries(&mut entries);
        entries
    }

    pub fn cycle_year(&mut self, games: &[ScheduleEntry], current_year: i32) {
        if let Some(year) = cycle(&self.years(games, current_year), self.year) {
            self.year = year;
            self.month = None;
            self.selected = 0;
            self.sync(games);
        }
    }

    pub fn shift_month(&mut self, games: &[ScheduleEntry], forward: bool) {
        let months = self.months(games);
        let Some(pos) = self.month.and_then(|m| months.iter().position(|x| *x == m)) else {
            return;
        };
        let next = if forward { (pos + 1).min(months.len() - 1) } else { pos.saturating_sub(1) };
        if next != pos {
            self.month = Some(months[next]);
            self.selected = 0;
        }
    }

    pub fn move_selection(&mut self, games: &[ScheduleEntry], forward: bool) {
        self.selected = step(self.selected, self.visible(games).len(), forward);
    }

    pub fn selected_entry(&self, games: &[ScheduleEntry]) -> Option<ScheduleEntry> {
        self.visible(games).into_iter().nth(self.selected)
    }

    /// Put the cursor on today's first game when the current month is shown.
    pub fn focus_date(&mut self, games: &[ScheduleEntry], date: &str) {
        if let Some(idx) = self.visible(games).iter().position(|e| e.date.as_str() >= date) {
            self.selected = idx;
        }
    }
}

// ---------------------------------------------------------------------------
// New record form
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DraftFocus {
    #[default]
    Picker,
    Side,
    AwayScore,
    HomeScore,
    Seat,
}

impl DraftFocus {
    pub fn next(self) -> Self {
        match self {
            DraftFocus::Picker => DraftFocus::Side,
            DraftFocus::Side => DraftFocus::AwayScore,
            DraftFocus::AwayScore => DraftFocus::HomeScore,
            DraftFocus::HomeScore => DraftFocus::Seat,
            DraftFocus::Seat => DraftFocus::Picker,
        }
    }
}

#[derive(Debug, Default)]
pub struct NewRecordState {
    pub session: DraftSession,
    pub picker: ScheduleState,
    pub focus: DraftFocus,
    pub input: TextInput,
    pub saving: bool,
    pub error: Option<String>,
}

impl NewRecordState {
    pub fn new(options: DraftOptions, year: i32) -> Self {
        Self {
            session: DraftSession::new(options),
            picker: ScheduleState::new(year),
            ..Self::default()
        }
    }

    /// Start over with an empty draft, keeping the picker position.
    pub fn reset(&mut self) {
        self.session = DraftSession::new(*self.session.options());
        self.focus = DraftFocus::Picker;
        self.input.cancel();
        self.saving = false;
        self.error = None;
    }
}

// ---------------------------------------------------------------------------
// Admin console
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AdminField {
    #[default]
    Date,
    Time,
    HomeTeam,
    AwayTeam,
    Stadium,
    HomeScore,
    AwayScore,
}

impl AdminField {
    pub const ALL: [AdminField; 7] = [
        AdminField::Date,
        AdminField::Time,
        AdminField::HomeTeam,
        AdminField::AwayTeam,
        AdminField::Stadium,
        AdminField::HomeScore,
        AdminField::AwayScore,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdminField::Date => "Date",
            AdminField::Time => "Time",
            AdminField::HomeTeam => "Home",
            AdminField::AwayTeam => "Away",
            AdminField::Stadium => "Stadium",
            AdminField::HomeScore => "Home score",
            AdminField::AwayScore => "Away score",
        }
    }

    /// Free-text fields; the rest cycle through fixed choices.
    pub fn is_text(&self) -> bool {
        matches!(self, AdminField::Date | AdminField::HomeScore | AdminField::AwayScore | AdminField::Stadium)
    }
}

#[derive(Debug, Default)]
pub struct AdminState {
    pub selected: usize,
    pub form: Option<GameForm>,
    pub focus: AdminField,
    pub input: TextInput,
    pub error: Option<String>,
}

impl AdminState {
    pub fn open(&mut self, form: GameForm) {
        self.form = Some(form);
        self.focus = AdminField::Date;
        self.input.cancel();
        self.error = None;
    }

    pub fn close(&mut self) {
        self.form = None;
        self.input.cancel();
        self.error = None;
    }

    pub fn move_focus(&mut self, forward: bool) {
        let pos = AdminField::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        let len = AdminField::ALL.len();
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        self.focus = AdminField::ALL[next];
    }

    pub fn field_value(&self, field: AdminField) -> String {
        let Some(form) = &self.form else {
            return String::new();
        };
        match field {
            AdminField::Date => form.date.clone(),
            AdminField::Time => form.time.clone(),
            AdminField::HomeTeam => form.home_team_id.clone(),
            AdminField::AwayTeam => form.away_team_id.clone(),
            AdminField::Stadium => form.stadium.clone(),
            AdminField::HomeScore => form.home_score.clone(),
            AdminField::AwayScore => form.away_score.clone(),
        }
    }

    pub fn begin_edit(&mut self) {
        if self.focus.is_text() {
            let value = self.field_value(self.focus);
            self.input.start(&value);
        }
    }

    pub fn commit_edit(&mut self) {
        let value = self.input.finish();
        let Some(form) = &mut self.form else {
            return;
        };
        match self.focus {
            AdminField::Date => form.date = value,
            AdminField::Stadium => form.stadium = value,
            AdminField::HomeScore => form.home_score = value,
            AdminField::AwayScore => form.away_score = value,
            AdminField::Time | AdminField::HomeTeam | AdminField::AwayTeam => {}
        }
    }

    /// Step the focused choice field (time chip, team, stadium) to its next option.
    pub fn cycle_choice(&mut self) {
        let focus = self.focus;
        let team_ids: Vec<&'static str> = TEAMS.iter().map(|t| t.id).collect();
        let current = self.field_value(focus);
        let Some(form) = &mut self.form else {
            return;
        };
        match focus {
            AdminField::Time => form.cycle_time(),
            AdminField::HomeTeam => {
                if let Some(next) = cycle(&team_ids, current.as_str()) {
                    form.set_home_team(next);
                }
            }
            AdminField::AwayTeam => {
                if let Some(next) = cycle(&team_ids, current.as_str()) {
                    form.away_team_id = next.to_string();
                }
            }
            AdminField::Stadium => {
                if let Some(next) = cycle(&STADIUMS, current.as_str()) {
                    form.stadium = next.to_string();
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Team picker (onboarding + settings)
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TeamPickerState {
    pub selected: usize,
}

impl TeamPickerState {
    pub fn point_at(&mut self, team_id: Option<&str>) {
        self.selected = team_id
            .and_then(|id| TEAMS.iter().position(|t| t.id == id))
            .unwrap_or(0);
    }

    pub fn move_selection(&mut self, forward: bool) {
        self.selected = step(self.selected, TEAMS.len(), forward);
    }

    pub fn team_id(&self) -> &'static str {
        TEAMS[self.selected.min(TEAMS.len() - 1)].id
    }
}

// ---------------------------------------------------------------------------
// Root state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub onboarding: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub status: Option<String>,
    pub session: Option<Session>,
    pub live: bool,
    pub games: Vec<ScheduleEntry>,
    pub records: Vec<AttendanceRecord>,
    pub records_view: RecordsState,
    pub detail: RecordDetailState,
    pub schedule: ScheduleState,
    pub new_record: NewRecordState,
    pub admin: AdminState,
    pub team_picker: TeamPickerState,
}

impl AppState {
    pub fn new(current_year: i32, options: DraftOptions) -> Self {
        Self {
            records_view: RecordsState::new(current_year),
            schedule: ScheduleState::new(current_year),
            new_record: NewRecordState::new(options, current_year),
            ..Self::default()
        }
    }

    /// A text field has the keyboard.
    pub fn is_typing(&self) -> bool {
        self.detail.seat.active || self.new_record.input.active || self.admin.input.active
    }
}
