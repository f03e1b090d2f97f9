use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, DraftFocus};
use crate::state::messages::NetworkRequest;
use chrono::{Datelike, Local};
use log::{info, warn};
use ticketbook_api::admin::GameForm;
use ticketbook_api::client::Session;
use ticketbook_api::schedule::{is_recorded, recorded_dates, sort_entries};
use ticketbook_api::{AttendanceRecord, RecordPatch, ScheduleEntry, Team, team_by_id};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Records,
    NewRecord,
    Schedule,
    RecordDetail,
    Settings,
    Admin,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

pub fn current_year() -> i32 {
    Local::now().year()
}

pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let mut app = Self {
            state: AppState::new(current_year(), settings.draft_options),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app.state.team_picker.point_at(app.settings.selected_team_id());
        if app.settings.selected_team_id().is_none() {
            app.state.onboarding = true;
            app.state.active_tab = MenuItem::Settings;
        }

        app
    }

    pub fn selected_team(&self) -> Option<&'static Team> {
        self.settings.selected_team_id().and_then(team_by_id)
    }

    pub fn startup_request(&self) -> NetworkRequest {
        if self.settings.admin_mode {
            NetworkRequest::SignInAdmin {
                email: self.settings.admin_email.clone(),
                password: self.settings.admin_password.clone(),
            }
        } else {
            NetworkRequest::SignIn
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_signed_in(&mut self, session: Session) -> Vec<NetworkRequest> {
        self.state.last_error = None;
        self.state.session = Some(session);
        vec![NetworkRequest::LoadGames, NetworkRequest::LoadRecords]
    }

    pub fn on_games_loaded(&mut self, mut games: Vec<ScheduleEntry>) {
        sort_entries(&mut games);
        self.state.games = games;
        self.state.schedule.sync(&self.state.games);
        self.state.new_record.picker.sync(&self.state.games);
        let len = self.admin_games().len();
        self.state.admin.selected = self.state.admin.selected.min(len.saturating_sub(1));
    }

    /// Both the polled list and pushed snapshots land here.
    pub fn on_records_loaded(&mut self, records: Vec<AttendanceRecord>) {
        self.state.records = records;
        self.state.records_view.clamp(&self.state.records);
        if let Some(open) = self.state.detail.record.as_ref() {
            match self.state.records.iter().find(|r| r.id == open.id) {
                Some(fresh) => self.state.detail.record = Some(fresh.clone()),
                None if self.state.active_tab == MenuItem::RecordDetail => {
                    self.state.detail.close();
                    self.state.active_tab = MenuItem::Records;
                }
                None => self.state.detail.close(),
            }
        }
    }

    pub fn on_record_created(&mut self, id: String) -> Vec<NetworkRequest> {
        info!("record {id} saved");
        if let Err(e) = self.state.new_record.session.mark_saved() {
            warn!("draft already closed: {e}");
        }
        self.state.new_record.reset();
        self.state.status = Some("Record saved".to_string());
        self.update_tab(MenuItem::Records);
        vec![NetworkRequest::LoadRecords]
    }

    pub fn on_record_updated(&mut self, id: String, patch: RecordPatch) {
        if let Some(record) = self.state.records.iter_mut().find(|r| r.id == id) {
            patch.apply(record);
        }
        if let Some(record) = self.state.detail.record.as_mut().filter(|r| r.id == id) {
            patch.apply(record);
        }
        self.state.status = Some("Record updated".to_string());
    }

    pub fn on_record_deleted(&mut self, id: String) {
        self.state.records.retain(|r| r.id != id);
        self.state.records_view.clamp(&self.state.records);
        self.state.detail.close();
        self.state.status = Some("Record deleted".to_string());
        if self.state.active_tab == MenuItem::RecordDetail {
            self.state.active_tab = MenuItem::Records;
        }
    }

    pub fn on_game_saved(&mut self, id: String) -> Vec<NetworkRequest> {
        info!("game {id} saved");
        self.state.admin.close();
        self.state.status = Some("Game saved".to_string());
        vec![NetworkRequest::LoadGames]
    }

    /// The draft stays `AutoFilled`, so the user can fix it and save again.
    pub fn on_record_create_failed(&mut self, message: String) {
        self.state.new_record.saving = false;
        self.state.new_record.error = Some(message.clone());
        self.state.last_error = Some(message);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    pub fn on_subscription_changed(&mut self, connected: bool) {
        self.state.live = connected;
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next || self.state.onboarding {
            return;
        }
        if next == MenuItem::Admin && !self.settings.admin_mode {
            self.state.status = Some("Start with --admin to edit the schedule".to_string());
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        self.state.status = None;
        if next == MenuItem::Settings {
            self.state.team_picker.point_at(self.settings.selected_team_id());
        }
        if next == MenuItem::Schedule {
            self.state.schedule.sync(&self.state.games);
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Records list + detail
    // -----------------------------------------------------------------------

    pub fn records_move(&mut self, forward: bool) {
        self.state.records_view.move_selection(&self.state.records, forward);
    }

    pub fn records_cycle_year(&mut self) {
        self.state.records_view.cycle_year(&self.state.records, current_year());
    }

    pub fn open_selected_record(&mut self) {
        if let Some(record) = self.state.records_view.selected_record(&self.state.records) {
            self.state.detail.open(record);
            self.update_tab(MenuItem::RecordDetail);
        }
    }

    pub fn close_detail(&mut self) {
        self.state.detail.close();
        self.update_tab(MenuItem::Records);
    }

    pub fn detail_toggle_side(&mut self) -> Option<NetworkRequest> {
        let (id, patch) = self.state.detail.toggle_side()?;
        Some(NetworkRequest::UpdateRecord { id, patch })
    }

    pub fn detail_commit_seat(&mut self) -> Option<NetworkRequest> {
        let (id, patch) = self.state.detail.commit_seat()?;
        Some(NetworkRequest::UpdateRecord { id, patch })
    }

    /// First press asks, second press deletes.
    pub fn detail_delete(&mut self) -> Option<NetworkRequest> {
        let id = self.state.detail.record.as_ref()?.id.clone();
        if !self.state.detail.confirm_delete {
            self.state.detail.confirm_delete = true;
            return None;
        }
        self.state.detail.confirm_delete = false;
        Some(NetworkRequest::DeleteRecord { id })
    }

    // -----------------------------------------------------------------------
    // Schedule browser
    // -----------------------------------------------------------------------

    pub fn schedule_move(&mut self, forward: bool) {
        self.state.schedule.move_selection(&self.state.games, forward);
    }

    pub fn schedule_cycle_year(&mut self) {
        self.state.schedule.cycle_year(&self.state.games, current_year());
    }

    pub fn schedule_shift_month(&mut self, forward: bool) {
        self.state.schedule.shift_month(&self.state.games, forward);
    }

    pub fn schedule_jump_to_today(&mut self) {
        let today = today();
        let schedule = &mut self.state.schedule;
        schedule.year = current_year();
        schedule.month = today.get(5..7).and_then(|m| m.parse().ok());
        schedule.sync(&self.state.games);
        schedule.focus_date(&self.state.games, &today);
    }

    /// Start a new record from the highlighted schedule entry.
    pub fn schedule_record_selected(&mut self) {
        let Some(entry) = self.state.schedule.selected_entry(&self.state.games) else {
            return;
        };
        self.update_tab(MenuItem::NewRecord);
        self.draft_pick(entry);
    }

    // -----------------------------------------------------------------------
    // New record form
    // -----------------------------------------------------------------------

    pub fn draft_picker_move(&mut self, forward: bool) {
        self.state.new_record.picker.move_selection(&self.state.games, forward);
    }

    pub fn draft_picker_cycle_year(&mut self) {
        self.state.new_record.picker.cycle_year(&self.state.games, current_year());
    }

    pub fn draft_picker_shift_month(&mut self, forward: bool) {
        self.state.new_record.picker.shift_month(&self.state.games, forward);
    }

    pub fn draft_pick_selected(&mut self) {
        if let Some(entry) = self.state.new_record.picker.selected_entry(&self.state.games) {
            self.draft_pick(entry);
        }
    }

    fn draft_pick(&mut self, entry: ScheduleEntry) {
        let recorded = recorded_dates(&self.state.records);
        if is_recorded(&entry, &recorded) {
            self.state.new_record.error = Some(format!("{} is already recorded", entry.date));
            return;
        }
        if self.state.new_record.session.phase().is_terminal() {
            self.state.new_record.reset();
        }
        let team = self.selected_team();
        let new_record = &mut self.state.new_record;
        match new_record.session.select_entry(&entry, team) {
            Ok(()) => {
                new_record.error = None;
                new_record.focus = DraftFocus::Side;
            }
            Err(e) => new_record.error = Some(e.to_string()),
        }
    }

    pub fn draft_focus_next(&mut self) {
        let new_record = &mut self.state.new_record;
        new_record.focus = if new_record.session.draft().is_some() {
            new_record.focus.next()
        } else {
            DraftFocus::Picker
        };
    }

    pub fn draft_toggle_side(&mut self) {
        if let Err(e) = self.state.new_record.session.toggle_side() {
            self.state.new_record.error = Some(e.to_string());
        }
    }

    pub fn draft_begin_edit(&mut self) {
        let new_record = &mut self.state.new_record;
        let Some(draft) = new_record.session.draft() else {
            return;
        };
        let current = match new_record.focus {
            DraftFocus::AwayScore => draft.away_score.clone(),
            DraftFocus::HomeScore => draft.home_score.clone(),
            DraftFocus::Seat => draft.seat.clone(),
            DraftFocus::Picker | DraftFocus::Side => return,
        };
        new_record.input.start(&current);
    }

    pub fn draft_commit_edit(&mut self) {
        let new_record = &mut self.state.new_record;
        let value = new_record.input.finish();
        let result = match new_record.focus {
            DraftFocus::AwayScore => new_record.session.set_away_score(value),
            DraftFocus::HomeScore => new_record.session.set_home_score(value),
            DraftFocus::Seat => new_record.session.set_seat(value),
            DraftFocus::Picker | DraftFocus::Side => Ok(()),
        };
        new_record.error = result.err().map(|e| e.to_string());
    }

    pub fn draft_save(&mut self) -> Option<NetworkRequest> {
        let uid = self.state.session.as_ref().map(|s| s.uid.clone())?;
        let new_record = &mut self.state.new_record;
        if new_record.saving {
            return None;
        }
        match new_record.session.submission(&uid, chrono::Utc::now()) {
            Ok(record) => {
                new_record.saving = true;
                new_record.error = None;
                Some(NetworkRequest::CreateRecord { record })
            }
            Err(e) => {
                new_record.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn draft_discard(&mut self) {
        if let Err(e) = self.state.new_record.session.discard() {
            warn!("discard ignored: {e}");
        }
        self.state.new_record.reset();
    }

    // -----------------------------------------------------------------------
    // Admin console
    // -----------------------------------------------------------------------

    /// Schedule entries newest first.
    pub fn admin_games(&self) -> Vec<ScheduleEntry> {
        let mut games = self.state.games.clone();
        sort_entries(&mut games);
        games.reverse();
        games
    }

    pub fn admin_move(&mut self, forward: bool) {
        let len = self.admin_games().len();
        let admin = &mut self.state.admin;
        admin.selected = if forward {
            (admin.selected + 1).min(len.saturating_sub(1))
        } else {
            admin.selected.saturating_sub(1)
        };
    }

    pub fn admin_new(&mut self) {
        self.state.admin.open(GameForm::new_entry(today()));
    }

    pub fn admin_edit_selected(&mut self) {
        if let Some(entry) = self.admin_games().get(self.state.admin.selected) {
            self.state.admin.open(GameForm::from_entry(entry));
        }
    }

    pub fn admin_save(&mut self) -> Option<NetworkRequest> {
        let form = self.state.admin.form.as_ref()?;
        match form.validate() {
            Ok(entry) => {
                self.state.admin.error = None;
                Some(NetworkRequest::SaveGame { entry })
            }
            Err(e) => {
                self.state.admin.error = Some(e.to_string());
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Team preference
    // -----------------------------------------------------------------------

    pub fn choose_team(&mut self) {
        let team_id = self.state.team_picker.team_id();
        if let Err(e) = self.settings.set_selected_team(team_id) {
            warn!("could not persist team preference: {e}");
            self.state.last_error = Some(e);
        }
        self.state.new_record.reset();
        if self.state.onboarding {
            self.state.onboarding = false;
            self.state.active_tab = MenuItem::Records;
        } else {
            self.state.status = Some(format!("Team set to {}", ticketbook_api::team_name(team_id)));
        }
    }
}
