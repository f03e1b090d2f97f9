use crate::app::{App, MenuItem};
use crate::state::app_state::DraftFocus;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    // A focused text field swallows everything else.
    let request = if guard.state.is_typing() {
        handle_typing(&mut guard, key_event.code)
    } else if guard.state.onboarding {
        handle_onboarding(&mut guard, key_event.code);
        None
    } else {
        handle_navigation(&mut guard, key_event)
    };

    drop(guard);
    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}

fn handle_typing(app: &mut App, code: KeyCode) -> Option<NetworkRequest> {
    let tab = app.state.active_tab;
    match code {
        KeyCode::Esc => {
            app.state.detail.seat.cancel();
            app.state.new_record.input.cancel();
            app.state.admin.input.cancel();
            None
        }
        KeyCode::Enter => match tab {
            MenuItem::RecordDetail => app.detail_commit_seat(),
            MenuItem::NewRecord => {
                app.draft_commit_edit();
                None
            }
            MenuItem::Admin => {
                app.state.admin.commit_edit();
                None
            }
            _ => None,
        },
        KeyCode::Backspace => {
            if let Some(input) = active_input(app) {
                input.pop();
            }
            None
        }
        Char(c) => {
            if let Some(input) = active_input(app) {
                input.push(c);
            }
            None
        }
        _ => None,
    }
}

fn active_input(app: &mut App) -> Option<&mut crate::state::app_state::TextInput> {
    let state = &mut app.state;
    if state.detail.seat.active {
        Some(&mut state.detail.seat)
    } else if state.new_record.input.active {
        Some(&mut state.new_record.input)
    } else if state.admin.input.active {
        Some(&mut state.admin.input)
    } else {
        None
    }
}

fn handle_onboarding(app: &mut App, code: KeyCode) {
    match code {
        Char('j') | KeyCode::Down => app.state.team_picker.move_selection(true),
        Char('k') | KeyCode::Up => app.state.team_picker.move_selection(false),
        KeyCode::Enter => app.choose_team(),
        Char('q') => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }
        _ => {}
    }
}

fn handle_navigation(app: &mut App, key_event: KeyEvent) -> Option<NetworkRequest> {
    let admin_form_open = app.state.admin.form.is_some();
    match (app.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => app.update_tab(MenuItem::Records),
        (_, Char('2'), _) => app.update_tab(MenuItem::NewRecord),
        (_, Char('3'), _) => app.update_tab(MenuItem::Schedule),
        (_, Char('4'), _) => app.update_tab(MenuItem::Settings),
        (_, Char('5'), _) => app.update_tab(MenuItem::Admin),
        (_, Char('?'), _) => app.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => app.exit_help(),

        // Records
        (MenuItem::Records, Char('j') | KeyCode::Down, _) => app.records_move(true),
        (MenuItem::Records, Char('k') | KeyCode::Up, _) => app.records_move(false),
        (MenuItem::Records, Char('y'), _) => app.records_cycle_year(),
        (MenuItem::Records, KeyCode::Enter, _) => app.open_selected_record(),
        (MenuItem::Records, Char('r'), _) => return Some(NetworkRequest::LoadRecords),

        // Record detail
        (MenuItem::RecordDetail, Char('s'), _) => return app.detail_toggle_side(),
        (MenuItem::RecordDetail, Char('e'), _) => app.state.detail.begin_seat_edit(),
        (MenuItem::RecordDetail, Char('d'), _) => return app.detail_delete(),
        (MenuItem::RecordDetail, KeyCode::Esc, _) => {
            if app.state.detail.confirm_delete {
                app.state.detail.confirm_delete = false;
            } else {
                app.close_detail();
            }
        }

        // Schedule
        (MenuItem::Schedule, Char('j') | KeyCode::Down, _) => app.schedule_move(true),
        (MenuItem::Schedule, Char('k') | KeyCode::Up, _) => app.schedule_move(false),
        (MenuItem::Schedule, Char('l') | KeyCode::Right, _) => app.schedule_shift_month(true),
        (MenuItem::Schedule, Char('h') | KeyCode::Left, _) => app.schedule_shift_month(false),
        (MenuItem::Schedule, Char('y'), _) => app.schedule_cycle_year(),
        (MenuItem::Schedule, Char('t'), _) => app.schedule_jump_to_today(),
        (MenuItem::Schedule, KeyCode::Enter, _) => app.schedule_record_selected(),
        (MenuItem::Schedule, Char('r'), _) => return Some(NetworkRequest::LoadGames),

        // New record
        (MenuItem::NewRecord, KeyCode::Tab, _) => app.draft_focus_next(),
        (MenuItem::NewRecord, KeyCode::Esc, _) => app.draft_discard(),
        (MenuItem::NewRecord, Char('S'), _) => return app.draft_save(),
        (MenuItem::NewRecord, key, _) if app.state.new_record.focus == DraftFocus::Picker => match key {
            Char('j') | KeyCode::Down => app.draft_picker_move(true),
            Char('k') | KeyCode::Up => app.draft_picker_move(false),
            Char('l') | KeyCode::Right => app.draft_picker_shift_month(true),
            Char('h') | KeyCode::Left => app.draft_picker_shift_month(false),
            Char('y') => app.draft_picker_cycle_year(),
            KeyCode::Enter => app.draft_pick_selected(),
            _ => {}
        },
        (MenuItem::NewRecord, Char(' ') | KeyCode::Enter, _)
            if app.state.new_record.focus == DraftFocus::Side =>
        {
            app.draft_toggle_side()
        }
        (MenuItem::NewRecord, KeyCode::Enter, _) => app.draft_begin_edit(),

        // Settings
        (MenuItem::Settings, Char('j') | KeyCode::Down, _) => app.state.team_picker.move_selection(true),
        (MenuItem::Settings, Char('k') | KeyCode::Up, _) => app.state.team_picker.move_selection(false),
        (MenuItem::Settings, KeyCode::Enter, _) => app.choose_team(),

        // Admin
        (MenuItem::Admin, Char('n'), _) if !admin_form_open => app.admin_new(),
        (MenuItem::Admin, Char('j') | KeyCode::Down, _) if !admin_form_open => app.admin_move(true),
        (MenuItem::Admin, Char('k') | KeyCode::Up, _) if !admin_form_open => app.admin_move(false),
        (MenuItem::Admin, KeyCode::Enter, _) if !admin_form_open => app.admin_edit_selected(),
        (MenuItem::Admin, Char('j') | KeyCode::Down | KeyCode::Tab, _) => app.state.admin.move_focus(true),
        (MenuItem::Admin, Char('k') | KeyCode::Up | KeyCode::BackTab, _) => app.state.admin.move_focus(false),
        (MenuItem::Admin, Char('l') | KeyCode::Right | Char(' '), _) => app.state.admin.cycle_choice(),
        (MenuItem::Admin, KeyCode::Enter, _) => app.state.admin.begin_edit(),
        (MenuItem::Admin, Char('S'), _) => return app.admin_save(),
        (MenuItem::Admin, KeyCode::Esc, _) => app.state.admin.close(),

        // Global
        (_, Char('f'), _) => app.toggle_full_screen(),
        (_, Char('"'), _) => app.toggle_show_logs(),

        _ => {}
    }
    None
}
