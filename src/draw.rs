use std::collections::HashSet;

use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};

use crate::app::{App, MenuItem, today};
use crate::components::ticket_card::{CARD_HEIGHT, TicketCard, hex_color, result_color, team_color};
use crate::state::app_state::{AdminField, DraftFocus, ScheduleState, TextInput};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use ticketbook_api::records::tally;
use ticketbook_api::schedule::{group_by_date, is_recorded, recorded_dates};
use ticketbook_api::{ScheduleEntry, TEAMS, team_name};

static TABS: &[&str; 5] = &["Records", "New", "Schedule", "Settings", "Admin"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        let area = f.area();
        if app.state.onboarding {
            draw_team_picker(f, area, app, " Pick your team ");
            return;
        }

        layout.update(area, app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_status(f, layout.status, app);
        }

        match app.state.active_tab {
            MenuItem::Records => draw_records(f, layout.main, app),
            MenuItem::RecordDetail => draw_record_detail(f, layout.main, app),
            MenuItem::NewRecord => draw_new_record(f, layout.main, app),
            MenuItem::Schedule => draw_schedule(f, layout.main, app),
            MenuItem::Settings => draw_team_picker(f, layout.main, app, " Settings "),
            MenuItem::Admin => draw_admin(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, area, app, loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn accent(app: &App) -> Color {
    team_color(app.selected_team())
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn tab_index(tab: MenuItem) -> usize {
    match tab {
        MenuItem::Records | MenuItem::RecordDetail => 0,
        MenuItem::NewRecord => 1,
        MenuItem::Schedule => 2,
        MenuItem::Settings => 3,
        MenuItem::Admin => 4,
        MenuItem::Help => 0,
    }
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab = match app.state.active_tab {
        MenuItem::Help => app.state.previous_tab,
        other => other,
    };

    let tab_count = if app.settings.admin_mode { TABS.len() } else { TABS.len() - 1 };
    let titles: Vec<Line> = TABS.iter().take(tab_count).map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().fg(accent(app)).add_modifier(Modifier::UNDERLINED))
        .select(tab_index(tab))
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    if let Some(team) = app.selected_team() {
        spans.push(Span::styled(format!(" {} ", team.name), Style::default().fg(accent(app))));
    }
    if app.state.live {
        spans.push(Span::styled("● live ", Style::default().fg(Color::Green)));
    }
    if let Some(err) = app.state.last_error.as_deref() {
        spans.push(Span::styled(err.to_string(), Style::default().fg(Color::Red)));
    } else if let Some(status) = app.state.status.as_deref() {
        spans.push(Span::styled(status.to_string(), Style::default().fg(Color::Gray)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_centered(f: &mut Frame, area: Rect, msg: impl Into<String>) {
    f.render_widget(
        Paragraph::new(msg.into()).style(dim()).alignment(Alignment::Center),
        area,
    );
}

fn input_text(input: &TextInput, value: &str) -> String {
    if input.active {
        format!("{}_", input.value)
    } else if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

fn draw_records(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.state.records_view;
    let block = default_border(Color::White).title(format!(" My Tickets · {} ", view.year));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let records = view.visible(&app.state.records);
    let [summary, legend, list] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let t = tally(&records);
    let rate = t
        .win_rate()
        .map(|r| format!("{:.0}%", r * 100.0))
        .unwrap_or_else(|| "-".to_string());
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(format!("{} games  ", t.total())),
            Span::styled(format!("W {} ", t.win), Style::default().fg(result_color(ticketbook_api::Outcome::Win))),
            Span::styled(format!("L {} ", t.lose), Style::default().fg(result_color(ticketbook_api::Outcome::Lose))),
            Span::styled(format!("D {} ", t.draw), Style::default().fg(result_color(ticketbook_api::Outcome::Draw))),
            Span::raw(format!(" win rate {rate}")),
        ])),
        summary,
    );
    f.render_widget(
        Paragraph::new("j/k=move  y=year  Enter=open  r=reload").style(dim()),
        legend,
    );

    if records.is_empty() {
        draw_centered(f, list, "No tickets this season. Press 2 to add one.");
        return;
    }

    let per_page = (list.height / CARD_HEIGHT).max(1) as usize;
    let first = view.selected.saturating_sub(per_page - 1);
    for (row, (idx, record)) in records.iter().enumerate().skip(first).take(per_page).enumerate() {
        let card_area = Rect::new(list.x, list.y + row as u16 * CARD_HEIGHT, list.width, CARD_HEIGHT)
            .intersection(list);
        f.render_widget(
            TicketCard { record, selected: idx == view.selected, accent: accent(app) },
            card_area,
        );
    }
}

fn draw_record_detail(f: &mut Frame, area: Rect, app: &App) {
    let detail = &app.state.detail;
    let block = default_border(accent(app)).title(" Ticket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(record) = detail.record.as_ref() else {
        draw_centered(f, inner, "No ticket selected");
        return;
    };

    let [card, fields, footer] = Layout::vertical([
        Constraint::Length(CARD_HEIGHT),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .areas(inner);
    f.render_widget(TicketCard { record, selected: true, accent: accent(app) }, card);

    let matchup = record.matchup();
    let seat_style = if detail.seat.active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Cheering  ", dim()),
            Span::raw(format!("{} ({})", matchup.name_for(record.my_side), record.my_side.label())),
        ]),
        Line::from(vec![
            Span::styled("Seat      ", dim()),
            Span::styled(input_text(&detail.seat, &record.seat), seat_style),
        ]),
        Line::from(vec![
            Span::styled("Result    ", dim()),
            Span::styled(record.result.label(), Style::default().fg(result_color(record.result))),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), fields);

    let footer_line = if detail.confirm_delete {
        Line::from(Span::styled(
            "Delete this ticket? d=confirm  Esc=cancel",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if detail.seat.active {
        Line::from(Span::styled("Enter=save seat  Esc=cancel", dim()))
    } else {
        Line::from(Span::styled("s=switch side  e=edit seat  d=delete  Esc=back", dim()))
    };
    f.render_widget(Paragraph::new(footer_line), footer);
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

fn entry_line(entry: &ScheduleEntry, selected: bool, recorded: bool, accent: Color) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let score = match (entry.away_score, entry.home_score) {
        (Some(away), Some(home)) => format!("{away}:{home}"),
        _ => "vs".to_string(),
    };
    let name_style = if selected {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(format!("{:<5} ", entry.time), dim()),
        Span::styled(format!("{} {score} {}", entry.away_name(), entry.home_name()), name_style),
        Span::styled(format!("  {}", entry.stadium), dim()),
        Span::styled(format!("  [{}]", entry.status.label()), Style::default().fg(Color::Gray)),
    ];
    if recorded {
        spans.push(Span::styled("  ✓ recorded", Style::default().fg(Color::Green)));
    }
    Line::from(spans)
}

/// Month listing shared by the schedule tab and the new-record picker.
/// Returns the lines and the row of the highlighted entry.
fn schedule_lines(
    schedule: &ScheduleState,
    games: &[ScheduleEntry],
    recorded: &HashSet<String>,
    accent: Color,
) -> (Vec<Line<'static>>, usize) {
    let visible = schedule.visible(games);
    let today = today();
    let mut lines = Vec::new();
    let mut selected_row = 0;
    let mut idx = 0;

    for group in group_by_date(&visible) {
        let mut header = vec![Span::styled(group.date.clone(), Style::default().add_modifier(Modifier::BOLD))];
        if group.date == today {
            header.push(Span::styled(" TODAY", Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(header));
        for entry in &group.entries {
            let selected = idx == schedule.selected;
            if selected {
                selected_row = lines.len();
            }
            lines.push(entry_line(entry, selected, is_recorded(entry, recorded), accent));
            idx += 1;
        }
    }
    (lines, selected_row)
}

fn draw_schedule_list(f: &mut Frame, area: Rect, schedule: &ScheduleState, app: &App, title: &str, focused: bool) {
    let month = schedule.month.map(|m| format!("{m:02}")).unwrap_or_else(|| "--".to_string());
    let border = if focused { accent(app) } else { Color::DarkGray };
    let block = default_border(border).title(format!(" {title} · {}-{month} ", schedule.year));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let recorded = recorded_dates(&app.state.records);
    let (lines, selected_row) = schedule_lines(schedule, &app.state.games, &recorded, accent(app));
    if lines.is_empty() {
        draw_centered(f, inner, "No games scheduled for this month");
        return;
    }

    let height = inner.height as usize;
    let offset = (selected_row + 1).saturating_sub(height);
    f.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), inner);
}

fn draw_schedule(f: &mut Frame, area: Rect, app: &App) {
    let [list, legend] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
    draw_schedule_list(f, list, &app.state.schedule, app, "Schedule", true);
    f.render_widget(
        Paragraph::new("j/k=game  h/l=month  y=year  t=today  Enter=record  r=reload").style(dim()),
        legend,
    );
}

// ---------------------------------------------------------------------------
// New record
// ---------------------------------------------------------------------------

fn draw_new_record(f: &mut Frame, area: Rect, app: &App) {
    let new_record = &app.state.new_record;
    let [picker, form] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    draw_schedule_list(
        f,
        picker,
        &new_record.picker,
        app,
        "Pick a game",
        new_record.focus == DraftFocus::Picker,
    );

    let block = default_border(Color::White).title(" New ticket ");
    let inner = block.inner(form);
    f.render_widget(block, form);

    let Some(draft) = new_record.session.draft() else {
        let mut lines = vec![Line::from(Span::styled("Pick a game from the schedule (Enter).", dim()))];
        if let Some(err) = new_record.error.as_deref() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
        }
        f.render_widget(Paragraph::new(lines), inner);
        return;
    };

    let field = |focus: DraftFocus, label: &str, value: String| -> Line<'static> {
        let focused = new_record.focus == focus;
        let marker = if focused { "> " } else { "  " };
        let value_style = if focused && new_record.input.active {
            Style::default().fg(Color::Yellow)
        } else if focused {
            Style::default().fg(accent(app)).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{label:<11}"), dim()),
            Span::styled(value, value_style),
        ])
    };
    let editing = |focus: DraftFocus, value: &str| -> String {
        if new_record.focus == focus && new_record.input.active {
            input_text(&new_record.input, value)
        } else if value.is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    };

    let matchup = draft.matchup();
    let mut lines = vec![
        Line::from(vec![Span::styled(format!("  {:<11}", "Date"), dim()), Span::raw(draft.date.clone())]),
        Line::from(vec![Span::styled(format!("  {:<11}", "Matchup"), dim()), Span::raw(matchup.to_string())]),
        Line::from(vec![Span::styled(format!("  {:<11}", "Stadium"), dim()), Span::raw(draft.stadium.clone())]),
        Line::from(""),
        field(
            DraftFocus::Side,
            "Cheering",
            format!("{} ({})", matchup.name_for(draft.my_side), draft.my_side.label()),
        ),
        field(DraftFocus::AwayScore, "Away score", editing(DraftFocus::AwayScore, &draft.away_score)),
        field(DraftFocus::HomeScore, "Home score", editing(DraftFocus::HomeScore, &draft.home_score)),
        field(DraftFocus::Seat, "Seat", editing(DraftFocus::Seat, &draft.seat)),
        Line::from(vec![
            Span::styled(format!("  {:<11}", "Result"), dim()),
            Span::styled(
                draft.result.label(),
                Style::default().fg(result_color(draft.result)).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    if new_record.saving {
        lines.push(Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow))));
    } else if let Some(err) = new_record.error.as_deref() {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled(
        "Tab=next field  Enter=edit  Space=switch side  S=save  Esc=discard",
        dim(),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Team picker (onboarding + settings)
// ---------------------------------------------------------------------------

fn draw_team_picker(f: &mut Frame, area: Rect, app: &App, title: &str) {
    let block = default_border(accent(app)).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let current = app.settings.selected_team_id();
    let mut lines = vec![
        Line::from(Span::styled("Which club do you cheer for?  j/k=move  Enter=choose", dim())),
        Line::from(""),
    ];
    for (idx, team) in TEAMS.iter().enumerate() {
        let selected = idx == app.state.team_picker.selected;
        let color = hex_color(team.primary_color)
            .filter(|c| *c != Color::Rgb(0, 0, 0))
            .unwrap_or(Color::White);
        let mut style = Style::default().fg(color);
        if selected {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        let mut spans = vec![
            Span::raw(if selected { "> " } else { "  " }),
            Span::styled(format!(" {} ", team.name), style),
            Span::styled(format!("  {}", team.stadium), dim()),
        ];
        if current == Some(team.id) {
            spans.push(Span::styled("  (current)", Style::default().fg(Color::Green)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(api_url) = app.settings.api_url.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("Server: {api_url}"), dim())));
    } else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Local data: {}", app.settings.data_dir.display()),
            dim(),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Admin console
// ---------------------------------------------------------------------------

fn draw_admin(f: &mut Frame, area: Rect, app: &App) {
    let admin = &app.state.admin;
    let [list_area, form_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);

    let block = default_border(if admin.form.is_none() { accent(app) } else { Color::DarkGray })
        .title(" Schedule admin ");
    let inner = block.inner(list_area);
    f.render_widget(block, list_area);

    let games = app.admin_games();
    if games.is_empty() {
        draw_centered(f, inner, "No games yet. n=new");
    } else {
        let height = inner.height as usize;
        let offset = (admin.selected + 1).saturating_sub(height);
        let lines: Vec<Line> = games
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let selected = idx == admin.selected;
                let mut line = entry_line(entry, selected, false, accent(app));
                line.spans.insert(1, Span::styled(format!("{} ", entry.date), dim()));
                line
            })
            .collect();
        f.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), inner);
    }

    let Some(form) = admin.form.as_ref() else {
        let block = default_border(Color::DarkGray).title(" Game ");
        let inner = block.inner(form_area);
        f.render_widget(block, form_area);
        f.render_widget(
            Paragraph::new("n=new game  Enter=edit selected  j/k=move").style(dim()),
            inner,
        );
        return;
    };

    let title = if form.is_new() { " New game " } else { " Edit game " };
    let block = default_border(accent(app)).title(title);
    let inner = block.inner(form_area);
    f.render_widget(block, form_area);

    let mut lines = Vec::new();
    for field in AdminField::ALL {
        let focused = admin.focus == field;
        let raw = admin.field_value(field);
        let value = match field {
            _ if focused && admin.input.active => input_text(&admin.input, &raw),
            AdminField::HomeTeam | AdminField::AwayTeam if !raw.is_empty() => team_name(&raw),
            _ if raw.is_empty() => "-".to_string(),
            _ => raw,
        };
        let style = if focused && admin.input.active {
            Style::default().fg(Color::Yellow)
        } else if focused {
            Style::default().fg(accent(app)).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(if focused { "> " } else { "  " }),
            Span::styled(format!("{:<11}", field.label()), dim()),
            Span::styled(value, style),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(err) = admin.error.as_deref() {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled(
        "Tab=next  Enter=edit text  l/Space=next choice  S=save  Esc=close",
        dim(),
    )));
    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Help, logs, spinner
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = [
        ("1-5", "Records, New, Schedule, Settings, Admin"),
        ("j/k", "move selection"),
        ("h/l", "previous / next month"),
        ("y", "next season"),
        ("Enter", "open, pick or edit"),
        ("Tab", "next field"),
        ("S", "save"),
        ("r", "reload"),
        ("f", "toggle full screen"),
        ("\"", "toggle log pane"),
        ("Esc", "back / cancel"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:>6}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = tui_logger::TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketbook_api::GameStatus;

    fn entry(date: &str, time: &str) -> ScheduleEntry {
        ScheduleEntry {
            id: format!("{date}-{time}"),
            date: date.into(),
            time: time.into(),
            home_team_id: "doosan".into(),
            away_team_id: "lg".into(),
            stadium: "잠실 야구장".into(),
            ..Default::default()
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn schedule_lines_group_by_day_and_track_selection() {
        let games = vec![entry("2025-05-05", "14:00"), entry("2025-05-06", "18:30"), entry("2025-05-06", "14:00")];
        let mut schedule = ScheduleState::new(2025);
        schedule.month = Some(5);
        schedule.selected = 2;

        let (lines, row) = schedule_lines(&schedule, &games, &HashSet::new(), Color::White);
        // two headers + three entries
        assert_eq!(lines.len(), 5);
        assert_eq!(text(&lines[0]), "2025-05-05");
        assert_eq!(row, 4);
        assert!(text(&lines[row]).starts_with("> 18:30"));
    }

    #[test]
    fn finished_entries_show_score_and_recorded_badge() {
        let mut game = entry("2025-05-05", "14:00");
        game.away_score = Some(7);
        game.home_score = Some(3);
        game.status = GameStatus::Finished;

        let line = text(&entry_line(&game, false, true, Color::White));
        assert!(line.contains("LG 트윈스 7:3 두산 베어스"));
        assert!(line.contains("[FNL]"));
        assert!(line.contains("recorded"));
    }

    #[test]
    fn detail_and_help_share_the_records_tab() {
        assert_eq!(tab_index(MenuItem::RecordDetail), tab_index(MenuItem::Records));
        assert_eq!(tab_index(MenuItem::Admin), 4);
    }
}
