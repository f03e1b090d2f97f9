mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, SubscriptionEvent, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crate::state::subscription::SubscriptionWorker;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info, warn};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use ticketbook_api::client::{TicketApi, subscription_url};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(admin_mode) = handle_cli_args() else {
        return Ok(());
    };

    let settings = AppSettings::load(admin_mode);
    let api = match settings.api_url.as_deref() {
        Some(url) => TicketApi::remote(url)?,
        None => TicketApi::local(&settings.data_dir),
    };
    let subscription_base = if api.is_remote() { settings.ws_url.clone() } else { None };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (subscription_tx, subscription_rx) = mpsc::channel::<SubscriptionEvent>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(api, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic schedule refresh thread (every 60s)
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone());
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Sign in, then load games and records
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    let channels = Channels {
        ui_events: ui_event_rx,
        network_requests: network_req_tx,
        network_responses: network_resp_rx,
        subscription_tx,
        subscription_events: subscription_rx,
        subscription_base,
    };
    main_ui_loop(terminal, app, channels).await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();

    Ok(())
}

/// `None` means the invocation was fully handled (help, version).
fn handle_cli_args() -> Option<bool> {
    let mut admin_mode = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return None;
            }
            "-V" | "--version" => {
                println!("ticketbook {}", env!("CARGO_PKG_VERSION"));
                return None;
            }
            "--admin" => admin_mode = true,
            _ => {
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }
    Some(admin_mode)
}

fn usage_text() -> &'static str {
    "ticketbook - KBO ballpark attendance log

Usage:
  ticketbook
  ticketbook --admin
  ticketbook --help
  ticketbook --version

Options:
  --admin   Sign in as administrator and enable the schedule editor

Environment:
  TICKETBOOK_API_URL         Remote store base URL (default: local JSON store)
  TICKETBOOK_WS_URL          Record subscription socket (default: derived from the API URL)
  TICKETBOOK_DATA_DIR        Local store directory (default $XDG_DATA_HOME/ticketbook)
  TICKETBOOK_ADMIN_EMAIL     Administrator e-mail for --admin
  TICKETBOOK_ADMIN_PASSWORD  Administrator password for --admin
  TICKETBOOK_LOCALE          Weekday names in record dates: ko (default) or en
  TICKETBOOK_NEUTRAL_RESULT  Result when your team did not play: home (default) or legacy
  TICKETBOOK_LOG             Log level: error, warn, info, debug, trace"
}

struct Channels {
    ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    network_responses: mpsc::Receiver<NetworkResponse>,
    subscription_tx: mpsc::Sender<SubscriptionEvent>,
    subscription_events: mpsc::Receiver<SubscriptionEvent>,
    subscription_base: Option<String>,
}

async fn main_ui_loop(mut terminal: Terminal<CrosstermBackend<Stdout>>, app: Arc<Mutex<App>>, channels: Channels) {
    let Channels {
        mut ui_events,
        network_requests,
        mut network_responses,
        subscription_tx,
        mut subscription_events,
        subscription_base,
    } = channels;
    let mut loading = LoadingState::default();
    let mut subscription_task: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                if let NetworkResponse::SignedIn { session } = &response
                    && let Some(base) = subscription_base.as_deref()
                {
                    subscription_task = restart_subscription(subscription_task.take(), base, &session.uid, &subscription_tx);
                }
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(event) = subscription_events.recv() => {
                let should_redraw = handle_subscription_event(event, &app).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

fn restart_subscription(
    previous: Option<JoinHandle<()>>,
    ws_base: &str,
    user_id: &str,
    events: &mpsc::Sender<SubscriptionEvent>,
) -> Option<JoinHandle<()>> {
    if let Some(task) = previous {
        task.abort();
    }
    match subscription_url(ws_base, user_id) {
        Ok(url) => {
            info!("subscribing to record changes at {url}");
            let worker = SubscriptionWorker { url, events: events.clone() };
            Some(tokio::spawn(worker.run()))
        }
        Err(e) => {
            warn!("record subscription disabled: {e}");
            None
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let request = app.lock().await.startup_request();
            let _ = network_requests.send(request).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_subscription_event(event: SubscriptionEvent, app: &Arc<Mutex<App>>) -> bool {
    let mut guard = app.lock().await;
    match event {
        SubscriptionEvent::Connected => guard.on_subscription_changed(true),
        SubscriptionEvent::Disconnected => guard.on_subscription_changed(false),
        SubscriptionEvent::Snapshot(records) => guard.on_records_loaded(records),
        SubscriptionEvent::Error(message) => {
            warn!("{message}");
            return false;
        }
    }
    true
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    let mut guard = app.lock().await;
    let follow_ups = match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::SignedIn { session } => guard.on_signed_in(session),
        NetworkResponse::GamesLoaded { games } => {
            guard.on_games_loaded(games);
            Vec::new()
        }
        NetworkResponse::RecordsLoaded { records } => {
            guard.on_records_loaded(records);
            Vec::new()
        }
        NetworkResponse::RecordCreated { id } => guard.on_record_created(id),
        NetworkResponse::RecordUpdated { id, patch } => {
            guard.on_record_updated(id, patch);
            Vec::new()
        }
        NetworkResponse::RecordDeleted { id } => {
            guard.on_record_deleted(id);
            Vec::new()
        }
        NetworkResponse::GameSaved { id } => guard.on_game_saved(id),
        NetworkResponse::RecordCreateFailed { message } => {
            error!("Saving record failed: {message}");
            guard.on_record_create_failed(message);
            Vec::new()
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            guard.on_error(message);
            Vec::new()
        }
    };
    drop(guard);

    for request in follow_ups {
        let _ = network_requests.send(request).await;
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::Hide);
    let _ = execute!(stdout, terminal::EnterAlternateScreen);
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = terminal::enable_raw_mode();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
