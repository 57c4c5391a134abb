mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{AppSettings, LOG_ENV, TIMEOUT_ENV, URL_ENV};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::info;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tourney_api::client::TourneyApi;
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, PartialEq)]
enum CliCommand {
    Run { url: Option<String> },
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = match parse_args(std::env::args().skip(1)) {
        Ok(CliCommand::Run { url }) => url,
        Ok(CliCommand::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(CliCommand::Version) => {
            println!("tourney-admin {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let settings = AppSettings::load(url);
    tui_logger::set_default_level(settings.log_level);
    info!("using backend {}", settings.base_url);

    let client = TourneyApi::new()
        .with_base_url(settings.base_url.clone())
        .with_timeout(settings.timeout);

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Trigger the auth check on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliCommand, String> {
    let mut url = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "-u" | "--url" => match args.next() {
                Some(value) if !value.trim().is_empty() => url = Some(value),
                _ => return Err(format!("Missing value for {arg}")),
            },
            other => match other.strip_prefix("--url=") {
                Some(value) if !value.trim().is_empty() => url = Some(value.to_string()),
                _ => return Err(format!("Unknown argument: {other}")),
            },
        }
    }
    Ok(CliCommand::Run { url })
}

fn usage_text() -> String {
    format!(
        "tourney-admin - tournament administration terminal UI

Usage:
  tourney-admin [--url <URL>]
  tourney-admin --help
  tourney-admin --version

Options:
  -u, --url <URL>   Backend base URL (default http://127.0.0.1:5000)

Environment:
  {URL_ENV}       Backend base URL
  {TIMEOUT_ENV}   Request timeout in seconds (default 10)
  {LOG_ENV}       Log level: error, warn, info, debug, trace

Config file:
  $XDG_CONFIG_HOME/tourney-admin/config.json or ~/.config/tourney-admin/config.json
  {{\"base_url\": \"...\", \"timeout_secs\": 10, \"log_level\": \"info\"}}"
    )
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

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
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
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
            let _ = network_requests.send(NetworkRequest::CheckAuth).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    if let NetworkResponse::LoadingStateChanged { loading_state } = response {
        *loading = loading_state;
        return true;
    }
    let follow_up = app.lock().await.apply_response(response);

    for request in follow_up {
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

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
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

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn url_flag_in_both_forms() {
        assert_eq!(
            parse_args(args(&["--url", "http://league.local:5000"])),
            Ok(CliCommand::Run { url: Some("http://league.local:5000".into()) })
        );
        assert_eq!(
            parse_args(args(&["--url=http://10.0.0.2"])),
            Ok(CliCommand::Run { url: Some("http://10.0.0.2".into()) })
        );
        assert_eq!(parse_args(args(&[])), Ok(CliCommand::Run { url: None }));
    }

    #[test]
    fn help_and_version_win() {
        assert_eq!(parse_args(args(&["--url", "x", "--help"])), Ok(CliCommand::Help));
        assert_eq!(parse_args(args(&["-V"])), Ok(CliCommand::Version));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse_args(args(&["--url"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }
}
