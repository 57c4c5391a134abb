use crate::app::{App, MenuItem};
use crate::state::app_state::{Dialog, Screen};
use crate::state::messages::NetworkRequest;
use crate::state::store::Entity;
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
        quit();
    }

    let requests = if guard.state.dialog().is_some() {
        dialog_keys(&mut guard, key_event)
    } else {
        let screen = guard.state.screen;
        match screen {
            Screen::Connecting => {
                if matches!(key_event.code, Char('q') | KeyCode::Esc) {
                    quit();
                }
                Vec::new()
            }
            Screen::Login => login_keys(&mut guard, key_event),
            Screen::Admin if guard.state.modal.is_some() => modal_keys(&mut guard, key_event),
            Screen::Admin => admin_keys(&mut guard, key_event),
        }
    };
    drop(guard);

    for request in requests {
        let _ = network_requests.send(request).await;
    }
}

fn quit() {
    crate::cleanup_terminal();
    std::process::exit(0);
}

fn dialog_keys(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    let is_confirm = matches!(app.state.dialog(), Some(Dialog::Confirm { .. }));
    match (is_confirm, key_event.code) {
        (true, Char('y') | KeyCode::Enter) => app.answer_dialog(true),
        (true, Char('n') | KeyCode::Esc) => app.answer_dialog(false),
        (false, KeyCode::Enter | KeyCode::Esc | Char(' ')) => app.answer_dialog(false),
        _ => Vec::new(),
    }
}

/// Shared by the login screen and the modal forms.
fn edit_form(app: &mut App, key_event: KeyEvent) {
    let Some(form) = app.active_form() else {
        return;
    };
    match key_event.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left => form.cycle_choice(false),
        KeyCode::Right => form.cycle_choice(true),
        KeyCode::Backspace => form.backspace(),
        Char(c) => form.insert_char(c),
        _ => {}
    }
}

fn login_keys(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    match key_event.code {
        KeyCode::Enter => app.submit_login(),
        KeyCode::Esc => {
            quit();
            Vec::new()
        }
        _ => {
            edit_form(app, key_event);
            Vec::new()
        }
    }
}

fn modal_keys(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    match key_event.code {
        KeyCode::Enter => app.submit_form(),
        KeyCode::Esc => {
            app.close_modal();
            Vec::new()
        }
        _ => {
            edit_form(app, key_event);
            Vec::new()
        }
    }
}

fn admin_keys(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    let tab = app.state.active_tab;
    match (tab, key_event.code) {
        (_, Char('q')) => {
            quit();
            Vec::new()
        }

        // Tab switching
        (_, Char('1')) => switch(app, MenuItem::Dashboard),
        (_, Char('2')) => switch(app, MenuItem::Teams),
        (_, Char('3')) => switch(app, MenuItem::Players),
        (_, Char('4')) => switch(app, MenuItem::Matches),
        (_, Char('5')) => switch(app, MenuItem::Settings),
        (_, Char('?')) => switch(app, MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc) => {
            app.exit_help();
            Vec::new()
        }

        // Global
        (_, Char('f')) => {
            app.toggle_full_screen();
            Vec::new()
        }
        (_, Char('"')) => {
            app.toggle_show_logs();
            Vec::new()
        }
        (_, Char('L')) => app.logout(),
        (_, Char('r')) => vec![reload_request(tab)],

        // Table navigation
        (_, Char('j') | KeyCode::Down) => {
            app.cursor_down();
            Vec::new()
        }
        (_, Char('k') | KeyCode::Up) => {
            app.cursor_up();
            Vec::new()
        }

        // Settings
        (MenuItem::Settings, Char('e') | KeyCode::Enter) => {
            app.open_settings();
            Vec::new()
        }

        // Player selection
        (MenuItem::Players, Char(' ')) => {
            app.toggle_player_at_cursor();
            Vec::new()
        }
        (MenuItem::Players, Char('A')) => {
            app.toggle_all_players();
            Vec::new()
        }
        (MenuItem::Players, Char('D')) => {
            app.bulk_delete();
            Vec::new()
        }

        // Row actions
        (MenuItem::Matches, Char('w')) => match app.selected_id() {
            Some((Entity::Match, id)) => app.open_result(id),
            _ => Vec::new(),
        },
        (_, Char('a')) => match tab.entity() {
            Some(entity) => app.show_add_form(entity),
            None => Vec::new(),
        },
        (_, Char('e') | KeyCode::Enter) => match app.selected_id() {
            Some((entity, id)) => app.edit(entity, id),
            None => Vec::new(),
        },
        (_, Char('d') | KeyCode::Delete) => {
            if let Some((entity, id)) = app.selected_id() {
                app.delete(entity, id);
            }
            Vec::new()
        }

        _ => Vec::new(),
    }
}

fn switch(app: &mut App, tab: MenuItem) -> Vec<NetworkRequest> {
    app.update_tab(tab);
    Vec::new()
}

fn reload_request(tab: MenuItem) -> NetworkRequest {
    match tab {
        MenuItem::Teams => NetworkRequest::LoadTeams,
        MenuItem::Players => NetworkRequest::LoadPlayers,
        MenuItem::Matches => NetworkRequest::LoadMatches,
        MenuItem::Settings => NetworkRequest::LoadSettings,
        MenuItem::Dashboard | MenuItem::Help => NetworkRequest::LoadStats,
    }
}
