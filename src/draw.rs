use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::dialog::{DIALOG_HEIGHT, DIALOG_WIDTH, DialogView};
use crate::components::form_modal::{FormView, form_height};
use crate::state::app_state::Screen;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::rows::{
    EMPTY_MATCHES, EMPTY_PLAYERS, EMPTY_TEAMS, match_rows, player_rows, team_rows,
};
use crate::state::shared::{LoadStatus, format_date, list_placeholder, nav_visibility};
use crate::state::store::Entity;
use crate::ui::layout::{LayoutAreas, centered};

static TABS: &[&str; 5] = &["Dashboard", "Teams", "Players", "Matches", "Settings"];

const FORM_WIDTH: u16 = 64;

const HELP_TEXT: &str = "\
Navigation   1-5 switch tab   j/k or ↑/↓ move   r reload   ? help   Esc back
Rows         a add   e/Enter edit   d delete
Players      Space select   A select all   D delete selected
Matches      w record result
Settings     e/Enter edit tournament settings
Forms        Tab/Shift-Tab move   ←/→ choose   Enter save   Esc cancel
Dialogs      y/Enter yes   n/Esc no
Other        \" logs   f full screen   L log out   q quit";

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
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.screen {
            Screen::Connecting => draw_placeholder(f, layout.main, "Checking session..."),
            Screen::Login => draw_login(f, layout.main, app),
            Screen::Admin => {
                match app.state.active_tab {
                    MenuItem::Dashboard => draw_dashboard(f, layout.main, app),
                    MenuItem::Teams => draw_teams(f, layout.main, app),
                    MenuItem::Players => draw_players(f, layout.main, app),
                    MenuItem::Matches => draw_matches(f, layout.main, app),
                    MenuItem::Settings => draw_settings(f, layout.main, app),
                    MenuItem::Help => draw_help(f, layout.main),
                }
                if let Some(form) = app.state.modal.as_ref() {
                    let area = centered(f.area(), FORM_WIDTH, form_height(form));
                    f.render_widget(FormView { form, message: None }, area);
                }
            }
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        if let Some(dialog) = app.state.dialog() {
            let area = centered(f.area(), DIALOG_WIDTH, DIALOG_HEIGHT);
            f.render_widget(DialogView { dialog }, area);
        }

        draw_loading_spinner(f, f.area(), app, loading);
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

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Dashboard | MenuItem::Help => 0,
        MenuItem::Teams => 1,
        MenuItem::Players => 2,
        MenuItem::Matches => 3,
        MenuItem::Settings => 4,
    };

    let nav = nav_visibility(&app.state.auth);
    let titles: Vec<Line> = if nav.admin {
        TABS.iter().map(|t| Line::from(*t)).collect()
    } else {
        vec![Line::from("Tournament Admin")]
    };
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(if nav.admin { tab_index } else { 0 })
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let mut session = Vec::new();
    if let Some(user) = app.state.auth.user.as_ref() {
        session.push(user.username.clone());
    }
    if nav.login {
        session.push("Login".to_string());
    }
    if nav.logout {
        session.push("Logout: L".to_string());
    }
    session.push("Help: ?".to_string());

    let help = Paragraph::new(format!("{} ", session.join(" | ")))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_login(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.login.form;
    let popup = centered(area, FORM_WIDTH, form_height(form));
    f.render_widget(
        FormView { form, message: app.state.login.message.as_deref() },
        popup,
    );
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Dashboard ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [cards, details] =
        Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).areas(inner);
    let card_areas: [Rect; 3] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(cards);

    let counts = app.state.store.stats();
    let labels = ["Teams", "Players", "Matches"];
    for (i, (label, card)) in labels.iter().zip(card_areas).enumerate() {
        let value = match counts {
            Some((teams, players, matches)) => [teams, players, matches][i].to_string(),
            None => "-".to_string(),
        };
        let block = default_border(Color::Cyan).title(format!(" {label} "));
        let text = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(text, card);
    }

    let summary = match app.state.store.settings() {
        Some(s) => format!(
            "{}  ·  {} teams  ·  {} to {}",
            s.tournament_name,
            s.total_teams,
            s.start_date.as_deref().map(format_date).unwrap_or_else(|| "TBD".into()),
            s.end_date.as_deref().map(format_date).unwrap_or_else(|| "TBD".into()),
        ),
        None => "Tournament settings not loaded".to_string(),
    };
    f.render_widget(
        Paragraph::new(summary)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        details,
    );
}

fn table_title(app: &App, entity: Entity, label: &str) -> String {
    match app.state.store.status(entity) {
        LoadStatus::Stale => format!(" {label} (refresh failed, showing last loaded) "),
        _ => format!(" {label} "),
    }
}

fn table_block<'a>(app: &App, entity: Entity, title: String) -> Block<'a> {
    let color = match app.state.store.status(entity) {
        LoadStatus::Stale => Color::Yellow,
        _ => Color::White,
    };
    default_border(color).title(title)
}

/// Shows the loading / empty text instead of a table. Returns true if it did.
fn draw_list_placeholder(f: &mut Frame, area: Rect, app: &App, entity: Entity, empty: &str) -> bool {
    let store = &app.state.store;
    let Some(text) = list_placeholder(store.status(entity), store.len(entity), empty) else {
        return false;
    };
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
    true
}

fn header_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn highlight_style() -> Style {
    Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
}

fn render_table(f: &mut Frame, area: Rect, table: Table, cursor: usize) {
    let mut state = TableState::default().with_selected(Some(cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_teams(f: &mut Frame, area: Rect, app: &App) {
    let block = table_block(app, Entity::Team, table_title(app, Entity::Team, "Teams"));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if draw_list_placeholder(f, inner, app, Entity::Team, EMPTY_TEAMS) {
        return;
    }

    let rows = team_rows(app.state.store.teams()).into_iter().map(|r| {
        Row::new(vec![
            Cell::from(r.name),
            Cell::from(r.coach),
            Cell::from(r.home_ground),
            Cell::from(r.players),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(30),
            Constraint::Percentage(15),
        ],
    )
    .header(Row::new(["Name", "Coach", "Home Ground", "Players"]).style(header_style()))
    .row_highlight_style(highlight_style());
    render_table(f, inner, table, app.state.cursors.teams);
}

fn draw_players(f: &mut Frame, area: Rect, app: &App) {
    let store = &app.state.store;
    let selection = store.selection();
    let loaded = store.players().len();

    let mut title = table_title(app, Entity::Player, "Players");
    if selection.bulk_delete_visible() {
        title = format!("{title}· {} selected · D=delete selected ", selection.len());
    }
    let block = table_block(app, Entity::Player, title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if draw_list_placeholder(f, inner, app, Entity::Player, EMPTY_PLAYERS) {
        return;
    }

    let rows = player_rows(store.players(), selection).into_iter().map(|r| {
        let mark = if r.selected { "[x]" } else { "[ ]" };
        Row::new(vec![
            Cell::from(mark),
            Cell::from(r.name),
            Cell::from(r.team),
            Cell::from(r.role),
            Cell::from(r.jersey),
            Cell::from(r.stats),
        ])
    });
    let header = Row::new(vec![
        Cell::from(selection.indicator(loaded).glyph()),
        Cell::from("Name"),
        Cell::from("Team"),
        Cell::from("Role"),
        Cell::from("Jersey"),
        Cell::from("Stats"),
    ])
    .style(header_style());
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
            Constraint::Length(7),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .row_highlight_style(highlight_style());
    render_table(f, inner, table, app.state.cursors.players);
}

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let block = table_block(app, Entity::Match, table_title(app, Entity::Match, "Matches"));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if draw_list_placeholder(f, inner, app, Entity::Match, EMPTY_MATCHES) {
        return;
    }

    let rows = match_rows(app.state.store.matches()).into_iter().map(|r| {
        Row::new(vec![
            Cell::from(r.date),
            Cell::from(r.fixture),
            Cell::from(r.venue),
            Cell::from(r.round),
            Cell::from(r.status),
            Cell::from(r.result),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(13),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(12),
            Constraint::Length(10),
            Constraint::Fill(1),
        ],
    )
    .header(
        Row::new(["Date", "Fixture", "Venue", "Round", "Status", "Result"]).style(header_style()),
    )
    .row_highlight_style(highlight_style());
    render_table(f, inner, table, app.state.cursors.matches);
}

fn draw_settings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Tournament Settings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(settings) = app.state.store.settings() else {
        f.render_widget(
            Paragraph::new("Loading...").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<18}"), Style::default().fg(Color::Gray)),
            Span::raw(value),
        ])
    };
    let or_unset = |value: &Option<String>| {
        value.as_deref().map(format_date).unwrap_or_else(|| "Not set".to_string())
    };
    let lines = vec![
        row("Tournament Name", settings.tournament_name.clone()),
        row("Total Teams", settings.total_teams.to_string()),
        row("Start Date", or_unset(&settings.start_date)),
        row("End Date", or_unset(&settings.end_date)),
        Line::from(""),
        Line::from(Span::styled("e=edit", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    f.render_widget(Paragraph::new(HELP_TEXT).block(block), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
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
        Rect::new(area.width.saturating_sub(3), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
