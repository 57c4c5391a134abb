use crate::app::MenuItem;
use crate::state::forms::FormState;
use crate::state::messages::NetworkRequest;
use crate::state::store::{AdminStore, Entity};
use std::collections::VecDeque;
use tourney_api::AuthStatus;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Screen {
    /// Waiting for the first auth check. Nothing admin-only is drawn.
    #[default]
    Connecting,
    Login,
    Admin,
}

// ---------------------------------------------------------------------------
// Blocking dialogs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Alert { message: String, is_error: bool },
    /// The request is only sent once the user answers yes.
    Confirm { message: String, request: NetworkRequest },
}

impl Dialog {
    pub fn info(message: impl Into<String>) -> Self {
        Dialog::Alert { message: message.into(), is_error: false }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Dialog::Alert { message: message.into(), is_error: true }
    }
}

// ---------------------------------------------------------------------------
// Login screen
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct LoginState {
    pub form: FormState,
    pub message: Option<String>,
}

impl Default for LoginState {
    fn default() -> Self {
        Self { form: FormState::login(), message: None }
    }
}

// ---------------------------------------------------------------------------
// Table cursors
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
pub struct TableCursors {
    pub teams: usize,
    pub players: usize,
    pub matches: usize,
}

impl TableCursors {
    pub fn get(&self, entity: Entity) -> usize {
        match entity {
            Entity::Team => self.teams,
            Entity::Player => self.players,
            Entity::Match => self.matches,
        }
    }

    fn slot(&mut self, entity: Entity) -> &mut usize {
        match entity {
            Entity::Team => &mut self.teams,
            Entity::Player => &mut self.players,
            Entity::Match => &mut self.matches,
        }
    }

    pub fn down(&mut self, entity: Entity, len: usize) {
        let cursor = self.slot(entity);
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    pub fn up(&mut self, entity: Entity) {
        let cursor = self.slot(entity);
        *cursor = cursor.saturating_sub(1);
    }

    /// Keep the cursor on a row after the list shrank.
    pub fn clamp(&mut self, entity: Entity, len: usize) {
        let cursor = self.slot(entity);
        *cursor = (*cursor).min(len.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub screen: Screen,
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub auth: AuthStatus,
    pub store: AdminStore,
    pub cursors: TableCursors,
    pub login: LoginState,
    /// Open create/edit/result/settings form.
    pub modal: Option<FormState>,
    /// Front entry is on screen; the rest wait their turn.
    pub dialogs: VecDeque<Dialog>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialogs.push_back(dialog);
    }

    pub fn dismiss_dialog(&mut self) -> Option<Dialog> {
        self.dialogs.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_in_bounds() {
        let mut cursors = TableCursors::default();
        cursors.up(Entity::Team);
        assert_eq!(cursors.get(Entity::Team), 0);

        cursors.down(Entity::Team, 2);
        cursors.down(Entity::Team, 2);
        assert_eq!(cursors.get(Entity::Team), 1);

        cursors.clamp(Entity::Team, 0);
        assert_eq!(cursors.get(Entity::Team), 0);
        assert_eq!(cursors.get(Entity::Match), 0);
    }

    #[test]
    fn dialogs_show_in_order() {
        let mut state = AppState::new();
        state.push_dialog(Dialog::info("Team created successfully"));
        state.push_dialog(Dialog::error("Team saved, but logo upload failed"));
        assert_eq!(state.dialog(), Some(&Dialog::info("Team created successfully")));
        state.dismiss_dialog();
        assert!(matches!(state.dialog(), Some(Dialog::Alert { is_error: true, .. })));
        state.dismiss_dialog();
        assert!(state.dialog().is_none());
    }
}
