//! Keyboard and mouse input handling.
//!
//! Overlays (confirmation, language picker) capture all keys while open;
//! otherwise keys are dispatched by view.

use crate::app::{App, AppEvent, ConfirmAction, DragAnchor, View};
use crate::swipe::{Offset, SwipeDirection};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

use super::helpers::{open_link, spawn_reload};
use super::Action;

/// Main key dispatch.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    if app.pending_confirm.is_some() {
        return Ok(handle_confirm_input(app, code).await);
    }

    if app.language_picker.is_some() {
        return Ok(handle_picker_input(app, code, event_tx).await);
    }

    match app.view {
        View::Deck => Ok(handle_deck_input(app, code, event_tx).await),
        View::Saved => Ok(handle_saved_input(app, code).await),
    }
}

async fn handle_confirm_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(ConfirmAction::ClearSaved) = app.pending_confirm.take() {
                app.clear_saved().await;
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_confirm = None;
        }
        _ => {}
    }
    Action::Continue
}

async fn handle_picker_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.move_language_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_language_selection(-1),
        KeyCode::Enter => {
            if let Some(code) = app.confirm_language_picker() {
                let ticket = app.change_language(&code).await;
                spawn_reload(ticket, event_tx);
            }
        }
        KeyCode::Esc | KeyCode::Char('L') | KeyCode::Char('q') => {
            app.language_picker = None;
        }
        _ => {}
    }
    Action::Continue
}

async fn handle_deck_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Left | KeyCode::Char('h') => swipe(app, SwipeDirection::Left),
        KeyCode::Right | KeyCode::Char('l') => swipe(app, SwipeDirection::Right),
        KeyCode::Char('s') => app.toggle_save_current().await,
        KeyCode::Char('o') | KeyCode::Enter => {
            let link = app.session.current().and_then(|i| i.action_url.clone());
            if app.session.current().is_some() {
                open_link(app, link);
            }
        }
        KeyCode::Char('v') => {
            app.release_drag();
            app.load_saved().await;
            app.view = View::Saved;
        }
        KeyCode::Char('L') => app.open_language_picker(),
        KeyCode::Char('t') => app.toggle_dark_mode().await,
        KeyCode::Char('r') => {
            if let Some(ticket) = app.reload() {
                spawn_reload(ticket, event_tx);
            }
        }
        _ => {}
    }
    Action::Continue
}

fn swipe(app: &mut App, direction: SwipeDirection) {
    if app.session.current().is_none() {
        if !app.session.is_loading() {
            app.set_status("No news loaded. Press r to retry");
        }
        return;
    }
    // Ignored while the previous card is still flying off
    app.session.swipe(direction);
}

async fn handle_saved_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.select_next_saved(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev_saved(),
        KeyCode::Char('d') | KeyCode::Delete => app.remove_selected_saved().await,
        KeyCode::Char('C') => {
            if !app.saved_items.is_empty() {
                app.pending_confirm = Some(ConfirmAction::ClearSaved);
            }
        }
        KeyCode::Char('o') | KeyCode::Enter => {
            if let Some(item) = app.selected_saved() {
                let link = item.action_url.clone();
                open_link(app, link);
            }
        }
        KeyCode::Char('L') => app.open_language_picker(),
        KeyCode::Char('t') => app.toggle_dark_mode().await,
        KeyCode::Esc | KeyCode::Char('v') | KeyCode::Char('b') => app.view = View::Deck,
        _ => {}
    }
    Action::Continue
}

/// Mouse drags over the top card drive the swipe gesture.
pub(super) fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.view != View::Deck || app.pending_confirm.is_some() || app.language_picker.is_some() {
        if matches!(mouse.kind, MouseEventKind::Up(_)) {
            app.release_drag();
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let inside = app.card_area.is_some_and(|area| {
                area.contains(ratatui::layout::Position::new(mouse.column, mouse.row))
            });
            if inside && app.session.begin_drag() {
                app.drag_anchor = Some(DragAnchor {
                    column: mouse.column,
                    row: mouse.row,
                });
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(anchor) = app.drag_anchor {
                app.session.update_drag(drag_translation(anchor, mouse.column, mouse.row));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(anchor) = app.drag_anchor.take() {
                app.session.update_drag(drag_translation(anchor, mouse.column, mouse.row));
                let phase = app.session.end_drag();
                tracing::debug!(?phase, "Drag released");
            }
        }
        _ => {}
    }
}

fn drag_translation(anchor: DragAnchor, column: u16, row: u16) -> Offset {
    Offset::new(
        f64::from(column) - f64::from(anchor.column),
        f64::from(row) - f64::from(anchor.row),
    )
}
