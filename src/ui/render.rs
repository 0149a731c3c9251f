//! Render dispatch for the TUI.

use crate::app::{App, ConfirmAction, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{card, saved, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        // Drags need a card to land on
        app.card_area = None;
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    f.render_widget(Block::default().style(app.theme.background), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    match app.view {
        View::Deck => {
            card::render(f, app, chunks[1]);
            render_position(f, app, chunks[2]);
        }
        View::Saved => {
            app.card_area = None;
            saved::render(f, app, chunks[1].union(chunks[2]));
        }
    }
    status::render(f, app, chunks[3]);

    if app.language_picker.is_some() {
        render_language_overlay(f, app);
    }

    if let Some(confirm) = app.pending_confirm {
        render_confirm_overlay(f, app, confirm);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let code = app.session.language();
    let language = app
        .languages
        .iter()
        .find(|l| l.code == code)
        .map(|l| format!("{} {}", l.flag, l.name))
        .unwrap_or_else(|| code.to_string());

    let view = match app.view {
        View::Deck => "Feed",
        View::Saved => "Saved",
    };

    let line = Line::from(vec![
        Span::styled(" newsdeck ", app.theme.header),
        Span::styled(format!("· {} ", view), app.theme.list_meta),
        Span::styled(language, app.theme.header_accent),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// "3 of 10" under the card.
fn render_position(f: &mut Frame, app: &App, area: Rect) {
    let deck = app.session.deck();
    if deck.is_empty() {
        return;
    }
    let text = format!("{} of {}", app.session.current_index() + 1, deck.len());
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(app.theme.list_meta),
        area,
    );
}

fn overlay_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_language_overlay(f: &mut Frame, app: &App) {
    let Some(picker) = &app.language_picker else {
        return;
    };

    let overlay = overlay_rect(f.area(), 32, app.languages.len() as u16 + 2);
    if overlay.width < 10 || overlay.height < 3 {
        return;
    }
    f.render_widget(Clear, overlay);

    let active = app.session.language();
    let items: Vec<ListItem> = app
        .languages
        .iter()
        .map(|l| {
            let marker = if l.code == active { "●" } else { " " };
            ListItem::new(format!("{} {} {}", marker, l.flag, l.name))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.overlay_border)
                .title(" Language "),
        )
        .style(app.theme.overlay_text)
        .highlight_style(app.theme.list_selected);

    let mut state = ListState::default().with_selected(Some(picker.selected));
    f.render_stateful_widget(list, overlay, &mut state);
}

fn render_confirm_overlay(f: &mut Frame, app: &App, confirm: ConfirmAction) {
    let text = match confirm {
        ConfirmAction::ClearSaved => format!(
            "Remove all {} saved articles?\n\n(y) Confirm  (n/Esc) Cancel",
            app.saved_items.len()
        ),
    };

    let overlay = overlay_rect(f.area(), 44, 6);
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.overlay_border)
                .title(" Confirm "),
        )
        .alignment(Alignment::Center)
        .style(app.theme.overlay_text);

    f.render_widget(paragraph, overlay);
}
