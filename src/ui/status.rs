use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        msg.clone()
    } else if app.pending_confirm.is_some() {
        Cow::Borrowed("(y) confirm  (n/Esc) cancel")
    } else if app.language_picker.is_some() {
        Cow::Borrowed("[j/k]move [Enter]select [Esc]close")
    } else if app.session.is_loading() {
        Cow::Borrowed("Loading news...")
    } else {
        match app.view {
            View::Deck => Cow::Borrowed(
                "[←/→]swipe [s]ave [o]pen [v]saved [L]anguage [t]heme [r]eload [q]uit",
            ),
            View::Saved => Cow::Borrowed(
                "[j/k]move [o]pen [d]elete [C]lear all [Esc]back [L]anguage [t]heme [q]uit",
            ),
        }
    };

    f.render_widget(Paragraph::new(text).style(app.theme.status_bar), area);
}
