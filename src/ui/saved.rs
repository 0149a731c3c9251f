use crate::app::App;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the saved-articles list.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let p = &app.theme;

    if app.saved_items.is_empty() {
        let text = vec![
            Line::from(Span::styled("No saved articles yet", p.card_title)),
            Line::default(),
            Line::from(Span::styled(
                "Save articles while reading to access them here",
                p.list_meta,
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(p.card_border)
            .title(" Saved ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        // Vertically center the three lines
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(3), Constraint::Fill(1)])
            .split(inner);
        f.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            rows[1],
        );
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .saved_items
        .iter()
        .map(|item| {
            let title = strip_control_chars(&item.title);
            let category = strip_control_chars(&item.category);
            let content = strip_control_chars(&item.content);
            let meta = format!("{} · {}", category, content);
            ListItem::new(vec![
                Line::from(Span::styled(
                    truncate_to_width(&title, width).into_owned(),
                    p.card_title,
                )),
                Line::from(Span::styled(
                    truncate_to_width(&meta, width).into_owned(),
                    p.list_meta,
                )),
                Line::default(),
            ])
        })
        .collect();

    let count = app.saved_items.len();
    let title = format!(
        " {} article{} saved ",
        count,
        if count == 1 { "" } else { "s" }
    );

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(p.card_border)
                .title(title),
        )
        .style(p.list_normal)
        .highlight_style(p.list_selected);

    let mut state = ListState::default().with_selected(Some(app.saved_selected));
    f.render_stateful_widget(list, area, &mut state);
}
