//! The card stack: top card drawn with its drag offset and tilt, the next
//! card peeking out underneath.
//!
//! The top card is rendered into a scratch buffer and copied onto the frame
//! row by row; each row is shifted horizontally to fake the rotation.

use crate::app::App;
use crate::news::NewsItem;
use crate::swipe::{Phase, SwipeGeometry, VisualState};
use crate::theme::ColorPalette;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
    Frame,
};

/// Widest a card gets; wider terminals get margins.
const MAX_CARD_WIDTH: u16 = 72;

/// Terminal cells are roughly twice as tall as wide.
const CELL_ASPECT: f64 = 2.0;

/// Opacity below which the leaving card is drawn dimmed / faded.
const DIM_BELOW: f64 = 0.75;
const FADE_BELOW: f64 = 0.35;

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let rect = card_rect(area);
    if rect.width < 4 || rect.height < 3 {
        return;
    }
    app.card_area = Some(rect);
    // Threshold and fly-off distance follow the deck area, not the card
    app.session
        .set_geometry(SwipeGeometry::new(f64::from(area.width), f64::from(area.height)));

    let Some(current) = app.session.current() else {
        render_placeholder(f, app, rect);
        return;
    };

    let next = app.session.peek_next();
    if let Some(next) = next {
        let under = CardView {
            item: next,
            saved: app.is_saved(&next.id),
            active: false,
            palette: &app.theme,
        };
        under.render(rect, f.buffer_mut());
        f.buffer_mut().set_style(rect, app.theme.card_under);
    }

    let visual = app.session.visual();
    if !top_card_visible(app.session.phase(), visual) {
        if next.is_none() {
            render_placeholder(f, app, rect);
        }
        return;
    }

    let view = CardView {
        item: current,
        saved: app.is_saved(&current.id),
        active: app.session.phase() == Phase::Dragging,
        palette: &app.theme,
    };
    let mut scratch = Buffer::empty(Rect::new(0, 0, rect.width, rect.height));
    view.render(scratch.area, &mut scratch);

    composite(&scratch, f.buffer_mut(), rect, area, visual);
}

/// A dismissed card waiting on the deck to advance is not drawn.
fn top_card_visible(phase: Phase, visual: VisualState) -> bool {
    !matches!(phase, Phase::Advancing(_)) && visual.opacity > 0.0
}

/// Centered card area inside `area`, one cell of margin on every side.
pub(super) fn card_rect(area: Rect) -> Rect {
    let width = area.width.saturating_sub(2).min(MAX_CARD_WIDTH);
    let height = area.height.saturating_sub(2);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Horizontal shift (in columns) of `row` for a card tilted by `rotation_deg`.
///
/// Positive rotation is clockwise: rows above the center move right.
pub(super) fn row_shift(row: u16, height: u16, rotation_deg: f64) -> f64 {
    let center = f64::from(height.saturating_sub(1)) / 2.0;
    let dy = f64::from(row) - center;
    -dy * CELL_ASPECT * rotation_deg.to_radians().tan()
}

/// Copy the rendered card onto `dst`, displaced and sheared, clipped to `clip`.
fn composite(card: &Buffer, dst: &mut Buffer, rect: Rect, clip: Rect, visual: VisualState) {
    let fade = if visual.opacity < FADE_BELOW {
        Some(Style::default().add_modifier(Modifier::DIM).fg(ratatui::style::Color::DarkGray))
    } else if visual.opacity < DIM_BELOW {
        Some(Style::default().add_modifier(Modifier::DIM))
    } else {
        None
    };

    let base_x = f64::from(rect.x) + visual.offset.x;
    let base_y = f64::from(rect.y) + visual.offset.y;

    for row in 0..rect.height {
        let y = (base_y + f64::from(row)).round();
        let shift = row_shift(row, rect.height, visual.rotation_deg);
        let x0 = (base_x + shift).round();

        for col in 0..rect.width {
            let x = x0 + f64::from(col);
            if !in_clip(x, y, clip) {
                continue;
            }
            let (Some(src), Some(target)) = (card.cell((col, row)), dst.cell_mut((x as u16, y as u16)))
            else {
                continue;
            };
            *target = src.clone();
            if let Some(style) = fade {
                target.set_style(style);
            }
        }
    }
}

fn in_clip(x: f64, y: f64, clip: Rect) -> bool {
    x >= f64::from(clip.x)
        && y >= f64::from(clip.y)
        && x < f64::from(clip.right())
        && y < f64::from(clip.bottom())
}

fn render_placeholder(f: &mut Frame, app: &App, rect: Rect) {
    let (text, style) = if app.session.is_loading() {
        ("Loading news...".to_string(), app.theme.card_body)
    } else if let Some(err) = app.session.last_error() {
        (format!("{}\n\nPress r to retry", err), app.theme.error)
    } else {
        ("No news available\n\nPress r to retry".to_string(), app.theme.card_body)
    };

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(app.theme.card_border),
        );
    f.render_widget(paragraph, rect);
}

// ============================================================================
// Card Widget
// ============================================================================

struct CardView<'a> {
    item: &'a NewsItem,
    saved: bool,
    active: bool,
    palette: &'a ColorPalette,
}

impl Widget for CardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let item = self.item;
        let inner_width = area.width.saturating_sub(4) as usize;

        let category = strip_control_chars(&item.category);
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.active { p.card_border_active } else { p.card_border })
            .title(Span::styled(format!(" {} ", category), p.card_category))
            .title_bottom(
                Line::from(Span::styled(
                    format!(" {} ", item.created_at.format("%b %d, %Y")),
                    p.list_meta,
                ))
                .right_aligned(),
            );
        if self.saved {
            block = block.title(
                Line::from(Span::styled(" ★ Saved ", p.card_saved)).right_aligned(),
            );
        }

        let mut lines = vec![
            Line::from(Span::styled(strip_control_chars(&item.title).into_owned(), p.card_title)),
            Line::default(),
            Line::from(Span::styled(strip_control_chars(&item.content).into_owned(), p.card_body)),
            Line::default(),
            Line::from(Span::styled("Why it matters", p.card_label)),
            Line::from(Span::styled(strip_control_chars(&item.why).into_owned(), p.card_body)),
            Line::default(),
            Line::from(Span::styled("How to use it", p.card_label)),
            Line::from(Span::styled(strip_control_chars(&item.how).into_owned(), p.card_body)),
        ];

        if let Some(link) = &item.action_url {
            let link = strip_control_chars(link);
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("↗ ", p.card_label),
                Span::styled(
                    truncate_to_width(&link, inner_width.saturating_sub(2)).into_owned(),
                    p.card_link,
                ),
            ]));
        }

        Paragraph::new(lines)
            .block(block.padding(ratatui::widgets::Padding::horizontal(1)))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swipe::{Offset, SwipeDirection};

    #[test]
    fn test_card_rect_is_centered_and_capped() {
        let rect = card_rect(Rect::new(0, 1, 200, 30));
        assert_eq!(rect.width, MAX_CARD_WIDTH);
        assert_eq!(rect.height, 28);
        assert_eq!(rect.x, (200 - MAX_CARD_WIDTH) / 2);
        assert_eq!(rect.y, 2);

        let narrow = card_rect(Rect::new(0, 0, 40, 20));
        assert_eq!(narrow.width, 38);
        assert_eq!(narrow.x, 1);
    }

    #[test]
    fn test_row_shift_tilts_around_center() {
        assert_eq!(row_shift(5, 11, 0.0), 0.0);
        assert!(row_shift(5, 11, 15.0).abs() < 1e-9);
        // Clockwise: top moves right, bottom moves left
        assert!(row_shift(0, 11, 15.0) > 0.0);
        assert!(row_shift(10, 11, 15.0) < 0.0);
        assert!((row_shift(0, 11, 15.0) + row_shift(10, 11, 15.0)).abs() < 1e-9);
    }

    #[test]
    fn test_dismissed_card_is_hidden() {
        let visible = VisualState::REST;
        let faded = VisualState {
            opacity: 0.0,
            ..VisualState::REST
        };
        assert!(top_card_visible(Phase::Idle, visible));
        assert!(top_card_visible(Phase::Committing(SwipeDirection::Left), visible));
        assert!(!top_card_visible(Phase::Committing(SwipeDirection::Left), faded));
        assert!(!top_card_visible(Phase::Advancing(SwipeDirection::Right), visible));
    }

    #[test]
    fn test_composite_applies_offset_and_clips() {
        let mut card = Buffer::empty(Rect::new(0, 0, 3, 1));
        card.set_string(0, 0, "abc", Style::default());
        let mut dst = Buffer::empty(Rect::new(0, 0, 10, 1));
        let visual = VisualState {
            offset: Offset::new(8.0, 0.0),
            rotation_deg: 0.0,
            opacity: 1.0,
        };

        let clip = dst.area;
        composite(&card, &mut dst, Rect::new(0, 0, 3, 1), clip, visual);

        assert_eq!(dst.cell((8, 0)).map(|c| c.symbol()), Some("a"));
        assert_eq!(dst.cell((9, 0)).map(|c| c.symbol()), Some("b"));
        // "c" falls outside the clip area and is dropped
        assert_eq!(dst.cell((0, 0)).map(|c| c.symbol()), Some(" "));
    }

    #[test]
    fn test_composite_dims_fading_card() {
        let mut card = Buffer::empty(Rect::new(0, 0, 1, 1));
        card.set_string(0, 0, "x", Style::default());
        let mut dst = Buffer::empty(Rect::new(0, 0, 1, 1));
        let visual = VisualState {
            offset: Offset::ZERO,
            rotation_deg: 0.0,
            opacity: 0.5,
        };

        let area = dst.area;
        composite(&card, &mut dst, area, area, visual);

        let cell = dst.cell((0, 0)).unwrap();
        assert!(cell.modifier.contains(Modifier::DIM));
    }
}
