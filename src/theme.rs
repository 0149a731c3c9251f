//! Theme system for the TUI.
//!
//! Semantic color roles resolved to ratatui `Style`s. The `dark_mode`
//! preference picks between the Dark and Light palettes.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    pub background: Style,
    pub header: Style,
    pub header_accent: Style,

    // -- Card --
    pub card_border: Style,
    pub card_border_active: Style,
    pub card_title: Style,
    pub card_body: Style,
    pub card_label: Style,
    pub card_category: Style,
    pub card_saved: Style,
    pub card_link: Style,
    pub card_under: Style,

    // -- Lists & overlays --
    pub list_normal: Style,
    pub list_selected: Style,
    pub list_meta: Style,
    pub overlay_border: Style,
    pub overlay_text: Style,
    pub error: Style,

    pub status_bar: Style,
}

impl ColorPalette {
    pub fn dark() -> Self {
        Self {
            background: Style::default().bg(Color::Black).fg(Color::White),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Cyan),

            card_border: Style::default().fg(Color::Gray),
            card_border_active: Style::default().fg(Color::Cyan),
            card_title: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            card_body: Style::default().fg(Color::Gray),
            card_label: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            card_category: Style::default().fg(Color::Black).bg(Color::Cyan),
            card_saved: Style::default().fg(Color::Yellow),
            card_link: Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            card_under: Style::default().fg(Color::DarkGray),

            list_normal: Style::default().fg(Color::White),
            list_selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            list_meta: Style::default().fg(Color::DarkGray),
            overlay_border: Style::default().fg(Color::Yellow),
            overlay_text: Style::default().fg(Color::White),
            error: Style::default().fg(Color::Red),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Style::default().bg(Color::White).fg(Color::Black),
            header: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Blue),

            card_border: Style::default().fg(Color::DarkGray),
            card_border_active: Style::default().fg(Color::Blue),
            card_title: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            card_body: Style::default().fg(Color::DarkGray),
            card_label: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            card_category: Style::default().fg(Color::White).bg(Color::Blue),
            card_saved: Style::default().fg(Color::Magenta),
            card_link: Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            card_under: Style::default().fg(Color::Gray),

            list_normal: Style::default().fg(Color::Black),
            list_selected: Style::default().fg(Color::White).bg(Color::Blue),
            list_meta: Style::default().fg(Color::Gray),
            overlay_border: Style::default().fg(Color::Magenta),
            overlay_text: Style::default().fg(Color::Black),
            error: Style::default().fg(Color::Red),

            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_from_dark_mode() {
        assert_eq!(ThemeVariant::from_dark_mode(true), ThemeVariant::Dark);
        assert_eq!(ThemeVariant::from_dark_mode(false), ThemeVariant::Light);
    }

    #[test]
    fn test_palettes_differ() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.background, light.background);
        assert_ne!(dark.status_bar, light.status_bar);
    }
}
