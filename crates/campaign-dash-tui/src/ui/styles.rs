use ratatui::style::{Color, Modifier, Style};

use campaign_dash_core::dashboard::catalog::Rgb;

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);
pub const TILE_BG: Color = Color::Rgb(24, 24, 30);
pub const TILE_BG_RAISED: Color = Color::Rgb(40, 40, 52);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for the toolbar button of a host action
pub fn action_button_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

// Dashboard tiles

pub fn metric_color(color: Rgb) -> Color {
    let Rgb(r, g, b) = color;
    Color::Rgb(r, g, b)
}

pub fn tile_value_style(color: Rgb) -> Style {
    Style::default()
        .fg(metric_color(color))
        .add_modifier(Modifier::BOLD)
}

pub fn tile_label_style() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::BOLD)
}

pub fn tile_body_style(hovered: bool) -> Style {
    if hovered {
        Style::default().bg(TILE_BG_RAISED)
    } else {
        Style::default().bg(TILE_BG)
    }
}

/// Tile border: accent colored when hovered or keyboard-selected
pub fn tile_border_style(color: Rgb, hovered: bool, selected: bool) -> Style {
    if hovered {
        Style::default()
            .fg(metric_color(color))
            .add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default().fg(metric_color(color))
    } else {
        Style::default().fg(MUTED)
    }
}
