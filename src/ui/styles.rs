use crate::domain::Category;
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Accent colour per category
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Transport => Color::Blue,
        Category::Logistics => Color::Gray,
        Category::Sight => Color::Green,
        Category::Food => Color::LightRed,
        Category::Scouting => Color::Magenta,
        Category::Hub => Color::Yellow,
    }
}

pub fn category_style(category: Category) -> Style {
    Style::default()
        .fg(category_color(category))
        .add_modifier(Modifier::BOLD)
}

/// Start/end time column
pub fn time_style() -> Style {
    Style::default().fg(Color::LightYellow)
}

/// Secondary text such as descriptions and durations
pub fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Money amounts
pub fn money_style() -> Style {
    Style::default()
        .fg(Color::LightGreen)
        .add_modifier(Modifier::BOLD)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Pending enrichment marker
pub fn pending_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Trashed rows
pub fn trashed_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Plan branch badge style
pub fn branch_style() -> Style {
    Style::default().fg(Color::Blue)
}
