use crate::domain::{UiMode, View};
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

/// Hint text for the current mode and view
pub fn hints_for(mode: UiMode, view: View) -> &'static str {
    match mode {
        UiMode::AddingItem | UiMode::EditingItem => {
            " Tab/↑↓ field   ←/→ category   Ctrl+A autofill   Enter save   Esc cancel   (Notes: Enter add, Ctrl+D delete, Ctrl+Z undo)"
        }
        UiMode::EditingExpenses => {
            " Tab field   Enter add   x remove (list)   Ctrl+S save   Esc discard"
        }
        UiMode::ViewingDetails => " ↑/↓ scroll   f fetch details   g map   i social   Esc close",
        UiMode::ViewingPhrase => " Esc close",
        UiMode::Help => " any key to close",
        UiMode::Normal => match view {
            View::Itinerary => {
                " ↑/↓ select   Shift+↑/↓ reorder   ←/→ day   b plan   a add   e edit   $ expenses   Enter details   x trash   Tab view   ? help   q quit"
            }
            View::Trash => " ↑/↓ select   r restore   x delete forever   Tab view   q quit",
            View::Toolbox => " ↑/↓ phrase   Enter show   F fill all details   Tab view   q quit",
        },
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, view: View, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints_for(mode, view))).style(hint_style());
    f.render_widget(paragraph, area);
}
