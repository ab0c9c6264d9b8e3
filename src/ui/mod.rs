pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;
pub mod toolbox_pane;
pub mod trash_pane;

use crate::app::AppState;
use crate::domain::{UiMode, View};
use details_pane::render_details_pane;
use input_form::{render_expense_form, render_input_form};
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::{render_header, render_list_pane};
use modal::{render_details_viewer, render_help, render_phrase_card};
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::Paragraph,
    Frame,
};
use styles::{hint_style, pending_style};
use toolbox_pane::render_toolbox;
use trash_pane::render_trash_pane;

fn render_status(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match (&app.batch, &app.status) {
        (Some(progress), _) => Span::styled(
            format!(
                " ⏳ Filling details {}/{} ({} failed)",
                progress.settled, progress.total, progress.failed
            ),
            pending_style(),
        ),
        (None, Some(message)) => Span::styled(format!(" {}", message), hint_style()),
        (None, None) => Span::raw(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, app.view, layout.keybindings_area);
    render_header(f, app, layout.header_area);

    match app.view {
        View::Itinerary => {
            render_list_pane(f, app, layout.list_area);
            render_details_pane(f, app, layout.details_area);
        }
        View::Trash => {
            render_trash_pane(f, app, layout.list_area);
            render_details_pane(f, app, layout.details_area);
        }
        View::Toolbox => render_toolbox(f, app, layout.list_area, layout.details_area),
    }

    render_status(f, app, layout.status_area);

    match app.ui_mode {
        UiMode::AddingItem | UiMode::EditingItem => render_input_form(f, app, size),
        UiMode::EditingExpenses => render_expense_form(f, app, size),
        UiMode::ViewingDetails => render_details_viewer(f, app, size),
        UiMode::ViewingPhrase => render_phrase_card(f, app, size),
        UiMode::Help => render_help(f, size),
        UiMode::Normal => {}
    }
}
