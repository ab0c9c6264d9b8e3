use crate::app::AppState;
use crate::domain::{format_hhmm, ScheduleItem};
use crate::ui::styles::{border_style, muted_style, selected_style, title_style, trashed_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Create a line for a trashed item
fn create_trash_line(item: &ScheduleItem) -> Line<'static> {
    Line::from(vec![
        Span::styled("🗑 ".to_string(), muted_style()),
        Span::styled(
            format!("{} {} ", item.date, format_hhmm(item.time_start)),
            muted_style(),
        ),
        Span::styled(item.name.clone(), trashed_style()),
    ])
}

/// Render the trash list
pub fn render_trash_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let trash = app.trash();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(format!(" Trash ({}) ", trash.len()), title_style()));

    if trash.is_empty() {
        let empty = Paragraph::new("Trash is empty").style(muted_style()).block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = trash
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let line = create_trash_line(item);
            if idx == app.trash_index {
                ListItem::new(line).style(selected_style())
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
