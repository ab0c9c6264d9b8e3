use crate::app::AppState;
use crate::domain::{detail_marker, format_amount, format_hhmm, ScheduleItem, Trip, View};
use crate::ui::styles::{
    border_style, branch_style, category_style, default_style, money_style, muted_style,
    pending_style, selected_style, time_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

/// Label for a day tab: "D1 08/05 Tue"
fn day_label(trip: &Trip, date: &str) -> String {
    let weekday = trip
        .days
        .iter()
        .find(|d| d.date == date)
        .map(|d| d.weekday.as_str())
        .unwrap_or("");
    match trip.day_index(date) {
        Some(idx) => format!("D{} {} {}", idx + 1, date, weekday).trim_end().to_string(),
        None => date.to_string(),
    }
}

/// Plan switcher text for split days, e.g. "Plan A: West shore sights (1/2)"
pub fn branch_caption(app: &AppState) -> Option<String> {
    let branches = app.trip.branches_for(&app.active_date)?;
    let tag = app.active_branch.as_deref()?;
    let position = branches.keys().position(|k| k == tag)?;
    Some(format!(
        "Plan {}: {} ({}/{})",
        tag,
        branches[tag],
        position + 1,
        branches.len()
    ))
}

/// Render the header: day tabs on the itinerary, view tabs elsewhere
pub fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (titles, selected, caption): (Vec<String>, usize, String) = match app.view {
        View::Itinerary => {
            let dates = app.tab_dates();
            let selected = dates
                .iter()
                .position(|d| *d == app.active_date)
                .unwrap_or(0);
            let titles = dates.iter().map(|d| day_label(&app.trip, d)).collect();
            let caption = match branch_caption(app) {
                Some(plan) => format!(" {} · {} ", app.trip.title, plan),
                None => format!(" {} ", app.trip.title),
            };
            (titles, selected, caption)
        }
        View::Toolbox | View::Trash => {
            let views = [View::Itinerary, View::Toolbox, View::Trash];
            let selected = views.iter().position(|v| *v == app.view).unwrap_or(0);
            let titles = views.iter().map(|v| v.name().to_string()).collect();
            (titles, selected, format!(" {} ", app.trip.title))
        }
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(default_style())
        .highlight_style(selected_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(caption, title_style())),
        );
    f.render_widget(tabs, area);
}

/// Create the two-line card for an item
/// Format: 20:25-00:45  🚆 Flight TPE to HND  [A]  4hr 20m  ¥12,000  📖
pub fn create_item_card(item: &ScheduleItem, pending: bool, show_branch: bool) -> Vec<Line<'static>> {
    let mut spans = vec![
        Span::styled(
            format!("{}-{}  ", format_hhmm(item.time_start), format_hhmm(item.time_end)),
            time_style(),
        ),
        Span::styled(format!("{} ", item.category.symbol()), category_style(item.category)),
        Span::raw(item.name.clone()),
    ];

    if show_branch {
        if let Some(tag) = &item.plan_branch {
            spans.push(Span::styled(format!("  [{}]", tag), branch_style()));
        }
    }

    spans.push(Span::styled(format!("  {}", item.duration_display()), muted_style()));

    let spent = item.expense_total();
    if spent > 0.0 {
        spans.push(Span::styled(format!("  {}", format_amount(spent)), money_style()));
    }

    if let Some(marker) = detail_marker(item, pending) {
        let style = if pending { pending_style() } else { muted_style() };
        spans.push(Span::styled(format!("  {}", marker), style));
    }

    let mut lines = vec![Line::from(spans)];
    let subtitle = item
        .summary()
        .and_then(|s| s.header.clone())
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| item.short_description.clone());
    let tip = item
        .summary()
        .and_then(|s| s.one_line_tip.clone())
        .filter(|t| !t.trim().is_empty());

    let mut second = vec![Span::raw("             ")];
    if !subtitle.trim().is_empty() {
        second.push(Span::styled(subtitle, muted_style()));
    }
    if let Some(tip) = tip {
        second.push(Span::styled(format!("  💡 {}", tip), pending_style()));
    }
    if second.len() > 1 {
        lines.push(Line::from(second));
    }
    lines
}

/// Render the timeline of the active day
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let visible = app.visible();
    let show_branch = app.trip.has_branches(&app.active_date);

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let card = create_item_card(item, app.pending.contains(&item.id), show_branch);
            let style = if idx == app.selected_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(card).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(
            format!(" {} ({}) ", app.active_date, visible.len()),
            title_style(),
        ))
        .title_bottom(Line::from(Span::styled(
            format!(" Day total {} ", format_amount(app.daily_total())),
            money_style(),
        )));

    if items.is_empty() {
        let empty = Paragraph::new("Nothing planned yet. Press a to add a stop.")
            .style(muted_style())
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    f.render_widget(List::new(items).block(block), area);
}
