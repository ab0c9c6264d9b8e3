use crate::app::AppState;
use crate::domain::{enrichment_coverage, format_amount};
use crate::domain::trip::FlightLeg;
use crate::ui::styles::{
    border_style, default_style, money_style, muted_style, pending_style, selected_style,
    title_style,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

fn flight_line(label: &'static str, leg: &FlightLeg) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, title_style()),
        Span::raw(format!(
            "{}  {}  {}  {} → {}",
            leg.flight, leg.date, leg.time, leg.from, leg.to
        )),
    ])
}

/// Phrase list on the left
fn render_phrases(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .trip
        .phrases
        .iter()
        .enumerate()
        .map(|(idx, phrase)| {
            let line = Line::from(vec![
                Span::raw(phrase.label.clone()),
                Span::styled(format!("  {}", phrase.local), muted_style()),
            ]);
            let style = if idx == app.phrase_index {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Phrases ", title_style())),
    );
    f.render_widget(list, area);
}

/// Totals, batch progress, flights and stays on the right
fn render_overview(f: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let (done, total) = enrichment_coverage(app.schedule.items());
    let (ratio, label) = match &app.batch {
        Some(progress) if progress.total > 0 => (
            progress.settled as f64 / progress.total as f64,
            format!("Filling details {}/{}", progress.settled, progress.total),
        ),
        _ if total > 0 => (
            done as f64 / total as f64,
            format!("Details {}/{} (F to fill)", done, total),
        ),
        _ => (1.0, "Nothing needs details".to_string()),
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" AI details ", title_style())),
        )
        .gauge_style(pending_style())
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, chunks[0]);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Trip total: ", title_style()),
            Span::styled(format_amount(app.global_total()), money_style()),
        ]),
        Line::raw(""),
        flight_line("Out: ", &app.trip.flights.outbound),
        flight_line("Back: ", &app.trip.flights.inbound),
        Line::raw(""),
        Line::from(Span::styled("Stays", title_style())),
    ];
    for stay in &app.trip.accommodations {
        lines.push(Line::raw(format!("  {}  {}  {}", stay.date, stay.name, stay.price)));
        if !stay.note.is_empty() {
            lines.push(Line::from(Span::styled(format!("         {}", stay.note), muted_style())));
        }
    }
    if let Some(summary) = &app.last_batch {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!(
                "Last batch: {} filled, {} failed",
                summary.succeeded, summary.failed
            ),
            muted_style(),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Trip ", title_style())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[1]);
}

/// Render the toolbox view across the list and details areas
pub fn render_toolbox(f: &mut Frame, app: &AppState, list_area: Rect, side_area: Rect) {
    render_phrases(f, app, list_area);
    render_overview(f, app, side_area);
}
