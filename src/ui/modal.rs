use crate::app::AppState;
use crate::domain::Details;
use crate::ui::{
    details_pane::item_lines,
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style, muted_style, pending_style, title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn section(lines: &mut Vec<Line<'static>>, title: &'static str, body: &Option<String>) {
    if let Some(text) = body.as_ref().filter(|t| !t.trim().is_empty()) {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(title, title_style())));
        lines.extend(text.lines().map(|l| Line::raw(l.to_string())));
    }
}

fn list_section(lines: &mut Vec<Line<'static>>, title: &'static str, entries: &[String]) {
    if !entries.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(title, title_style())));
        lines.extend(entries.iter().map(|e| Line::raw(format!("  • {}", e))));
    }
}

/// Lines for the long-form narrative
pub fn details_lines(details: &Details) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(title) = &details.title {
        lines.push(Line::from(Span::styled(title.clone(), modal_title_style())));
    }
    section(&mut lines, "Story", &details.content);
    section(&mut lines, "History", &details.history);
    section(&mut lines, "Photo advice", &details.photo_advice);
    section(&mut lines, "Experience", &details.experience_tip);
    section(&mut lines, "Guide says", &details.guide_advice);
    list_section(&mut lines, "Must eat", &details.must_eat);
    list_section(&mut lines, "Must buy", &details.must_buy);
    list_section(&mut lines, "Must see", &details.must_list);
    section(&mut lines, "Recommendation", &details.recommendation);
    lines
}

/// Render the details viewer for one item
pub fn render_details_viewer(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(item) = app.viewed_item() else {
        return;
    };
    let modal_area = create_modal_area(area, area.height.saturating_sub(4));
    f.render_widget(Clear, modal_area);

    let mut lines = item_lines(item);
    lines.push(Line::raw(""));
    match item.details() {
        Some(details) if details.has_content() => lines.extend(details_lines(details)),
        _ if app.pending.contains(&item.id) => lines.push(Line::from(Span::styled(
            "⏳ Fetching details…",
            pending_style(),
        ))),
        _ => lines.push(Line::from(Span::styled(
            "Details content missing. Press f here, or run F to fill every stop.",
            muted_style(),
        ))),
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", item.name), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.details_scroll, 0));

    f.render_widget(paragraph, modal_area);
}

/// Render a phrase card in large type
pub fn render_phrase_card(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(phrase) = app.selected_phrase() else {
        return;
    };
    let modal_area = create_modal_area(area, 9);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(format!("  {}", phrase.local), modal_title_style())),
        Line::raw(""),
        Line::raw(format!("  {}", phrase.romanized)),
        Line::from(Span::styled(format!("  ({})", phrase.label), muted_style())),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Phrase ", modal_title_style()))
            .style(modal_bg_style()),
    );
    f.render_widget(paragraph, modal_area);
}

const HELP: &[(&str, &str)] = &[
    ("←/→", "switch day"),
    ("b", "switch plan on split days"),
    ("↑/↓", "select stop"),
    ("Shift+↑/↓", "reorder stops with the same start"),
    ("a / e", "add / edit stop"),
    ("$", "edit expenses"),
    ("Enter", "open details"),
    ("f", "fetch AI details for the stop"),
    ("F", "fill details for every stop missing them"),
    ("g / i", "open map / social search"),
    ("x", "move to trash (in trash: delete forever)"),
    ("r", "restore from trash"),
    ("Tab", "cycle Itinerary, Toolbox, Trash"),
    ("q", "quit"),
];

/// Render the help overlay
pub fn render_help(f: &mut Frame, area: Rect) {
    let modal_area = create_modal_area(area, HELP.len() as u16 + 4);
    f.render_widget(Clear, modal_area);

    let mut lines = vec![Line::raw("")];
    lines.extend(HELP.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", keys), modal_title_style()),
            Span::raw(*action),
        ])
    }));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Keys ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, modal_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_lines_skip_empty_sections() {
        let details = Details {
            title: Some("Takeda Shrine".to_string()),
            content: Some("Built on the site of the Takeda residence.".to_string()),
            must_eat: vec!["Shingen mochi".to_string()],
            history: Some("  ".to_string()),
            ..Default::default()
        };
        let rendered: Vec<String> = details_lines(&details)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert_eq!(rendered[0], "Takeda Shrine");
        assert!(rendered.contains(&"Story".to_string()));
        assert!(!rendered.contains(&"History".to_string()));
        assert!(rendered.contains(&"  • Shingen mochi".to_string()));
    }
}
