use crate::app::AppState;
use crate::domain::{format_amount, format_hhmm, links, ScheduleItem};
use crate::ui::styles::{
    border_style, category_style, default_style, money_style, muted_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn labelled(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![Span::styled(label, title_style()), Span::raw(value)])
}

/// Lines describing an item: times, summary fields, links, notes, expenses
pub fn item_lines(item: &ScheduleItem) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} {} ", item.category.symbol(), item.category.label()),
                category_style(item.category),
            ),
            Span::raw(item.name.clone()),
        ]),
        labelled(
            "Time: ",
            format!(
                "{} - {} ({})",
                format_hhmm(item.time_start),
                format_hhmm(item.time_end),
                item.duration_display()
            ),
        ),
    ];

    if let Some(branch) = &item.plan_branch {
        lines.push(labelled("Plan: ", branch.clone()));
    }
    if !item.short_description.trim().is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::raw(item.short_description.clone()));
    }

    if let Some(summary) = item.summary() {
        let fields = [
            ("Header: ", &summary.header),
            ("Transport: ", &summary.transport_mode),
            ("Info: ", &summary.primary_info),
            ("More: ", &summary.secondary_info),
            ("Stay: ", &summary.stay_time),
            ("Tip: ", &summary.one_line_tip),
            ("Photo: ", &summary.photo_guide),
            ("Tel: ", &summary.tel),
        ];
        let present: Vec<_> = fields
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| (*label, v.clone())))
            .collect();
        if !present.is_empty() {
            lines.push(Line::raw(""));
            lines.extend(present.into_iter().map(|(label, v)| labelled(label, v)));
        }
    }

    lines.push(Line::raw(""));
    lines.push(labelled("Map: ", links::map_query(item)));
    lines.push(labelled("Tag: ", format!("#{}", links::social_tag(item))));

    lines.push(Line::raw(""));
    if item.notes.is_empty() {
        lines.push(Line::from(Span::styled("Notes: (empty)", default_style())));
    } else {
        lines.push(Line::from(Span::styled("Notes:", title_style())));
        for note in &item.notes {
            lines.push(Line::raw(format!("  • {}", note)));
        }
    }

    if !item.expenses.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("Expenses:", title_style())));
        for expense in &item.expenses {
            lines.push(Line::raw(format!(
                "  {}  {}",
                expense.label,
                format_amount(expense.amount)
            )));
        }
        lines.push(Line::from(Span::styled(
            format!("  Total {}", format_amount(item.expense_total())),
            money_style(),
        )));
    }

    lines
}

/// Render the details pane for the selected item
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(item) = app.selected_item() else {
        let empty = Paragraph::new("No stop selected")
            .style(muted_style())
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let paragraph = Paragraph::new(item_lines(item))
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
