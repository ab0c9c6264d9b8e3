use crate::app::{AppState, FormField, ItemForm};
use crate::domain::{format_amount, ExpenseEditor, ExpenseField};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style, money_style, pending_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// One "Label: > value█" row
fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let marker = if focused { "▶ " } else { "  " };
    Line::from(vec![
        Span::raw(format!("{}{:<13}", marker, label)),
        Span::styled(value, modal_title_style()),
        if focused {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ])
}

/// Lines for the add/edit form
pub fn form_lines(form: &ItemForm) -> Vec<Line<'static>> {
    let mut lines = vec![Line::raw("")];

    for field in FormField::ALL {
        let focused = form.field == field;
        let value = match field {
            FormField::Category => format!(
                "◀ {} {} ▶",
                form.category.symbol(),
                form.category.label()
            ),
            FormField::Notes => form.notes.input.clone(),
            _ => form.field_value(field),
        };
        lines.push(field_line(field.label(), value, focused));
    }

    for (idx, note) in form.notes.notes.iter().enumerate() {
        let selected = form.field == FormField::Notes && idx == form.notes.selected;
        let bullet = if selected { "   › " } else { "   • " };
        lines.push(Line::raw(format!("{}{}", bullet, note)));
    }

    lines.push(Line::raw(""));
    if form.autofill_pending {
        lines.push(Line::from(Span::styled("  Autofilling…", pending_style())));
    } else if !form.is_valid() {
        lines.push(Line::from(Span::styled(
            "  Name, date and HH:MM times are required",
            error_style(),
        )));
    }
    lines.push(Line::raw(
        "  Tab next  ·  Ctrl+A autofill  ·  Enter save  ·  Esc cancel",
    ));
    lines
}

/// Render the add/edit form
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.form {
        let lines = form_lines(form);
        let modal_area = create_modal_area(area, lines.len() as u16 + 2);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let title = if form.is_edit() { " Edit Stop " } else { " Add Stop " };
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(title, modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

/// Lines for the expense editor
pub fn expense_lines(editor: &ExpenseEditor) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::raw(""),
        field_line("Label", editor.label.clone(), editor.field == ExpenseField::Label),
        field_line("Amount", editor.amount.clone(), editor.field == ExpenseField::Amount),
        Line::raw(""),
    ];

    if editor.expenses.is_empty() {
        lines.push(Line::raw("  (no expenses)"));
    }
    for (idx, expense) in editor.expenses.iter().enumerate() {
        let selected = editor.field == ExpenseField::List && idx == editor.selected;
        let bullet = if selected { "  › " } else { "    " };
        lines.push(Line::raw(format!(
            "{}{}  {}",
            bullet,
            expense.label,
            format_amount(expense.amount)
        )));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("  Total {}", format_amount(editor.total())),
        money_style(),
    )));
    lines
}

/// Render the expense editor
pub fn render_expense_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(editor) = &app.expense_editor {
        let lines = expense_lines(editor);
        let modal_area = create_modal_area(area, lines.len() as u16 + 2);
        f.render_widget(Clear, modal_area);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        format!(" Expenses · {} ", editor.item_name),
                        modal_title_style(),
                    ))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
