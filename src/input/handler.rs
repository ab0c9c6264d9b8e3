use crate::app::{AppState, FormField};
use crate::domain::{ExpenseField, UiMode, View};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events; returns `true` when the app should quit
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingItem | UiMode::EditingItem => handle_form_mode(app, key),
        UiMode::EditingExpenses => handle_expense_mode(app, key),
        UiMode::ViewingDetails => handle_details_mode(app, key),
        UiMode::ViewingPhrase => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                app.ui_mode = UiMode::Normal;
            }
            Ok(false)
        }
        UiMode::Help => {
            app.ui_mode = UiMode::Normal;
            Ok(false)
        }
    }
}

fn is_ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Keys shared by every view, then the view-specific ones
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        KeyCode::Char('c') if is_ctrl(&key) => return Ok(true),
        KeyCode::Tab => {
            app.next_view();
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.toggle_help();
            return Ok(false);
        }
        // Batch fill works from any view
        KeyCode::Char('F') => {
            app.start_batch();
            return Ok(false);
        }
        _ => {}
    }

    match app.view {
        View::Itinerary => handle_itinerary_keys(app, key),
        View::Trash => handle_trash_keys(app, key),
        View::Toolbox => handle_toolbox_keys(app, key),
    }
    Ok(false)
}

fn handle_itinerary_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        // Navigation (with Shift modifier for reordering)
        KeyCode::Up => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_item_up();
            } else {
                app.move_selection_up();
            }
        }
        KeyCode::Down => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_item_down();
            } else {
                app.move_selection_down();
            }
        }
        KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Char('K') => app.move_item_up(),
        KeyCode::Char('J') => app.move_item_down(),

        // Day tabs
        KeyCode::Left | KeyCode::Char('h') => app.prev_day(),
        KeyCode::Right | KeyCode::Char('l') => app.next_day(),
        KeyCode::Char('b') | KeyCode::Char('B') => app.toggle_branch(),

        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit(),
        KeyCode::Char('$') => app.open_expenses(),
        KeyCode::Enter => app.open_details_viewer(),
        KeyCode::Char('f') => app.request_details(),
        KeyCode::Char('g') => app.open_map(),
        KeyCode::Char('i') => app.open_social(),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.delete_selected(),
        _ => {}
    }
}

fn handle_trash_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restore_selected(),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Enter => app.open_details_viewer(),
        _ => {}
    }
}

fn handle_toolbox_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Enter => app.open_phrase(),
        _ => {}
    }
}

/// Handle keys in the add/edit form
fn handle_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let field = match &app.form {
        Some(form) => form.field,
        None => {
            app.ui_mode = UiMode::Normal;
            return Ok(false);
        }
    };

    match key.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Char('s') if is_ctrl(&key) => app.submit_form(),
        KeyCode::Char('a') if is_ctrl(&key) => app.request_autofill(),
        KeyCode::Tab => app.form_next_field(),
        KeyCode::BackTab => app.form_prev_field(),

        // Notes field: Enter adds, arrows select, Ctrl+D deletes, Ctrl+Z undoes
        KeyCode::Enter if field == FormField::Notes => app.form_add_note(),
        KeyCode::Up if field == FormField::Notes => app.form_select_note(false),
        KeyCode::Down if field == FormField::Notes => app.form_select_note(true),
        KeyCode::Char('d') if field == FormField::Notes && is_ctrl(&key) => {
            app.form_delete_note()
        }
        KeyCode::Char('z') if field == FormField::Notes && is_ctrl(&key) => app.form_undo_notes(),

        KeyCode::Enter => app.submit_form(),
        KeyCode::Up => app.form_prev_field(),
        KeyCode::Down => app.form_next_field(),
        KeyCode::Left if field == FormField::Category => app.form_cycle_category(false),
        KeyCode::Right | KeyCode::Char(' ') if field == FormField::Category => {
            app.form_cycle_category(true)
        }
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) if !is_ctrl(&key) => app.form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the expense editor
fn handle_expense_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    let Some(editor) = &mut app.expense_editor else {
        app.ui_mode = UiMode::Normal;
        return Ok(false);
    };

    match key.code {
        KeyCode::Esc => app.cancel_expenses(),
        KeyCode::Char('s') if is_ctrl(&key) => app.save_expenses(),
        KeyCode::Tab => editor.next_field(),
        KeyCode::Enter if editor.field == ExpenseField::List => app.save_expenses(),
        KeyCode::Enter => {
            editor.add();
        }
        KeyCode::Up if editor.field == ExpenseField::List => editor.select_prev(),
        KeyCode::Down if editor.field == ExpenseField::List => editor.select_next(),
        KeyCode::Delete | KeyCode::Char('x') if editor.field == ExpenseField::List => {
            editor.remove_selected();
        }
        KeyCode::Backspace => app.expense_backspace(),
        KeyCode::Char(c) if !is_ctrl(&key) => app.expense_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the details viewer
fn handle_details_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => app.close_viewer(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_details(false),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_details(true),
        KeyCode::Char('f') => app.request_details(),
        KeyCode::Char('g') => app.open_map(),
        KeyCode::Char('i') => app.open_social(),
        _ => {}
    }
    Ok(false)
}
