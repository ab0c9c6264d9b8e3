use super::item::{Expense, ScheduleItem};
use uuid::Uuid;

/// Parse a user-typed amount ("1,200", "¥980", "12.5"); only positive finite values pass
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '¥' | ' '))
        .collect();
    let amount: f64 = cleaned.parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

/// Build an expense from form input, or `None` when it must be rejected
pub fn validate_expense(label: &str, amount: &str) -> Option<Expense> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    parse_amount(amount).map(|a| Expense::new(label, a))
}

/// Append an expense if valid; returns whether anything changed
pub fn add_expense(expenses: &mut Vec<Expense>, label: &str, amount: &str) -> bool {
    match validate_expense(label, amount) {
        Some(expense) => {
            expenses.push(expense);
            true
        }
        None => false,
    }
}

/// Remove by position; out of range is a no-op
pub fn remove_expense(expenses: &mut Vec<Expense>, index: usize) -> Option<Expense> {
    (index < expenses.len()).then(|| expenses.remove(index))
}

pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Which input of the expense editor has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Label,
    Amount,
    List,
}

/// Working copy of one item's expenses while the editor modal is open
#[derive(Debug, Clone)]
pub struct ExpenseEditor {
    pub item_id: Uuid,
    pub item_name: String,
    pub expenses: Vec<Expense>,
    pub label: String,
    pub amount: String,
    pub field: ExpenseField,
    pub selected: usize,
}

impl ExpenseEditor {
    pub fn open(item: &ScheduleItem) -> Self {
        Self {
            item_id: item.id,
            item_name: item.name.clone(),
            expenses: item.expenses.clone(),
            label: item.name.clone(),
            amount: String::new(),
            field: ExpenseField::Amount,
            selected: 0,
        }
    }

    /// Drives the disabled state of the add affordance
    pub fn can_add(&self) -> bool {
        validate_expense(&self.label, &self.amount).is_some()
    }

    /// Commit the pending entry; the label resets to the item name
    pub fn add(&mut self) -> bool {
        if !add_expense(&mut self.expenses, &self.label, &self.amount) {
            return false;
        }
        self.label = self.item_name.clone();
        self.amount.clear();
        self.selected = self.expenses.len() - 1;
        true
    }

    pub fn remove_selected(&mut self) -> Option<Expense> {
        let removed = remove_expense(&mut self.expenses, self.selected);
        if self.selected >= self.expenses.len() && self.selected > 0 {
            self.selected = self.expenses.len().saturating_sub(1);
        }
        removed
    }

    pub fn select_next(&mut self) {
        if !self.expenses.is_empty() {
            self.selected = (self.selected + 1).min(self.expenses.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            ExpenseField::Label => ExpenseField::Amount,
            ExpenseField::Amount => ExpenseField::List,
            ExpenseField::List => ExpenseField::Label,
        };
    }

    /// Text buffer under the cursor, if the focused field takes text
    pub fn active_buffer(&mut self) -> Option<&mut String> {
        match self.field {
            ExpenseField::Label => Some(&mut self.label),
            ExpenseField::Amount => Some(&mut self.amount),
            ExpenseField::List => None,
        }
    }

    pub fn total(&self) -> f64 {
        total(&self.expenses)
    }
}
