/// Notes list being edited in a form, with undo back to the state it was opened in
#[derive(Debug, Clone, PartialEq)]
pub struct NotesEditor {
    pub notes: Vec<String>,
    pub input: String,
    pub selected: usize,
    history: Vec<Vec<String>>,
}

impl NotesEditor {
    pub fn new(notes: Vec<String>) -> Self {
        Self {
            history: vec![notes.clone()],
            notes,
            input: String::new(),
            selected: 0,
        }
    }

    fn record(&mut self) {
        self.history.push(self.notes.clone());
    }

    /// Append the typed note; blank input is ignored
    pub fn add(&mut self) -> bool {
        let note = self.input.trim();
        if note.is_empty() {
            return false;
        }
        self.notes.push(note.to_string());
        self.input.clear();
        self.selected = self.notes.len() - 1;
        self.record();
        true
    }

    pub fn delete(&mut self, index: usize) -> bool {
        if index >= self.notes.len() {
            return false;
        }
        self.notes.remove(index);
        self.selected = self.selected.min(self.notes.len().saturating_sub(1));
        self.record();
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        self.delete(self.selected)
    }

    /// Step back one change; no-op at the state the editor was opened with
    pub fn undo(&mut self) -> bool {
        if self.history.len() <= 1 {
            return false;
        }
        self.history.pop();
        if let Some(previous) = self.history.last() {
            self.notes = previous.clone();
        }
        self.selected = self.selected.min(self.notes.len().saturating_sub(1));
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.len() > 1
    }

    pub fn select_next(&mut self) {
        if !self.notes.is_empty() {
            self.selected = (self.selected + 1).min(self.notes.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}
