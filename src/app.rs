use crate::config::Config;
use crate::domain::{
    daily_total, format_hhmm, global_total, links, parse_hhmm, trash_items, visible_items,
    Category, DayFilter, DeleteOutcome, Details, ExpenseEditor, NotesEditor, Phrase, Schedule,
    ScheduleItem, Summary, SummaryPatch, Trip, UiMode, View,
};
use crate::enrich::{select_batch_targets, BatchSummary, Enricher, EnrichError, EnrichmentEvent};
use crate::notifications;
use crate::persistence::{meta_file, persist_schedule, save_metadata, schedule_file, AppMetadata};
use anyhow::Result;
use chrono::NaiveTime;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Fields of the add/edit form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Category,
    Name,
    Date,
    Branch,
    Start,
    End,
    Description,
    PrimaryInfo,
    Tel,
    LocationKeyword,
    OneLineTip,
    Notes,
}

impl FormField {
    pub const ALL: [FormField; 12] = [
        FormField::Category,
        FormField::Name,
        FormField::Date,
        FormField::Branch,
        FormField::Start,
        FormField::End,
        FormField::Description,
        FormField::PrimaryInfo,
        FormField::Tel,
        FormField::LocationKeyword,
        FormField::OneLineTip,
        FormField::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Category => "Category",
            FormField::Name => "Name",
            FormField::Date => "Date",
            FormField::Branch => "Plan",
            FormField::Start => "Start",
            FormField::End => "End",
            FormField::Description => "Description",
            FormField::PrimaryInfo => "Primary info",
            FormField::Tel => "Tel",
            FormField::LocationKeyword => "Map keyword",
            FormField::OneLineTip => "Tip",
            FormField::Notes => "Notes",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Add/edit form state
#[derive(Debug, Clone)]
pub struct ItemForm {
    /// Identifies this form instance for autofill results
    pub token: u64,
    /// Item being edited; `None` when adding
    pub editing: Option<Uuid>,
    /// Base for a new item; edits start from the stored item instead
    pub draft: ScheduleItem,
    /// Autofill results received while open, replayed onto the stored item on edit
    pub autofills: Vec<SummaryPatch>,
    pub category: Category,
    pub name: String,
    pub date: String,
    pub branch: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub primary_info: String,
    pub tel: String,
    pub location_keyword: String,
    pub one_line_tip: String,
    pub notes: NotesEditor,
    pub field: FormField,
    pub autofill_pending: bool,
}

impl ItemForm {
    fn from_item(token: u64, editing: Option<Uuid>, item: ScheduleItem) -> Self {
        let summary = item.summary().cloned().unwrap_or_default();
        let text = |v: Option<String>| v.unwrap_or_default();
        Self {
            token,
            editing,
            category: item.category,
            name: item.name.clone(),
            date: item.date.clone(),
            branch: item.plan_branch.clone().unwrap_or_default(),
            start: format_hhmm(item.time_start),
            end: format_hhmm(item.time_end),
            description: item.short_description.clone(),
            primary_info: text(summary.primary_info),
            tel: text(summary.tel),
            location_keyword: text(summary.location_keyword),
            one_line_tip: text(summary.one_line_tip),
            notes: NotesEditor::new(item.notes.clone()),
            field: FormField::Name,
            autofill_pending: false,
            draft: item,
            autofills: Vec::new(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    /// Text buffer for the focused field (category has none)
    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Category => None,
            FormField::Name => Some(&mut self.name),
            FormField::Date => Some(&mut self.date),
            FormField::Branch => Some(&mut self.branch),
            FormField::Start => Some(&mut self.start),
            FormField::End => Some(&mut self.end),
            FormField::Description => Some(&mut self.description),
            FormField::PrimaryInfo => Some(&mut self.primary_info),
            FormField::Tel => Some(&mut self.tel),
            FormField::LocationKeyword => Some(&mut self.location_keyword),
            FormField::OneLineTip => Some(&mut self.one_line_tip),
            FormField::Notes => Some(&mut self.notes.input),
        }
    }

    pub fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::Category => self.category.to_tag().to_string(),
            FormField::Name => self.name.clone(),
            FormField::Date => self.date.clone(),
            FormField::Branch => self.branch.clone(),
            FormField::Start => self.start.clone(),
            FormField::End => self.end.clone(),
            FormField::Description => self.description.clone(),
            FormField::PrimaryInfo => self.primary_info.clone(),
            FormField::Tel => self.tel.clone(),
            FormField::LocationKeyword => self.location_keyword.clone(),
            FormField::OneLineTip => self.one_line_tip.clone(),
            FormField::Notes => self.notes.input.clone(),
        }
    }

    fn times(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = parse_hhmm(&self.start).ok()?;
        let end = parse_hhmm(&self.end).ok()?;
        Some((start, end))
    }

    /// Drives the disabled state of the save affordance
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.date.trim().is_empty() && self.times().is_some()
    }

    /// Fold an autofill result into the draft and the visible fields
    pub fn apply_patch(&mut self, patch: SummaryPatch) {
        let had_desc = patch
            .short_description
            .as_ref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false);
        if let Some(category) = patch.category {
            self.category = category;
        }
        self.autofills.push(patch.clone());
        self.draft.apply_summary_patch(patch);
        if had_desc {
            self.description = self.draft.short_description.clone();
        }

        let summary = self.draft.summary().cloned().unwrap_or_default();
        let keep = |slot: &mut String, value: Option<String>| {
            if let Some(v) = value {
                *slot = v;
            }
        };
        keep(&mut self.primary_info, summary.primary_info);
        keep(&mut self.tel, summary.tel);
        keep(&mut self.location_keyword, summary.location_keyword);
        keep(&mut self.one_line_tip, summary.one_line_tip);
    }

    /// Build a new item from the draft; `None` while validation fails
    pub fn build(&self) -> Option<ScheduleItem> {
        self.apply_to(self.draft.clone())
    }

    /// Write the form's fields onto `item`, keeping its expenses and details
    pub fn apply_to(&self, mut item: ScheduleItem) -> Option<ScheduleItem> {
        if !self.is_valid() {
            return None;
        }
        let (start, end) = self.times()?;
        item.category = self.category;
        item.name = self.name.trim().to_string();
        item.date = self.date.trim().to_string();
        item.plan_branch = Some(self.branch.trim().to_string()).filter(|b| !b.is_empty());
        item.time_start = start;
        item.time_end = end;
        item.short_description = self.description.trim().to_string();
        item.notes = self.notes.notes.clone();

        let fine_tuned = [
            &self.primary_info,
            &self.tel,
            &self.location_keyword,
            &self.one_line_tip,
        ]
        .iter()
        .any(|v| !v.trim().is_empty());
        if fine_tuned || item.enrichment.is_some() {
            let summary: &mut Summary = &mut item.enrichment_mut().summary;
            Summary::set_field(&mut summary.primary_info, &self.primary_info);
            Summary::set_field(&mut summary.tel, &self.tel);
            Summary::set_field(&mut summary.location_keyword, &self.location_keyword);
            Summary::set_field(&mut summary.one_line_tip, &self.one_line_tip);
        }
        Some(item)
    }
}

/// Progress of a running batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchProgress {
    pub total: usize,
    pub settled: usize,
    pub failed: usize,
    /// Batch items still in flight; other requests never count toward progress
    pub outstanding: HashSet<Uuid>,
}

impl BatchProgress {
    pub fn new(targets: impl IntoIterator<Item = Uuid>) -> Self {
        let outstanding: HashSet<Uuid> = targets.into_iter().collect();
        Self {
            total: outstanding.len(),
            outstanding,
            ..Default::default()
        }
    }

    /// Count one settled request if it belongs to this batch
    pub fn record(&mut self, id: Uuid, failed: bool) -> bool {
        if !self.outstanding.remove(&id) {
            return false;
        }
        self.settled += 1;
        if failed {
            self.failed += 1;
        }
        true
    }
}

/// Main application state
pub struct AppState {
    pub schedule: Schedule,
    pub trip: Trip,
    pub config: Config,
    /// Where to persist; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    pub view: View,
    pub active_date: String,
    pub active_branch: Option<String>,
    pub selected_index: usize,
    pub trash_index: usize,
    pub phrase_index: usize,
    pub ui_mode: UiMode,
    pub form: Option<ItemForm>,
    pub expense_editor: Option<ExpenseEditor>,
    pub viewing: Option<Uuid>,
    pub details_scroll: u16,
    /// Items with a details request in flight
    pub pending: HashSet<Uuid>,
    pub batch: Option<BatchProgress>,
    pub last_batch: Option<BatchSummary>,
    pub status: Option<String>,
    pub needs_save: bool,
    enricher: Option<Enricher>,
    next_token: u64,
}

impl AppState {
    pub fn new(
        schedule: Schedule,
        trip: Trip,
        config: Config,
        metadata: AppMetadata,
        data_dir: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            schedule,
            trip,
            config,
            data_dir,
            view: metadata.view,
            active_date: String::new(),
            active_branch: None,
            selected_index: 0,
            trash_index: 0,
            phrase_index: 0,
            ui_mode: UiMode::Normal,
            form: None,
            expense_editor: None,
            viewing: None,
            details_scroll: 0,
            pending: HashSet::new(),
            batch: None,
            last_batch: None,
            status: None,
            needs_save: false,
            enricher: None,
            next_token: 1,
        };

        let dates = app.tab_dates();
        app.active_date = metadata
            .active_date
            .filter(|d| dates.contains(d))
            .or_else(|| dates.first().cloned())
            .unwrap_or_default();

        let date = app.active_date.clone();
        app.active_branch = match metadata.active_branch {
            Some(b) if app.trip.branches_for(&date).map(|m| m.contains_key(&b)).unwrap_or(false) => {
                Some(b)
            }
            _ => app.trip.default_branch(&date),
        };
        app
    }

    pub fn with_enricher(mut self, enricher: Enricher) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn metadata(&self) -> AppMetadata {
        AppMetadata {
            active_date: Some(self.active_date.clone()),
            active_branch: self.active_branch.clone(),
            view: self.view,
        }
    }

    pub fn cutoff(&self) -> NaiveTime {
        self.config.night_cutoff()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    // ---- day / branch / view ----

    pub fn tab_dates(&self) -> Vec<String> {
        self.trip.tab_dates(&self.schedule.dates())
    }

    pub fn day_filter(&self) -> DayFilter<'_> {
        DayFilter {
            date: &self.active_date,
            branch: self.active_branch.as_deref(),
            has_branches: self.trip.has_branches(&self.active_date),
        }
    }

    /// Items on screen for the active day, in display order
    pub fn visible(&self) -> Vec<&ScheduleItem> {
        visible_items(self.schedule.items(), &self.day_filter(), self.cutoff())
    }

    pub fn trash(&self) -> Vec<&ScheduleItem> {
        trash_items(self.schedule.items())
    }

    pub fn daily_total(&self) -> f64 {
        daily_total(&self.visible())
    }

    pub fn global_total(&self) -> f64 {
        global_total(self.schedule.items())
    }

    pub fn selected_item(&self) -> Option<&ScheduleItem> {
        match self.view {
            View::Itinerary => self.visible().get(self.selected_index).copied(),
            View::Trash => self.trash().get(self.trash_index).copied(),
            View::Toolbox => None,
        }
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected_item().map(|i| i.id)
    }

    fn select_date(&mut self, date: String) {
        self.active_branch = self.trip.default_branch(&date);
        self.active_date = date;
        self.selected_index = 0;
        self.needs_save = true;
    }

    pub fn next_day(&mut self) {
        let dates = self.tab_dates();
        if dates.is_empty() {
            return;
        }
        let idx = dates.iter().position(|d| *d == self.active_date).map(|i| i + 1).unwrap_or(0);
        if let Some(date) = dates.get(idx.min(dates.len() - 1)).cloned() {
            if date != self.active_date {
                self.select_date(date);
            }
        }
    }

    pub fn prev_day(&mut self) {
        let dates = self.tab_dates();
        let idx = dates.iter().position(|d| *d == self.active_date).unwrap_or(0);
        if idx > 0 {
            self.select_date(dates[idx - 1].clone());
        }
    }

    /// Switch to the next plan branch on split days
    pub fn toggle_branch(&mut self) {
        if let Some(next) = self
            .trip
            .next_branch(&self.active_date, self.active_branch.as_deref())
        {
            self.active_branch = Some(next);
            self.selected_index = 0;
            self.needs_save = true;
        }
    }

    pub fn next_view(&mut self) {
        self.set_view(self.view.next());
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.needs_save = true;
    }

    // ---- selection ----

    fn list_len(&self) -> usize {
        match self.view {
            View::Itinerary => self.visible().len(),
            View::Trash => self.trash().len(),
            View::Toolbox => self.trip.phrases.len(),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.view {
            View::Itinerary => &mut self.selected_index,
            View::Trash => &mut self.trash_index,
            View::Toolbox => &mut self.phrase_index,
        }
    }

    pub fn move_selection_up(&mut self) {
        let cursor = self.cursor_mut();
        *cursor = cursor.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let len = self.list_len();
        let cursor = self.cursor_mut();
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    /// Keep cursors inside their lists after removals
    pub fn clamp_selection(&mut self) {
        let visible = self.visible().len();
        let trash = self.trash().len();
        self.selected_index = self.selected_index.min(visible.saturating_sub(1));
        self.trash_index = self.trash_index.min(trash.saturating_sub(1));
    }

    fn select_item(&mut self, id: Uuid) {
        if let Some(pos) = self.visible().iter().position(|i| i.id == id) {
            self.selected_index = pos;
        }
    }

    // ---- store operations ----

    fn move_selected(&mut self, direction: i32) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let cutoff = self.cutoff();
        let filter = DayFilter {
            date: &self.active_date,
            branch: self.active_branch.as_deref(),
            has_branches: self.trip.has_branches(&self.active_date),
        };
        if self.schedule.move_item(id, direction, &filter, cutoff) {
            self.select_item(id);
            self.needs_save = true;
        }
    }

    /// Move selected card up among same-time neighbours
    pub fn move_item_up(&mut self) {
        self.move_selected(-1);
    }

    pub fn move_item_down(&mut self) {
        self.move_selected(1);
    }

    /// Delete: trashes from the itinerary, removes for good from the trash
    pub fn delete_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let (id, name) = (item.id, item.name.clone());
        match self.schedule.delete(id) {
            DeleteOutcome::SoftDeleted => self.set_status(format!("Moved '{}' to trash", name)),
            DeleteOutcome::Removed => self.set_status(format!("Deleted '{}' permanently", name)),
            DeleteOutcome::NotFound => return,
        }
        self.needs_save = true;
        self.clamp_selection();
    }

    pub fn restore_selected(&mut self) {
        if self.view != View::Trash {
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        if self.schedule.restore(id) {
            self.set_status("Restored");
            self.needs_save = true;
            self.clamp_selection();
        }
    }

    // ---- add / edit form ----

    fn take_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }

    pub fn start_add(&mut self) {
        let token = self.take_token();
        let (start, end) = (
            NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN),
        );
        let draft = ScheduleItem::new(self.active_date.clone(), Category::Sight, "", start, end);
        self.form = Some(ItemForm::from_item(token, None, draft));
        self.ui_mode = UiMode::AddingItem;
    }

    pub fn start_edit(&mut self) {
        let Some(item) = self.selected_item().cloned() else {
            return;
        };
        if !item.is_active() {
            return;
        }
        let token = self.take_token();
        self.form = Some(ItemForm::from_item(token, Some(item.id), item));
        self.ui_mode = UiMode::EditingItem;
    }

    pub fn form_next_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.field = form.field.next();
        }
    }

    pub fn form_prev_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.field = form.field.prev();
        }
    }

    pub fn form_add_char(&mut self, c: char) {
        if let Some(buffer) = self.form.as_mut().and_then(ItemForm::buffer_mut) {
            buffer.push(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(buffer) = self.form.as_mut().and_then(ItemForm::buffer_mut) {
            buffer.pop();
        }
    }

    pub fn form_cycle_category(&mut self, forward: bool) {
        if let Some(form) = &mut self.form {
            form.category = if forward {
                form.category.next()
            } else {
                form.category.prev()
            };
        }
    }

    /// Enter on the notes field adds the typed note
    pub fn form_add_note(&mut self) {
        if let Some(form) = &mut self.form {
            form.notes.add();
        }
    }

    pub fn form_delete_note(&mut self) {
        if let Some(form) = &mut self.form {
            form.notes.delete_selected();
        }
    }

    pub fn form_undo_notes(&mut self) {
        if let Some(form) = &mut self.form {
            form.notes.undo();
        }
    }

    pub fn form_select_note(&mut self, down: bool) {
        if let Some(form) = &mut self.form {
            if down {
                form.notes.select_next();
            } else {
                form.notes.select_prev();
            }
        }
    }

    /// Ask the generative service to fill the form's summary fields
    pub fn request_autofill(&mut self) {
        let Some(form) = &mut self.form else {
            return;
        };
        if form.name.trim().is_empty() || form.autofill_pending {
            return;
        }
        match &self.enricher {
            Some(enricher) => {
                form.autofill_pending = true;
                enricher.request_summary(form.token, form.name.trim().to_string(), form.category);
            }
            None => self.status = Some("Enrichment is unavailable".to_string()),
        }
    }

    /// Save the form; ignored while it does not validate
    pub fn submit_form(&mut self) {
        if !self.form.as_ref().is_some_and(ItemForm::is_valid) {
            return;
        }
        let Some(form) = self.form.take() else {
            return;
        };
        self.ui_mode = UiMode::Normal;

        match form.editing {
            Some(id) => {
                for patch in form.autofills.iter().cloned() {
                    self.schedule.merge_summary(id, patch);
                }
                // Details or expenses may have landed while the form was open
                let current = self.schedule.get(id).cloned();
                let Some(item) = current.and_then(|c| form.apply_to(c)) else {
                    warn!(%id, "edited item vanished before submit");
                    self.set_status("Stop was removed while editing");
                    return;
                };
                let report = self.schedule.update(item);
                if !report.skipped.is_empty() {
                    self.set_status(format!(
                        "{} later stop(s) not shifted: they would leave the day",
                        report.skipped.len()
                    ));
                } else if report.shift != 0 {
                    self.set_status(format!(
                        "Shifted {} later stop(s) by {}m",
                        report.shifted.len(),
                        report.shift
                    ));
                }
                self.select_item(id);
            }
            None => {
                let Some(item) = form.build() else {
                    return;
                };
                let date = item.date.clone();
                let id = self.schedule.add(item);
                if date == self.active_date {
                    self.select_item(id);
                }
            }
        }
        self.needs_save = true;
        self.clamp_selection();
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.ui_mode = UiMode::Normal;
    }

    // ---- expenses ----

    pub fn open_expenses(&mut self) {
        if self.view != View::Itinerary {
            return;
        }
        if let Some(item) = self.selected_item() {
            self.expense_editor = Some(ExpenseEditor::open(item));
            self.ui_mode = UiMode::EditingExpenses;
        }
    }

    pub fn expense_add_char(&mut self, c: char) {
        if let Some(buffer) = self.expense_editor.as_mut().and_then(ExpenseEditor::active_buffer) {
            buffer.push(c);
        }
    }

    pub fn expense_backspace(&mut self) {
        if let Some(buffer) = self.expense_editor.as_mut().and_then(ExpenseEditor::active_buffer) {
            buffer.pop();
        }
    }

    /// Write the working copy back to the item
    pub fn save_expenses(&mut self) {
        if let Some(editor) = self.expense_editor.take() {
            if self.schedule.replace_expenses(editor.item_id, editor.expenses) {
                self.needs_save = true;
            }
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_expenses(&mut self) {
        self.expense_editor = None;
        self.ui_mode = UiMode::Normal;
    }

    // ---- viewers ----

    pub fn open_details_viewer(&mut self) {
        if let Some(id) = self.selected_id() {
            self.viewing = Some(id);
            self.details_scroll = 0;
            self.ui_mode = UiMode::ViewingDetails;
        }
    }

    pub fn viewed_item(&self) -> Option<&ScheduleItem> {
        self.viewing.and_then(|id| self.schedule.get(id))
    }

    pub fn close_viewer(&mut self) {
        self.viewing = None;
        self.ui_mode = UiMode::Normal;
    }

    pub fn scroll_details(&mut self, down: bool) {
        self.details_scroll = if down {
            self.details_scroll.saturating_add(1)
        } else {
            self.details_scroll.saturating_sub(1)
        };
    }

    pub fn open_phrase(&mut self) {
        if self.view == View::Toolbox && self.phrase_index < self.trip.phrases.len() {
            self.ui_mode = UiMode::ViewingPhrase;
        }
    }

    pub fn selected_phrase(&self) -> Option<&Phrase> {
        self.trip.phrases.get(self.phrase_index)
    }

    pub fn toggle_help(&mut self) {
        self.ui_mode = if self.ui_mode == UiMode::Help {
            UiMode::Normal
        } else {
            UiMode::Help
        };
    }

    // ---- links ----

    fn open_url(&mut self, url: String) {
        info!(%url, "opening link");
        if let Err(e) = open::that(&url) {
            warn!(%url, "could not open link: {}", e);
            self.set_status(format!("Could not open {}", url));
        }
    }

    pub fn open_map(&mut self) {
        if let Some(url) = self.selected_item().map(links::map_url) {
            self.open_url(url);
        }
    }

    pub fn open_social(&mut self) {
        if let Some(url) = self.selected_item().map(links::social_url) {
            self.open_url(url);
        }
    }

    // ---- enrichment ----

    /// Request details for the item in the viewer (or the selected one)
    pub fn request_details(&mut self) {
        let Some(item) = self.viewed_item().or_else(|| self.selected_item()) else {
            return;
        };
        let (id, name, category) = (item.id, item.name.clone(), item.category);
        if self.pending.contains(&id) {
            return;
        }
        match &self.enricher {
            Some(enricher) => {
                enricher.request_details(id, name, category);
                self.pending.insert(id);
            }
            None => self.set_status("Enrichment is unavailable"),
        }
    }

    /// Fill details for every eligible item that lacks them
    pub fn start_batch(&mut self) {
        if self.batch.is_some() {
            return;
        }
        let targets: Vec<_> = select_batch_targets(self.schedule.items())
            .into_iter()
            .filter(|t| !self.pending.contains(&t.id))
            .collect();
        if targets.is_empty() {
            self.set_status("Every stop already has details");
            return;
        }
        let Some(enricher) = &self.enricher else {
            self.set_status("Enrichment is unavailable");
            return;
        };

        info!(count = targets.len(), "starting batch details");
        self.pending.extend(targets.iter().map(|t| t.id));
        self.batch = Some(BatchProgress::new(targets.iter().map(|t| t.id)));
        enricher.start_batch(targets);
    }

    /// Drain settled requests and merge them into the current store
    pub fn tick(&mut self) {
        let events = match &mut self.enricher {
            Some(enricher) => enricher.drain(),
            None => return,
        };
        for event in events {
            self.handle_enrichment_event(event);
        }
    }

    pub fn handle_enrichment_event(&mut self, event: EnrichmentEvent) {
        match event {
            EnrichmentEvent::Summary { token, result } => self.apply_autofill(token, result),
            EnrichmentEvent::Details { id, result } => self.apply_details(id, result),
            EnrichmentEvent::BatchFinished(summary) => {
                self.batch = None;
                self.last_batch = Some(summary);
                self.set_status(notifications::batch_message(summary.succeeded, summary.failed));
                notifications::notify_batch_done(summary.succeeded, summary.failed);
            }
        }
    }

    fn apply_autofill(&mut self, token: u64, result: Result<SummaryPatch, EnrichError>) {
        let Some(form) = self.form.as_mut().filter(|f| f.token == token) else {
            debug!(token, "autofill result for a closed form, dropping");
            return;
        };
        form.autofill_pending = false;
        match result {
            Ok(patch) => form.apply_patch(patch),
            Err(e) => self.status = Some(format!("Autofill failed: {}", e)),
        }
    }

    fn apply_details(&mut self, id: Uuid, result: Result<Details, EnrichError>) {
        self.pending.remove(&id);
        let failed = result.is_err();
        match result {
            Ok(details) => {
                if self.schedule.merge_details(id, details) {
                    self.needs_save = true;
                } else {
                    debug!(%id, "details arrived for a removed item");
                }
            }
            Err(e) => {
                let name = self
                    .schedule
                    .get(id)
                    .map(|i| i.name.clone())
                    .unwrap_or_default();
                self.set_status(format!("Details for '{}' still missing: {}", name, e));
            }
        }
        if let Some(progress) = &mut self.batch {
            progress.record(id, failed);
        }
    }

    // ---- persistence ----

    /// Write schedule and UI preferences
    pub fn save(&mut self) -> Result<()> {
        self.needs_save = false;
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        persist_schedule(&schedule_file(dir), self.schedule.items())?;
        save_metadata(meta_file(dir), &self.metadata())?;
        Ok(())
    }

    /// Save, logging failures; the in-memory state stays authoritative
    pub fn save_logged(&mut self) {
        if let Err(e) = self.save() {
            error!("failed to save: {:#}", e);
            self.set_status("Could not save changes (see log)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{format_hhmm, Expense, ItemStatus};
    use crate::persistence::storage::{seed_schedule, seed_trip};
    use pretty_assertions::assert_eq;

    fn create_test_app() -> AppState {
        AppState::new(
            Schedule::new(seed_schedule()),
            seed_trip(),
            Config::default(),
            AppMetadata::default(),
            None,
        )
    }

    fn visible_names(app: &AppState) -> Vec<String> {
        app.visible().iter().map(|i| i.name.clone()).collect()
    }

    fn go_to(app: &mut AppState, date: &str) {
        while app.active_date != date {
            app.next_day();
        }
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert_eq!(app.active_date, "08/05");
        assert_eq!(app.active_branch, None);
        assert_eq!(app.view, View::Itinerary);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(!app.needs_save);
    }

    #[test]
    fn test_restores_saved_preferences() {
        let app = AppState::new(
            Schedule::new(seed_schedule()),
            seed_trip(),
            Config::default(),
            AppMetadata {
                active_date: Some("08/08".to_string()),
                active_branch: Some("B".to_string()),
                view: View::Toolbox,
            },
            None,
        );
        assert_eq!(app.active_date, "08/08");
        assert_eq!(app.active_branch.as_deref(), Some("B"));
        assert_eq!(app.view, View::Toolbox);
    }

    #[test]
    fn test_unknown_saved_date_falls_back() {
        let app = AppState::new(
            Schedule::new(seed_schedule()),
            seed_trip(),
            Config::default(),
            AppMetadata {
                active_date: Some("12/31".to_string()),
                active_branch: Some("Z".to_string()),
                view: View::Itinerary,
            },
            None,
        );
        assert_eq!(app.active_date, "08/05");
        assert_eq!(app.active_branch, None);
    }

    #[test]
    fn test_night_items_sort_after_evening() {
        let app = create_test_app();
        let starts: Vec<String> = app.visible().iter().map(|i| format_hhmm(i.time_start)).collect();
        assert_eq!(starts, vec!["17:25", "17:55", "20:25", "00:45"]);
    }

    #[test]
    fn test_switching_day_resets_branch() {
        let mut app = create_test_app();
        go_to(&mut app, "08/08");
        assert_eq!(app.active_branch.as_deref(), Some("A"));

        app.toggle_branch();
        assert_eq!(app.active_branch.as_deref(), Some("B"));
        let names = visible_names(&app);
        assert!(names.contains(&"East shore viewing points".to_string()));
        assert!(!names.contains(&"Shirahige Shrine".to_string()));

        app.prev_day();
        assert_eq!(app.active_date, "08/07");
        assert_eq!(app.active_branch, None);
        app.next_day();
        assert_eq!(app.active_branch.as_deref(), Some("A"));
    }

    #[test]
    fn test_selection_bounds() {
        let mut app = create_test_app();
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
        for _ in 0..10 {
            app.move_selection_down();
        }
        assert_eq!(app.selected_index, app.visible().len() - 1);
    }

    #[test]
    fn test_delete_then_purge_from_trash() {
        let mut app = create_test_app();
        let id = app.selected_id().unwrap();
        let before = app.schedule.len();

        app.delete_selected();
        assert_eq!(app.schedule.len(), before);
        assert_eq!(app.schedule.get(id).unwrap().status, ItemStatus::Deleted);
        assert!(app.needs_save);

        app.set_view(View::Trash);
        assert_eq!(app.selected_id(), Some(id));
        app.delete_selected();
        assert_eq!(app.schedule.len(), before - 1);
        assert!(app.schedule.get(id).is_none());
    }

    #[test]
    fn test_restore_from_trash() {
        let mut app = create_test_app();
        let original = app.selected_item().unwrap().clone();
        app.delete_selected();

        app.set_view(View::Trash);
        app.restore_selected();
        assert_eq!(app.schedule.get(original.id), Some(&original));
        assert!(app.trash().is_empty());
    }

    #[test]
    fn test_add_form_requires_name() {
        let mut app = create_test_app();
        app.start_add();
        assert_eq!(app.ui_mode, UiMode::AddingItem);

        app.submit_form();
        assert_eq!(app.ui_mode, UiMode::AddingItem);
        assert!(app.form.is_some());

        for c in "Sky tree".chars() {
            app.form_add_char(c);
        }
        let before = app.schedule.len();
        app.submit_form();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.schedule.len(), before + 1);
        let added = app.selected_item().unwrap();
        assert_eq!(added.name, "Sky tree");
        assert_eq!(added.date, "08/05");
        assert_eq!(format_hhmm(added.time_start), "10:00");
    }

    #[test]
    fn test_add_form_rejects_bad_time() {
        let mut app = create_test_app();
        app.start_add();
        let form = app.form.as_mut().unwrap();
        form.name = "Tower".to_string();
        form.end = "25:00".to_string();
        assert!(!form.is_valid());
        app.submit_form();
        assert!(app.form.is_some());
    }

    #[test]
    fn test_edit_ripples_later_items() {
        let mut app = create_test_app();
        go_to(&mut app, "08/06");
        app.move_selection_down();
        assert_eq!(app.selected_item().unwrap().name, "Takeda Shrine");

        app.start_edit();
        app.form.as_mut().unwrap().end = "11:30".to_string();
        app.submit_form();

        let starts: Vec<(String, String)> = app
            .visible()
            .iter()
            .map(|i| (format_hhmm(i.time_start), format_hhmm(i.time_end)))
            .collect();
        assert_eq!(
            starts,
            vec![
                ("08:00".to_string(), "09:40".to_string()),
                ("10:00".to_string(), "11:30".to_string()),
                ("11:30".to_string(), "12:30".to_string()),
                ("13:30".to_string(), "14:00".to_string()),
            ]
        );
        assert_eq!(app.selected_item().unwrap().name, "Takeda Shrine");
    }

    #[test]
    fn test_edit_keeps_details_that_arrive_while_open() {
        let mut app = create_test_app();
        go_to(&mut app, "08/06");
        app.move_selection_down();
        let id = app.selected_id().unwrap();
        app.start_edit();

        app.handle_enrichment_event(EnrichmentEvent::Details {
            id,
            result: Ok(Details {
                content: Some("Landed while the form was open".to_string()),
                ..Default::default()
            }),
        });
        app.schedule
            .replace_expenses(id, vec![Expense::new("Offering", 500.0)]);
        app.form.as_mut().unwrap().name = "Takeda Shrine (Tsutsujigasaki)".to_string();
        app.submit_form();

        let item = app.schedule.get(id).unwrap();
        assert_eq!(item.name, "Takeda Shrine (Tsutsujigasaki)");
        assert_eq!(
            item.details().and_then(|d| d.content.as_deref()),
            Some("Landed while the form was open")
        );
        assert_eq!(item.expenses, vec![Expense::new("Offering", 500.0)]);
    }

    #[test]
    fn test_edit_autofill_merges_into_stored_item() {
        let mut app = create_test_app();
        go_to(&mut app, "08/06");
        app.move_selection_down();
        let id = app.selected_id().unwrap();
        app.start_edit();
        let token = app.form.as_ref().unwrap().token;

        app.handle_enrichment_event(EnrichmentEvent::Summary {
            token,
            result: Ok(SummaryPatch {
                search_name: Some("武田神社".to_string()),
                summary: Summary {
                    header: Some("Shrine of the Takeda clan".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            }),
        });
        app.submit_form();

        let item = app.schedule.get(id).unwrap();
        assert_eq!(item.search_name.as_deref(), Some("武田神社"));
        assert_eq!(
            item.summary().and_then(|s| s.header.as_deref()),
            Some("Shrine of the Takeda clan")
        );
    }

    #[test]
    fn test_edit_form_notes_undo() {
        let mut app = create_test_app();
        go_to(&mut app, "08/06");
        app.move_selection_down();
        app.move_selection_down();
        app.start_edit();
        {
            let form = app.form.as_mut().unwrap();
            form.field = FormField::Notes;
        }
        for c in "Order the large pot".chars() {
            app.form_add_char(c);
        }
        app.form_add_note();
        app.form_undo_notes();
        for c in "Share a pot".chars() {
            app.form_add_char(c);
        }
        app.form_add_note();
        app.submit_form();

        let item = app.selected_item().unwrap();
        assert_eq!(item.notes, vec!["Cash only at the counter", "Share a pot"]);
    }

    #[test]
    fn test_form_fine_tuning_fields() {
        let mut app = create_test_app();
        go_to(&mut app, "08/06");
        app.move_selection_down();
        app.start_edit();
        {
            let form = app.form.as_mut().unwrap();
            form.tel = "055-233-8011".to_string();
            form.one_line_tip = "Treasure hall closes at 16:30".to_string();
        }
        app.submit_form();

        let summary = app.selected_item().unwrap().summary().unwrap();
        assert_eq!(summary.tel.as_deref(), Some("055-233-8011"));
        assert_eq!(summary.one_line_tip.as_deref(), Some("Treasure hall closes at 16:30"));
    }

    #[test]
    fn test_expense_editor_saves() {
        let mut app = create_test_app();
        go_to(&mut app, "08/06");
        app.open_expenses();
        assert_eq!(app.ui_mode, UiMode::EditingExpenses);

        for c in "1,000".chars() {
            app.expense_add_char(c);
        }
        app.expense_editor.as_mut().unwrap().add();
        app.save_expenses();

        let item = app.selected_item().unwrap();
        assert_eq!(item.expense_total(), 5130.0);
        assert_eq!(
            item.expenses.last(),
            Some(&Expense::new("Limited express to Kofu", 1000.0))
        );
        assert_eq!(app.daily_total(), 5130.0);
    }

    #[test]
    fn test_cancelled_expenses_are_discarded() {
        let mut app = create_test_app();
        go_to(&mut app, "08/06");
        app.open_expenses();
        app.expense_editor.as_mut().unwrap().remove_selected();
        app.cancel_expenses();
        assert_eq!(app.selected_item().unwrap().expenses.len(), 1);
    }

    #[test]
    fn test_details_event_merges_into_current_item() {
        let mut app = create_test_app();
        let id = app.selected_id().unwrap();
        app.pending.insert(id);
        app.schedule.replace_notes(id, vec!["Edited meanwhile".to_string()]);

        app.handle_enrichment_event(EnrichmentEvent::Details {
            id,
            result: Ok(Details {
                content: Some("Story".to_string()),
                ..Default::default()
            }),
        });

        let item = app.schedule.get(id).unwrap();
        assert!(item.has_details());
        assert_eq!(item.notes, vec!["Edited meanwhile"]);
        assert!(app.pending.is_empty());
        assert!(app.needs_save);
    }

    #[test]
    fn test_failed_details_leave_item_untouched() {
        let mut app = create_test_app();
        let before = app.selected_item().unwrap().clone();
        app.pending.insert(before.id);
        app.batch = Some(BatchProgress::new([before.id]));

        app.handle_enrichment_event(EnrichmentEvent::Details {
            id: before.id,
            result: Err(EnrichError::Network("timeout".to_string())),
        });

        assert_eq!(app.schedule.get(before.id), Some(&before));
        let progress = app.batch.as_ref().unwrap();
        assert_eq!((progress.total, progress.settled, progress.failed), (1, 1, 1));
        assert!(progress.outstanding.is_empty());
        assert!(app.status.as_deref().unwrap().contains("still missing"));
    }

    #[test]
    fn test_batch_progress_counts_only_its_targets() {
        let mut app = create_test_app();
        let ids: Vec<Uuid> = app.schedule.items().iter().map(|i| i.id).take(2).collect();
        app.batch = Some(BatchProgress::new([ids[0]]));

        // A single fetch started earlier settles during the batch
        app.handle_enrichment_event(EnrichmentEvent::Details {
            id: ids[1],
            result: Err(EnrichError::Network("timeout".to_string())),
        });
        app.handle_enrichment_event(EnrichmentEvent::Details {
            id: ids[0],
            result: Ok(Details {
                content: Some("Story".to_string()),
                ..Default::default()
            }),
        });
        // Duplicate delivery for the same target
        app.handle_enrichment_event(EnrichmentEvent::Details {
            id: ids[0],
            result: Err(EnrichError::EmptyResponse),
        });

        let progress = app.batch.as_ref().unwrap();
        assert_eq!((progress.total, progress.settled, progress.failed), (1, 1, 0));
    }

    #[test]
    fn test_batch_finished_clears_progress() {
        let mut app = create_test_app();
        app.batch = Some(BatchProgress::default());
        let summary = BatchSummary {
            succeeded: 2,
            failed: 0,
        };
        app.handle_enrichment_event(EnrichmentEvent::BatchFinished(summary));
        assert!(app.batch.is_none());
        assert_eq!(app.last_batch, Some(summary));
    }

    #[test]
    fn test_autofill_applies_only_to_its_form() {
        let mut app = create_test_app();
        app.start_add();
        let token = app.form.as_ref().unwrap().token;
        app.form.as_mut().unwrap().autofill_pending = true;

        let patch = SummaryPatch {
            short_description: Some("Observation deck".to_string()),
            category: Some(Category::Sight),
            summary: Summary {
                tel: Some("0570-55-0634".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        app.handle_enrichment_event(EnrichmentEvent::Summary {
            token: token + 100,
            result: Ok(patch.clone()),
        });
        assert!(app.form.as_ref().unwrap().description.is_empty());

        app.handle_enrichment_event(EnrichmentEvent::Summary {
            token,
            result: Ok(patch),
        });
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.description, "Observation deck");
        assert_eq!(form.tel, "0570-55-0634");
        assert!(!form.autofill_pending);
    }

    #[test]
    fn test_autofill_after_close_is_dropped() {
        let mut app = create_test_app();
        app.start_add();
        let token = app.form.as_ref().unwrap().token;
        app.cancel_form();

        app.handle_enrichment_event(EnrichmentEvent::Summary {
            token,
            result: Ok(SummaryPatch::default()),
        });
        assert!(app.form.is_none());
    }

    #[test]
    fn test_batch_without_enricher_reports_unavailable() {
        let mut app = create_test_app();
        app.start_batch();
        assert!(app.batch.is_none());
        assert!(app.pending.is_empty());
        assert_eq!(app.status.as_deref(), Some("Enrichment is unavailable"));
    }

    #[test]
    fn test_move_item_reorders_ties() {
        let mut app = create_test_app();
        go_to(&mut app, "08/08");
        app.toggle_branch();
        // B branch: breakfast 07:00, east shore 09:30, fireworks 19:30
        app.start_add();
        {
            let form = app.form.as_mut().unwrap();
            form.name = "Coffee".to_string();
            form.start = "09:30".to_string();
            form.end = "09:45".to_string();
        }
        app.submit_form();
        assert_eq!(
            visible_names(&app),
            vec!["Breakfast near Kyoto station", "East shore viewing points", "Coffee", "Lake Biwa fireworks"]
        );

        app.move_item_up();
        assert_eq!(
            visible_names(&app),
            vec!["Breakfast near Kyoto station", "Coffee", "East shore viewing points", "Lake Biwa fireworks"]
        );
        assert_eq!(app.selected_item().unwrap().name, "Coffee");
    }

    #[test]
    fn test_save_without_data_dir_is_noop() {
        let mut app = create_test_app();
        app.needs_save = true;
        app.save().unwrap();
        assert!(!app.needs_save);
    }

    #[test]
    fn test_save_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = create_test_app();
        app.data_dir = Some(dir.path().to_path_buf());
        app.delete_selected();
        app.save().unwrap();

        let stored = crate::persistence::load_schedule(&schedule_file(dir.path()));
        assert_eq!(stored.iter().filter(|i| i.is_deleted()).count(), 1);
        let meta = crate::persistence::load_metadata(meta_file(dir.path())).unwrap();
        assert_eq!(meta.active_date.as_deref(), Some("08/05"));
    }
}
