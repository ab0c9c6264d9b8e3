use super::enums::ItemStatus;
use super::item::{Details, Expense, ScheduleItem, SummaryPatch};
use super::timeshift::{apply_edit, ShiftReport};
use super::views::{visible_items, DayFilter};
use chrono::NaiveTime;
use tracing::{debug, info};
use uuid::Uuid;

/// Result of the delete action, which depends on the item's current status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Active item moved to the trash
    SoftDeleted,
    /// Trashed item removed for good
    Removed,
    NotFound,
}

/// The authoritative collection of schedule items, in storage order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    items: Vec<ScheduleItem>,
}

impl Schedule {
    pub fn new(items: Vec<ScheduleItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ScheduleItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ScheduleItem> {
        self.items.iter().find(|i| i.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut ScheduleItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Every distinct date present in the collection
    pub fn dates(&self) -> Vec<String> {
        let mut dates: Vec<String> = self.items.iter().map(|i| i.date.clone()).collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Append a new item with a fresh id, active status and the next order hint for its date
    pub fn add(&mut self, mut item: ScheduleItem) -> Uuid {
        item.id = self.fresh_id();
        item.status = ItemStatus::Active;
        item.order_hint = self
            .items
            .iter()
            .filter(|i| i.date == item.date)
            .map(|i| i.order_hint)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0);

        let id = item.id;
        info!(%id, name = %item.name, date = %item.date, "added item");
        self.items.push(item);
        id
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.get(id).is_none() {
                return id;
            }
        }
    }

    /// Move an active item to the trash; all other fields are kept
    pub fn soft_delete(&mut self, id: Uuid) -> bool {
        match self.get_mut(id) {
            Some(item) if item.is_active() => {
                item.status = ItemStatus::Deleted;
                debug!(%id, "soft deleted item");
                true
            }
            _ => false,
        }
    }

    /// Bring a trashed item back; only the status changes
    pub fn restore(&mut self, id: Uuid) -> bool {
        match self.get_mut(id) {
            Some(item) if item.is_deleted() => {
                item.status = ItemStatus::Active;
                debug!(%id, "restored item");
                true
            }
            _ => false,
        }
    }

    /// Remove a trashed item permanently; active items are refused
    pub fn hard_delete(&mut self, id: Uuid) -> Option<ScheduleItem> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id && i.is_deleted())?;
        let removed = self.items.remove(pos);
        info!(%id, name = %removed.name, "permanently deleted item");
        Some(removed)
    }

    /// Delete action: first press trashes, a second press on the trashed item removes it
    pub fn delete(&mut self, id: Uuid) -> DeleteOutcome {
        match self.get(id).map(|i| i.status) {
            Some(ItemStatus::Active) => {
                self.soft_delete(id);
                DeleteOutcome::SoftDeleted
            }
            Some(ItemStatus::Deleted) => {
                self.hard_delete(id);
                DeleteOutcome::Removed
            }
            None => DeleteOutcome::NotFound,
        }
    }

    /// Full-field replace by id, rippling time changes through the rest of the day
    pub fn update(&mut self, item: ScheduleItem) -> ShiftReport {
        apply_edit(&mut self.items, item)
    }

    /// Swap order hints with the visible neighbour in `direction` (-1 up, +1 down)
    pub fn move_item(
        &mut self,
        id: Uuid,
        direction: i32,
        filter: &DayFilter<'_>,
        cutoff: NaiveTime,
    ) -> bool {
        let order: Vec<(Uuid, i64)> = visible_items(&self.items, filter, cutoff)
            .iter()
            .map(|i| (i.id, i.order_hint))
            .collect();

        let Some(pos) = order.iter().position(|(i, _)| *i == id) else {
            return false;
        };
        let target = pos as i64 + i64::from(direction.signum());
        if direction == 0 || target < 0 || target as usize >= order.len() {
            return false;
        }

        let (this_id, this_hint) = order[pos];
        let (other_id, other_hint) = order[target as usize];

        // Equal hints would leave the pair in place, so pin them to their positions
        let (new_this, new_other) = if this_hint == other_hint {
            (target, pos as i64)
        } else {
            (other_hint, this_hint)
        };

        if let Some(item) = self.get_mut(this_id) {
            item.order_hint = new_this;
        }
        if let Some(item) = self.get_mut(other_id) {
            item.order_hint = new_other;
        }
        true
    }

    pub fn replace_expenses(&mut self, id: Uuid, expenses: Vec<Expense>) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.expenses = expenses;
                true
            }
            None => false,
        }
    }

    pub fn replace_notes(&mut self, id: Uuid, notes: Vec<String>) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.notes = notes;
                true
            }
            None => false,
        }
    }

    /// Overlay a summary response onto whatever the item holds right now
    pub fn merge_summary(&mut self, id: Uuid, patch: SummaryPatch) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.apply_summary_patch(patch);
                true
            }
            None => false,
        }
    }

    /// Replace the item's details, leaving its summary alone
    pub fn merge_details(&mut self, id: Uuid, details: Details) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.merge_details(details);
                true
            }
            None => false,
        }
    }
}
