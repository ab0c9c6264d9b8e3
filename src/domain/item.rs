use super::clock::{format_span, hhmm, span_minutes};
use super::enums::{Category, ItemStatus};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One labelled amount in an item's expense list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(alias = "item")]
    pub label: String,
    pub amount: f64,
}

impl Expense {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Short structured card fields produced by a summary request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stay_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_line_tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_guide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
}

/// Overwrite `slot` only when `incoming` carries a non-blank value
fn overlay_field(slot: &mut Option<String>, incoming: Option<String>) {
    if let Some(value) = incoming {
        if !value.trim().is_empty() {
            *slot = Some(value);
        }
    }
}

impl Summary {
    /// Merge `patch` into this summary key by key; blank or missing fields keep their old value
    pub fn overlay(&mut self, patch: Summary) {
        overlay_field(&mut self.header, patch.header);
        overlay_field(&mut self.transport_mode, patch.transport_mode);
        overlay_field(&mut self.primary_info, patch.primary_info);
        overlay_field(&mut self.secondary_info, patch.secondary_info);
        overlay_field(&mut self.location_keyword, patch.location_keyword);
        overlay_field(&mut self.stay_time, patch.stay_time);
        overlay_field(&mut self.one_line_tip, patch.one_line_tip);
        overlay_field(&mut self.photo_guide, patch.photo_guide);
        overlay_field(&mut self.tel, patch.tel);
    }

    /// Set a single fine-tuning field from the edit form (blank clears it)
    pub fn set_field(slot: &mut Option<String>, value: &str) {
        let trimmed = value.trim();
        *slot = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
}

/// Long-form narrative produced by a details request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Details {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_advice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_tip: Option<String>,
    #[serde(default, alias = "tour_guide_advice", skip_serializing_if = "Option::is_none")]
    pub guide_advice: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_buy: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_eat: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Details {
    /// Details count as present only when the main body text is non-blank
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }
}

/// AI-generated text attached to an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(default)]
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

/// Result of a summary request, applied to an item or an open form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryPatch {
    pub short_description: Option<String>,
    pub search_name: Option<String>,
    pub category: Option<Category>,
    pub summary: Summary,
}

/// One entry of the itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: Uuid,
    /// Day label such as "08/06"
    pub date: String,
    /// Alternative route tag; `None` means shown for every branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_branch: Option<String>,
    pub category: Category,
    pub name: String,
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub order_hint: i64,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Local-language search keyword used for social links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ScheduleItem {
    pub fn new(
        date: impl Into<String>,
        category: Category,
        name: impl Into<String>,
        time_start: NaiveTime,
        time_end: NaiveTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: date.into(),
            plan_branch: None,
            category,
            name: name.into(),
            time_start,
            time_end,
            short_description: String::new(),
            status: ItemStatus::Active,
            order_hint: 0,
            expenses: Vec::new(),
            search_name: None,
            enrichment: None,
            notes: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    pub fn is_deleted(&self) -> bool {
        self.status == ItemStatus::Deleted
    }

    /// Sum of all expense amounts
    pub fn expense_total(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.enrichment.as_ref().map(|e| &e.summary)
    }

    pub fn details(&self) -> Option<&Details> {
        self.enrichment.as_ref().and_then(|e| e.details.as_ref())
    }

    pub fn has_details(&self) -> bool {
        self.details().map(Details::has_content).unwrap_or(false)
    }

    /// Eligible for the batch details action and still missing its content
    pub fn needs_details(&self) -> bool {
        self.category.wants_details() && !self.has_details()
    }

    /// Mutable enrichment, created empty on first access
    pub fn enrichment_mut(&mut self) -> &mut Enrichment {
        self.enrichment.get_or_insert_with(Enrichment::default)
    }

    /// Overlay summary fields key by key
    pub fn merge_summary(&mut self, patch: Summary) {
        self.enrichment_mut().summary.overlay(patch);
    }

    /// Replace details wholesale, leaving the summary untouched
    pub fn merge_details(&mut self, details: Details) {
        self.enrichment_mut().details = Some(details);
    }

    /// Apply a summary response: text fields overlay when non-blank, summary keys overlay one by one
    pub fn apply_summary_patch(&mut self, patch: SummaryPatch) {
        if let Some(desc) = patch.short_description.filter(|d| !d.trim().is_empty()) {
            self.short_description = desc;
        }
        if let Some(search) = patch.search_name.filter(|s| !s.trim().is_empty()) {
            self.search_name = Some(search);
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        self.merge_summary(patch.summary);
    }

    /// Duration label for the card; falls back to the summary stay time
    pub fn duration_display(&self) -> String {
        let minutes = span_minutes(self.time_start, self.time_end);
        if minutes == 0 {
            if let Some(stay) = self.summary().and_then(|s| s.stay_time.clone()) {
                return stay;
            }
        }
        format_span(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::parse_hhmm;

    fn item(start: &str, end: &str) -> ScheduleItem {
        ScheduleItem::new(
            "08/06",
            Category::Sight,
            "Zenko-ji",
            parse_hhmm(start).unwrap(),
            parse_hhmm(end).unwrap(),
        )
    }

    #[test]
    fn test_new_item_defaults() {
        let it = item("09:00", "10:00");
        assert!(it.is_active());
        assert!(it.expenses.is_empty());
        assert!(it.enrichment.is_none());
        assert!(it.plan_branch.is_none());
        assert!(it.needs_details());
    }

    #[test]
    fn test_expense_total() {
        let mut it = item("09:00", "10:00");
        it.expenses.push(Expense::new("Entry", 500.0));
        it.expenses.push(Expense::new("Omamori", 1200.0));
        assert_eq!(it.expense_total(), 1700.0);
    }

    #[test]
    fn test_summary_overlay_keeps_unreturned_fields() {
        let mut it = item("09:00", "10:00");
        it.merge_summary(Summary {
            tel: Some("+81-26-234-3591".to_string()),
            one_line_tip: Some("Go early".to_string()),
            ..Default::default()
        });

        it.merge_summary(Summary {
            one_line_tip: Some("Take the morning ritual".to_string()),
            tel: Some("   ".to_string()),
            primary_info: Some("Zenko-ji Temple".to_string()),
            ..Default::default()
        });

        let summary = it.summary().unwrap();
        assert_eq!(summary.tel.as_deref(), Some("+81-26-234-3591"));
        assert_eq!(summary.one_line_tip.as_deref(), Some("Take the morning ritual"));
        assert_eq!(summary.primary_info.as_deref(), Some("Zenko-ji Temple"));
    }

    #[test]
    fn test_details_replace_wholesale_and_keep_summary() {
        let mut it = item("09:00", "10:00");
        it.merge_summary(Summary {
            header: Some("Temple".to_string()),
            ..Default::default()
        });
        it.merge_details(Details {
            content: Some("Old text".to_string()),
            history: Some("Founded long ago".to_string()),
            ..Default::default()
        });
        it.merge_details(Details {
            content: Some("New text".to_string()),
            ..Default::default()
        });

        let details = it.details().unwrap();
        assert_eq!(details.content.as_deref(), Some("New text"));
        assert!(details.history.is_none());
        assert_eq!(it.summary().unwrap().header.as_deref(), Some("Temple"));
        assert!(!it.needs_details());
    }

    #[test]
    fn test_apply_summary_patch() {
        let mut it = item("09:00", "10:00");
        it.short_description = "Old".to_string();
        it.apply_summary_patch(SummaryPatch {
            short_description: Some(" ".to_string()),
            search_name: Some("善光寺".to_string()),
            category: Some(Category::Food),
            summary: Summary {
                stay_time: Some("1hr".to_string()),
                ..Default::default()
            },
        });

        assert_eq!(it.short_description, "Old");
        assert_eq!(it.search_name.as_deref(), Some("善光寺"));
        assert_eq!(it.category, Category::Food);
        assert_eq!(it.summary().unwrap().stay_time.as_deref(), Some("1hr"));
    }

    #[test]
    fn test_blank_details_do_not_count() {
        let mut it = item("09:00", "10:00");
        it.merge_details(Details {
            content: Some("  ".to_string()),
            ..Default::default()
        });
        assert!(!it.has_details());
        assert!(it.needs_details());
    }

    #[test]
    fn test_transport_never_needs_details() {
        let mut it = item("20:25", "00:45");
        it.category = Category::Transport;
        assert!(!it.needs_details());
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(item("20:25", "00:45").duration_display(), "4hr 20m");
        assert_eq!(item("10:00", "10:45").duration_display(), "45m");

        let mut same = item("10:00", "10:00");
        same.merge_summary(Summary {
            stay_time: Some("2.5hr".to_string()),
            ..Default::default()
        });
        assert_eq!(same.duration_display(), "2.5hr");
    }

    #[test]
    fn test_deserialize_minimal_item() {
        let json = r#"{
            "id": "6f1c1a52-3c55-4c8e-9d0e-4f5b1f8b9a01",
            "date": "08/05",
            "category": "activity",
            "name": "Check-in",
            "time_start": "17:55",
            "time_end": "20:25",
            "expenses": [{"item": "Snack", "amount": 300}]
        }"#;
        let it: ScheduleItem = serde_json::from_str(json).unwrap();
        assert_eq!(it.category, Category::Sight);
        assert_eq!(it.status, ItemStatus::Active);
        assert_eq!(it.order_hint, 0);
        assert_eq!(it.expenses[0].label, "Snack");
        assert!(it.notes.is_empty());
    }

    #[test]
    fn test_deserialize_rejects_bad_time() {
        let json = r#"{
            "id": "6f1c1a52-3c55-4c8e-9d0e-4f5b1f8b9a01",
            "date": "08/05",
            "category": "food",
            "name": "Ramen",
            "time_start": "25:00",
            "time_end": "26:00"
        }"#;
        assert!(serde_json::from_str::<ScheduleItem>(json).is_err());
    }
}
