use crate::domain::{enrichment_coverage, visible_items, Category, DayFilter, ScheduleItem};
use chrono::NaiveTime;

/// Statistics for one day of the trip
#[derive(Debug, Clone, PartialEq)]
pub struct DayStats {
    pub date: String,
    pub stop_count: usize,
    pub total_spent: f64,
    /// Stops that belong to a plan branch
    pub branch_stops: usize,
}

/// Statistics for the whole trip
#[derive(Debug, Clone, PartialEq)]
pub struct TripStats {
    pub days: Vec<DayStats>,
    pub active_count: usize,
    pub trashed_count: usize,
    pub global_total: f64,
    /// (eligible stops with details, eligible stops)
    pub coverage: (usize, usize),
}

impl TripStats {
    pub fn coverage_percent(&self) -> f64 {
        match self.coverage {
            (_, 0) => 0.0,
            (done, total) => done as f64 / total as f64 * 100.0,
        }
    }
}

/// Every active stop of a day, all branches included, in display order
pub fn day_items<'a>(items: &'a [ScheduleItem], date: &str, cutoff: NaiveTime) -> Vec<&'a ScheduleItem> {
    let filter = DayFilter {
        date,
        branch: None,
        has_branches: false,
    };
    visible_items(items, &filter, cutoff)
}

pub fn calculate_day_stats(items: &[ScheduleItem], date: &str, cutoff: NaiveTime) -> DayStats {
    let day = day_items(items, date, cutoff);
    DayStats {
        date: date.to_string(),
        stop_count: day.len(),
        total_spent: day.iter().map(|i| i.expense_total()).sum(),
        branch_stops: day.iter().filter(|i| i.plan_branch.is_some()).count(),
    }
}

/// Spending per category over active stops; categories with no spending are left out
pub fn calculate_category_totals(items: &[ScheduleItem]) -> Vec<(Category, f64)> {
    Category::all()
        .iter()
        .map(|category| {
            let total: f64 = items
                .iter()
                .filter(|i| i.is_active() && i.category == *category)
                .map(ScheduleItem::expense_total)
                .sum();
            (*category, total)
        })
        .filter(|(_, total)| *total > 0.0)
        .collect()
}

pub fn calculate_trip_stats(items: &[ScheduleItem], dates: &[String], cutoff: NaiveTime) -> TripStats {
    let days: Vec<DayStats> = dates
        .iter()
        .map(|date| calculate_day_stats(items, date, cutoff))
        .collect();

    TripStats {
        global_total: items
            .iter()
            .filter(|i| i.is_active())
            .map(ScheduleItem::expense_total)
            .sum(),
        active_count: items.iter().filter(|i| i.is_active()).count(),
        trashed_count: items.iter().filter(|i| i.is_deleted()).count(),
        coverage: enrichment_coverage(items),
        days,
    }
}
