use super::clock::{minutes_of_day, MINUTES_PER_DAY};
use super::item::ScheduleItem;
use chrono::NaiveTime;

/// Which slice of the schedule is on screen
#[derive(Debug, Clone, Copy)]
pub struct DayFilter<'a> {
    pub date: &'a str,
    /// Selected branch for split days
    pub branch: Option<&'a str>,
    /// Whether the trip configures branches for `date`
    pub has_branches: bool,
}

impl<'a> DayFilter<'a> {
    pub fn matches(&self, item: &ScheduleItem) -> bool {
        if !item.is_active() || item.date != self.date {
            return false;
        }
        if !self.has_branches {
            return true;
        }
        match (&item.plan_branch, self.branch) {
            (None, _) => true,
            (Some(tag), Some(selected)) => tag == selected,
            (Some(_), None) => false,
        }
    }
}

/// Sort weight: starts before `cutoff` count as the tail of the previous night
pub fn night_weight(start: NaiveTime, cutoff: NaiveTime) -> i32 {
    let minutes = minutes_of_day(start);
    if start < cutoff {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}

/// Order items by night weight, then order hint
pub fn sort_day(items: &mut [&ScheduleItem], cutoff: NaiveTime) {
    items.sort_by_key(|i| (night_weight(i.time_start, cutoff), i.order_hint));
}

/// Active items for the selected day and branch, in display order
pub fn visible_items<'a>(
    items: &'a [ScheduleItem],
    filter: &DayFilter<'_>,
    cutoff: NaiveTime,
) -> Vec<&'a ScheduleItem> {
    let mut visible: Vec<&ScheduleItem> = items.iter().filter(|i| filter.matches(i)).collect();
    sort_day(&mut visible, cutoff);
    visible
}

/// Soft-deleted items in storage order
pub fn trash_items(items: &[ScheduleItem]) -> Vec<&ScheduleItem> {
    items.iter().filter(|i| i.is_deleted()).collect()
}

/// Sum of expenses over the given (already filtered) items
pub fn daily_total(visible: &[&ScheduleItem]) -> f64 {
    visible.iter().map(|i| i.expense_total()).sum()
}

/// Sum of expenses over every active item on every day
pub fn global_total(items: &[ScheduleItem]) -> f64 {
    items
        .iter()
        .filter(|i| i.is_active())
        .map(ScheduleItem::expense_total)
        .sum()
}

/// (eligible items that have details, eligible items), active only
pub fn enrichment_coverage(items: &[ScheduleItem]) -> (usize, usize) {
    items
        .iter()
        .filter(|i| i.is_active() && i.category.wants_details())
        .fold((0, 0), |(done, total), i| {
            (done + usize::from(i.has_details()), total + 1)
        })
}

/// Status marker shown at the end of a card
pub fn detail_marker(item: &ScheduleItem, pending: bool) -> Option<&'static str> {
    if pending {
        Some("⏳ pending")
    } else if item.needs_details() {
        Some("∅ details missing")
    } else if item.has_details() {
        Some("📖")
    } else {
        None
    }
}

/// Format an amount as yen with thousands separators
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        format!("-¥{}", out)
    } else {
        format!("¥{}", out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::{format_hhmm, parse_hhmm};
    use crate::domain::enums::{Category, ItemStatus};
    use crate::domain::item::{Details, Expense};
    use pretty_assertions::assert_eq;

    fn cutoff() -> NaiveTime {
        parse_hhmm("04:00").unwrap()
    }

    fn item(date: &str, start: &str) -> ScheduleItem {
        ScheduleItem::new(
            date,
            Category::Sight,
            start,
            parse_hhmm(start).unwrap(),
            parse_hhmm(start).unwrap(),
        )
    }

    fn starts(items: &[&ScheduleItem]) -> Vec<String> {
        items.iter().map(|i| format_hhmm(i.time_start)).collect()
    }

    #[test]
    fn test_night_weight() {
        assert_eq!(night_weight(parse_hhmm("06:00").unwrap(), cutoff()), 360);
        assert_eq!(night_weight(parse_hhmm("23:00").unwrap(), cutoff()), 1380);
        assert_eq!(night_weight(parse_hhmm("00:45").unwrap(), cutoff()), 1485);
        assert_eq!(night_weight(parse_hhmm("01:30").unwrap(), cutoff()), 1530);
        assert_eq!(night_weight(parse_hhmm("04:00").unwrap(), cutoff()), 240);
    }

    #[test]
    fn test_night_carry_sort() {
        let items = vec![
            item("08/05", "23:00"),
            item("08/05", "00:45"),
            item("08/05", "06:00"),
            item("08/05", "01:30"),
        ];
        let filter = DayFilter {
            date: "08/05",
            branch: None,
            has_branches: false,
        };
        let visible = visible_items(&items, &filter, cutoff());
        assert_eq!(starts(&visible), vec!["06:00", "23:00", "00:45", "01:30"]);
    }

    #[test]
    fn test_cutoff_is_configurable() {
        let items = vec![item("08/05", "03:00"), item("08/05", "23:00")];
        let filter = DayFilter {
            date: "08/05",
            branch: None,
            has_branches: false,
        };
        let early = parse_hhmm("02:30").unwrap();
        assert_eq!(
            starts(&visible_items(&items, &filter, early)),
            vec!["03:00", "23:00"]
        );
        assert_eq!(
            starts(&visible_items(&items, &filter, cutoff())),
            vec!["23:00", "03:00"]
        );
    }

    #[test]
    fn test_order_hint_breaks_ties() {
        let mut a = item("08/06", "10:00");
        a.name = "second".to_string();
        a.order_hint = 2;
        let mut b = item("08/06", "10:00");
        b.name = "first".to_string();
        b.order_hint = 1;
        let items = vec![a, b];
        let filter = DayFilter {
            date: "08/06",
            branch: None,
            has_branches: false,
        };
        let names: Vec<&str> = visible_items(&items, &filter, cutoff())
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_plan_branch_filtering() {
        let mut shared = item("08/08", "08:00");
        shared.name = "shared".to_string();
        let mut a = item("08/08", "09:00");
        a.name = "a".to_string();
        a.plan_branch = Some("A".to_string());
        let mut b = item("08/08", "10:00");
        b.name = "b".to_string();
        b.plan_branch = Some("B".to_string());
        let items = vec![shared, a, b];

        let filter = DayFilter {
            date: "08/08",
            branch: Some("A"),
            has_branches: true,
        };
        let names: Vec<&str> = visible_items(&items, &filter, cutoff())
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["shared", "a"]);

        let unsplit = DayFilter {
            date: "08/08",
            branch: Some("A"),
            has_branches: false,
        };
        assert_eq!(visible_items(&items, &unsplit, cutoff()).len(), 3);
    }

    #[test]
    fn test_deleted_and_other_days_hidden() {
        let mut gone = item("08/06", "09:00");
        gone.status = ItemStatus::Deleted;
        let items = vec![gone, item("08/07", "09:00"), item("08/06", "11:00")];
        let filter = DayFilter {
            date: "08/06",
            branch: None,
            has_branches: false,
        };
        assert_eq!(starts(&visible_items(&items, &filter, cutoff())), vec!["11:00"]);
        assert_eq!(trash_items(&items).len(), 1);
    }

    #[test]
    fn test_totals() {
        let mut a = item("08/06", "09:00");
        a.expenses.push(Expense::new("Entry", 500.0));
        let mut b = item("08/07", "09:00");
        b.expenses.push(Expense::new("Lunch", 1200.0));
        let mut c = item("08/06", "12:00");
        c.expenses.push(Expense::new("Souvenir", 3000.0));
        c.status = ItemStatus::Deleted;
        let items = vec![a, b, c];

        let filter = DayFilter {
            date: "08/06",
            branch: None,
            has_branches: false,
        };
        let visible = visible_items(&items, &filter, cutoff());
        assert_eq!(daily_total(&visible), 500.0);
        assert_eq!(global_total(&items), 1700.0);
    }

    #[test]
    fn test_enrichment_coverage_and_marker() {
        let mut done = item("08/06", "09:00");
        done.merge_details(Details {
            content: Some("Long text".to_string()),
            ..Default::default()
        });
        let missing = item("08/06", "10:00");
        let mut transit = item("08/06", "11:00");
        transit.category = Category::Transport;
        let items = vec![done.clone(), missing.clone(), transit.clone()];

        assert_eq!(enrichment_coverage(&items), (1, 2));
        assert_eq!(detail_marker(&missing, false), Some("∅ details missing"));
        assert_eq!(detail_marker(&missing, true), Some("⏳ pending"));
        assert_eq!(detail_marker(&done, false), Some("📖"));
        assert_eq!(detail_marker(&transit, false), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "¥0");
        assert_eq!(format_amount(980.0), "¥980");
        assert_eq!(format_amount(10933.0), "¥10,933");
        assert_eq!(format_amount(1234567.4), "¥1,234,567");
    }
}
