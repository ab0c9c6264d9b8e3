use super::clock::{format_hhmm, minutes_of_day, time_from_minutes, MINUTES_PER_DAY};
use super::item::ScheduleItem;
use tracing::{debug, warn};
use uuid::Uuid;

/// What an edit did to the rest of the day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftReport {
    /// Minutes applied to downstream items (0 when nothing rippled)
    pub shift: i32,
    /// Items that were moved by `shift`
    pub shifted: Vec<Uuid>,
    /// Items left alone because the shifted start fell outside the day
    pub skipped: Vec<Uuid>,
    /// Whether the edited item was found and replaced
    pub replaced: bool,
}

/// Pick the single ripple amount: end delta first, then start delta
pub fn compute_shift(old: &ScheduleItem, new: &ScheduleItem) -> i32 {
    let start_delta = minutes_of_day(new.time_start) - minutes_of_day(old.time_start);
    let end_delta = minutes_of_day(new.time_end) - minutes_of_day(old.time_end);

    if end_delta != 0 {
        end_delta
    } else {
        start_delta
    }
}

/// Replace `edited` in `items` (matched by id) and ripple its time change onto
/// every later same-day item in storage order.
///
/// Items before the edited one, and items on other dates, are never touched.
/// A downstream item whose shifted start would land outside 00:00..24:00 keeps
/// its original times and a warning is logged. Shifted end times wrap around
/// midnight so overnight spans stay overnight.
pub fn apply_edit(items: &mut [ScheduleItem], edited: ScheduleItem) -> ShiftReport {
    let mut report = ShiftReport::default();

    let Some(pos) = items.iter().position(|i| i.id == edited.id) else {
        debug!(id = %edited.id, "edit target not found, ignoring");
        return report;
    };

    let same_date = items[pos].date == edited.date;
    let shift = if same_date {
        compute_shift(&items[pos], &edited)
    } else {
        0
    };

    let date = edited.date.clone();
    items[pos] = edited;
    report.replaced = true;

    if shift == 0 {
        return report;
    }
    report.shift = shift;

    for item in items.iter_mut().skip(pos + 1) {
        if item.date != date {
            continue;
        }

        let new_start = minutes_of_day(item.time_start) + shift;
        if !(0..MINUTES_PER_DAY).contains(&new_start) {
            warn!(
                item = %item.name,
                start = %format_hhmm(item.time_start),
                shift,
                "shift would move start outside the day, leaving item unchanged"
            );
            report.skipped.push(item.id);
            continue;
        }

        let new_end = minutes_of_day(item.time_end) + shift;
        item.time_start = time_from_minutes(new_start);
        item.time_end = time_from_minutes(new_end);
        report.shifted.push(item.id);
    }

    debug!(
        shift,
        shifted = report.shifted.len(),
        skipped = report.skipped.len(),
        "applied time shift"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::parse_hhmm;
    use crate::domain::enums::Category;
    use pretty_assertions::assert_eq;

    fn item(date: &str, name: &str, start: &str, end: &str) -> ScheduleItem {
        ScheduleItem::new(
            date,
            Category::Sight,
            name,
            parse_hhmm(start).unwrap(),
            parse_hhmm(end).unwrap(),
        )
    }

    fn times(item: &ScheduleItem) -> (String, String) {
        (format_hhmm(item.time_start), format_hhmm(item.time_end))
    }

    fn hm(start: &str, end: &str) -> (String, String) {
        (start.to_string(), end.to_string())
    }

    #[test]
    fn test_end_extension_ripples_forward() {
        let mut items = vec![
            item("08/06", "Breakfast", "09:00", "10:00"),
            item("08/06", "Temple", "10:00", "11:00"),
            item("08/06", "Lunch", "11:00", "12:00"),
        ];

        let mut edited = items[1].clone();
        edited.time_end = parse_hhmm("11:30").unwrap();
        let report = apply_edit(&mut items, edited);

        assert_eq!(report.shift, 30);
        assert_eq!(times(&items[0]), hm("09:00", "10:00"));
        assert_eq!(times(&items[1]), hm("10:00", "11:30"));
        assert_eq!(times(&items[2]), hm("11:30", "12:30"));
    }

    #[test]
    fn test_other_dates_and_earlier_items_untouched() {
        let mut items = vec![
            item("08/06", "Early", "07:00", "08:00"),
            item("08/06", "Edited", "09:00", "10:00"),
            item("08/07", "Tomorrow", "09:30", "10:30"),
            item("08/06", "Later", "10:00", "11:00"),
        ];
        let before_first = items[0].clone();
        let before_other_day = items[2].clone();

        let mut edited = items[1].clone();
        edited.time_end = parse_hhmm("10:45").unwrap();
        apply_edit(&mut items, edited);

        assert_eq!(items[0], before_first);
        assert_eq!(items[2], before_other_day);
        assert_eq!(times(&items[3]), hm("10:45", "11:45"));
    }

    #[test]
    fn test_start_delta_used_when_end_unchanged() {
        let mut items = vec![
            item("08/06", "A", "09:00", "10:00"),
            item("08/06", "B", "10:00", "11:00"),
        ];
        let mut edited = items[0].clone();
        edited.time_start = parse_hhmm("08:30").unwrap();
        let report = apply_edit(&mut items, edited);

        assert_eq!(report.shift, -30);
        assert_eq!(times(&items[1]), hm("09:30", "10:30"));
    }

    #[test]
    fn test_end_delta_preferred_over_start_delta() {
        let mut old = item("08/06", "A", "09:00", "10:00");
        let mut new = old.clone();
        new.time_start = parse_hhmm("09:15").unwrap();
        new.time_end = parse_hhmm("10:40").unwrap();
        assert_eq!(compute_shift(&old, &new), 40);

        old.time_end = new.time_end;
        assert_eq!(compute_shift(&old, &new), 15);
    }

    #[test]
    fn test_no_time_change_replaces_only() {
        let mut items = vec![
            item("08/06", "A", "09:00", "10:00"),
            item("08/06", "B", "10:00", "11:00"),
        ];
        let before = items[1].clone();
        let mut edited = items[0].clone();
        edited.name = "Renamed".to_string();
        let report = apply_edit(&mut items, edited);

        assert_eq!(report.shift, 0);
        assert!(report.replaced);
        assert_eq!(items[0].name, "Renamed");
        assert_eq!(items[1], before);
    }

    #[test]
    fn test_date_change_does_not_ripple() {
        let mut items = vec![
            item("08/06", "A", "09:00", "10:00"),
            item("08/06", "B", "10:00", "11:00"),
        ];
        let mut edited = items[0].clone();
        edited.date = "08/07".to_string();
        edited.time_end = parse_hhmm("12:00").unwrap();
        let report = apply_edit(&mut items, edited);

        assert_eq!(report.shift, 0);
        assert_eq!(items[0].date, "08/07");
        assert_eq!(times(&items[1]), hm("10:00", "11:00"));
    }

    #[test]
    fn test_midnight_overflow_skips_only_that_item() {
        let mut items = vec![
            item("08/06", "Dinner", "20:00", "21:00"),
            item("08/06", "Bar", "21:00", "22:00"),
            item("08/06", "Late show", "23:30", "23:50"),
        ];
        let late_before = items[2].clone();

        let mut edited = items[0].clone();
        edited.time_end = parse_hhmm("22:00").unwrap();
        let report = apply_edit(&mut items, edited);

        assert_eq!(report.shift, 60);
        assert_eq!(times(&items[1]), hm("22:00", "23:00"));
        assert_eq!(items[2], late_before);
        assert_eq!(report.skipped, vec![late_before.id]);
    }

    #[test]
    fn test_negative_shift_below_midnight_is_skipped() {
        let mut items = vec![
            item("08/06", "A", "01:00", "02:00"),
            item("08/06", "B", "00:15", "00:30"),
        ];
        let mut edited = items[0].clone();
        edited.time_end = parse_hhmm("01:30").unwrap();
        let report = apply_edit(&mut items, edited);

        assert_eq!(report.shift, -30);
        assert_eq!(times(&items[1]), hm("00:15", "00:30"));
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn test_shifted_end_wraps_past_midnight() {
        let mut items = vec![
            item("08/05", "Check-in", "18:00", "19:00"),
            item("08/05", "Flight", "20:25", "23:45"),
        ];
        let mut edited = items[0].clone();
        edited.time_end = parse_hhmm("20:00").unwrap();
        apply_edit(&mut items, edited);

        assert_eq!(times(&items[1]), hm("21:25", "00:45"));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut items = vec![item("08/06", "A", "09:00", "10:00")];
        let before = items.clone();
        let stranger = item("08/06", "Ghost", "09:00", "12:00");
        let report = apply_edit(&mut items, stranger);

        assert!(!report.replaced);
        assert_eq!(items, before);
    }

    #[test]
    fn test_deleted_and_branch_items_still_shift() {
        let mut items = vec![
            item("08/08", "A", "09:00", "10:00"),
            item("08/08", "B", "10:00", "11:00"),
            item("08/08", "C", "11:00", "12:00"),
        ];
        items[1].plan_branch = Some("B".to_string());
        items[2].status = crate::domain::enums::ItemStatus::Deleted;

        let mut edited = items[0].clone();
        edited.time_end = parse_hhmm("10:10").unwrap();
        apply_edit(&mut items, edited);

        assert_eq!(times(&items[1]), hm("10:10", "11:10"));
        assert_eq!(times(&items[2]), hm("11:10", "12:10"));
    }
}
