pub mod clock;
pub mod enums;
pub mod item;
pub mod ledger;
pub mod links;
pub mod notes;
pub mod schedule;
pub mod timeshift;
pub mod trip;
pub mod views;

pub use clock::{format_hhmm, format_span, parse_hhmm, span_minutes, TimeParseError};
pub use enums::{Category, ItemStatus, UiMode, View};
pub use item::{Details, Enrichment, Expense, ScheduleItem, Summary, SummaryPatch};
pub use ledger::{ExpenseEditor, ExpenseField};
pub use notes::NotesEditor;
pub use schedule::{DeleteOutcome, Schedule};
pub use timeshift::ShiftReport;
pub use trip::{Phrase, Trip};
pub use views::{
    daily_total, detail_marker, enrichment_coverage, format_amount, global_total, trash_items,
    visible_items, DayFilter,
};
