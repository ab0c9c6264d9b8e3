use crate::config::Config;
use crate::domain::{format_amount, format_hhmm, Schedule, ScheduleItem, Trip};
use crate::persistence::{config_file, load_schedule, load_trip, schedule_file, trip_file};
use crate::report::stats::{calculate_category_totals, calculate_trip_stats, day_items};
use anyhow::{bail, Result};
use chrono::NaiveTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn push_item(report: &mut String, item: &ScheduleItem) {
    let branch = item
        .plan_branch
        .as_ref()
        .map(|b| format!(" [Plan {}]", b))
        .unwrap_or_default();
    report.push_str(&format!(
        "- **{}-{}** {} {}{} ({})\n",
        format_hhmm(item.time_start),
        format_hhmm(item.time_end),
        item.category.symbol(),
        item.name,
        branch,
        item.duration_display()
    ));

    if !item.short_description.trim().is_empty() {
        report.push_str(&format!("  - {}\n", item.short_description));
    }
    if let Some(tip) = item.summary().and_then(|s| s.one_line_tip.as_ref()) {
        report.push_str(&format!("  - Tip: {}\n", tip));
    }
    for expense in &item.expenses {
        report.push_str(&format!(
            "  - {} {}\n",
            expense.label,
            format_amount(expense.amount)
        ));
    }
    for note in &item.notes {
        report.push_str(&format!("  - Note: {}\n", note));
    }
}

/// Render the Markdown itinerary for one day, or every day when `date` is `None`
pub fn render_report(trip: &Trip, items: &[ScheduleItem], date: Option<&str>, cutoff: NaiveTime) -> String {
    let all_dates = trip.tab_dates(&Schedule::new(items.to_vec()).dates());
    let dates: Vec<String> = match date {
        Some(d) => vec![d.to_string()],
        None => all_dates.clone(),
    };
    let stats = calculate_trip_stats(items, &dates, cutoff);

    let mut report = String::new();

    // Header
    let title = if trip.title.is_empty() { "Trip" } else { trip.title.as_str() };
    match date {
        Some(d) => report.push_str(&format!("# {} - {}\n\n", title, d)),
        None => report.push_str(&format!("# {}\n\n", title)),
    }

    // Summary Section
    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Stops:** {} active, {} in trash\n",
        stats.active_count, stats.trashed_count
    ));
    report.push_str(&format!(
        "- **Total Spent:** {}\n",
        format_amount(stats.global_total)
    ));
    report.push_str(&format!(
        "- **AI Details:** {}/{} ({})\n\n",
        stats.coverage.0,
        stats.coverage.1,
        format_percent(stats.coverage_percent())
    ));

    // Spending Section
    let categories = calculate_category_totals(items);
    if !categories.is_empty() {
        report.push_str("## Spending by Category\n\n");
        for (category, total) in categories {
            report.push_str(&format!(
                "- {} **{}:** {}\n",
                category.symbol(),
                category.label(),
                format_amount(total)
            ));
        }
        report.push('\n');
    }

    // Days Section
    for day in &stats.days {
        let weekday = trip
            .days
            .iter()
            .find(|d| d.date == day.date)
            .map(|d| format!(" {}", d.weekday))
            .unwrap_or_default();
        let label = match all_dates.iter().position(|d| *d == day.date) {
            Some(idx) => format!("Day {} · {}{}", idx + 1, day.date, weekday),
            None => day.date.clone(),
        };
        report.push_str(&format!("## {}\n\n", label));

        if let Some(plans) = trip.branches_for(&day.date) {
            for (tag, plan) in plans {
                report.push_str(&format!("> Plan {}: {}\n", tag, plan));
            }
            report.push('\n');
        }

        let items = day_items(items, &day.date, cutoff);
        if items.is_empty() {
            report.push_str("_Nothing planned._\n\n");
        }
        for item in items {
            push_item(&mut report, item);
        }
        if let Some(stay) = trip.stay_for(&day.date) {
            report.push_str(&format!("\n- Stay: {} ({})\n", stay.name, stay.price));
        }
        report.push_str(&format!(
            "\n**Day total:** {}\n\n",
            format_amount(day.total_spent)
        ));
    }

    report
}

/// Load the stored trip and write its report, returning the output path
pub fn generate_report(data_dir: &Path, date: Option<&str>, output_path: Option<PathBuf>) -> Result<PathBuf> {
    let config = Config::load(&config_file(data_dir));
    let items = load_schedule(&schedule_file(data_dir));
    let trip = load_trip(&trip_file(data_dir));

    if let Some(d) = date {
        let known = trip.tab_dates(&Schedule::new(items.clone()).dates());
        if !known.iter().any(|k| k == d) {
            bail!("Unknown date {}. Trip days: {}", d, known.join(", "));
        }
    }

    let report = render_report(&trip, &items, date, config.night_cutoff());

    // Determine output path
    let output = match output_path {
        Some(path) => path,
        None => {
            let suffix = date.map(|d| d.replace('/', "-")).unwrap_or_else(|| "trip".to_string());
            data_dir.join(format!("report-{}.md", suffix))
        }
    };

    fs::write(&output, report)?;
    info!(path = %output.display(), "wrote report");
    Ok(output)
}
