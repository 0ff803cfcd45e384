use chrono::{Duration, NaiveDate};
use sirme_core::service::period_stats::{weekly_breakdown, WeeklyHours};
use sirme_core::time::week_start;
use sirme_core::TimeEntryRecord;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "MPS (h)")]
    mps: String,
    #[tabled(rename = "Projects")]
    projects: String,
}

/// Weeks overlapping `start..=end`, newest first.
fn weeks_in_range(records: &[TimeEntryRecord], start: NaiveDate, end: NaiveDate) -> Vec<WeeklyHours> {
    let mut weeks = Vec::new();
    let mut monday = week_start(start);
    while monday <= end {
        weeks.push(weekly_breakdown(records, monday));
        monday = monday + Duration::days(7);
    }
    weeks.reverse();
    weeks
}

/// One line per contribution on `date`, prefixed with whose hours they are.
fn projects_on(records: &[TimeEntryRecord], date: NaiveDate) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.date == date)
        .flat_map(|r| {
            r.projects.iter().map(move |p| {
                format!("{}: {}/{} {:.2}h", r.employee_name, p.client_name, p.project_name, p.hours)
            })
        })
        .collect()
}

fn format_hours(hours: f64) -> String {
    if hours > 0.0 { format!("{:.2}", hours) } else { "-".to_string() }
}

pub fn show_history(records: Vec<TimeEntryRecord>, start: NaiveDate, end: NaiveDate) {
    if records.is_empty() {
        println!("No time entries between {} and {}.", start, end);
        return;
    }

    for week in weeks_in_range(&records, start, end) {
        if week.total == 0.0 {
            continue;
        }
        let mps_total: f64 = week.days.iter().map(|d| d.mps_hours).sum();
        println!(
            "\n\x1b[1;36mWeek of {}\x1b[0m (Total: {:.2}h, MPS: {:.2}h)",
            week.week_start, week.total, mps_total
        );

        let rows: Vec<DayRow> = week
            .days
            .iter()
            .filter(|d| d.date >= start && d.date <= end)
            .map(|day| {
                let projects = projects_on(&records, day.date);
                DayRow {
                    date: day.date.format("%Y-%m-%d").to_string(),
                    day: day.day_of_week.clone(),
                    hours: format_hours(day.hours),
                    mps: format_hours(day.mps_hours),
                    projects: projects.join("\n"),
                }
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::modern())
            .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
        println!("{}", table);
    }
}
