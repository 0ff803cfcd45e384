use chrono::NaiveDate;
use sirme_core::service::period_stats::{monthly_breakdown, MonthlyHours};
use sirme_core::TimeEntryRecord;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct CalendarRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "MPS (h)")]
    mps: String,
}

fn calendar_rows(month: &MonthlyHours) -> Vec<CalendarRow> {
    month
        .days
        .iter()
        .map(|day| CalendarRow {
            date: day.date.format("%Y-%m-%d").to_string(),
            day: day.day_of_week.clone(),
            hours: format!("{:.2}", day.hours),
            mps: if day.mps_hours > 0.0 { format!("{:.2}", day.mps_hours) } else { "-".to_string() },
        })
        .collect()
}

/// Days of `month` with logged hours for `employee`.
pub fn show_calendar(records: &[TimeEntryRecord], employee: &str, month: NaiveDate) {
    let mine: Vec<TimeEntryRecord> = records
        .iter()
        .filter(|r| r.employee_name == employee)
        .cloned()
        .collect();
    let breakdown = monthly_breakdown(&mine, month);

    println!(
        "\x1b[1;36m{} {:04}-{:02}\x1b[0m",
        employee, breakdown.year, breakdown.month
    );
    if breakdown.days.is_empty() {
        println!("No hours logged this month.");
        return;
    }

    let mut table = Table::new(calendar_rows(&breakdown));
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
    println!(
        "Total: {:.2}h over {} days (MPS: {:.2}h)",
        breakdown.total,
        breakdown.days.len(),
        breakdown.mps_total
    );
}
