use chrono::{Datelike, Duration, Local, NaiveDate};
use anyhow::{anyhow, Result};

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let day_of_week = date.weekday().num_days_from_sunday() as i64;
    let back = if day_of_week == 0 { 6 } else { day_of_week - 1 };
    date - Duration::days(back)
}

pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    match next_month {
        Some(first) => first - Duration::days(1),
        None => date,
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_week_start() -> NaiveDate {
    week_start(today())
}

pub fn current_week_end() -> NaiveDate {
    week_end(today())
}

pub fn current_month_start() -> NaiveDate {
    month_start(today())
}

pub fn current_month_end() -> NaiveDate {
    month_end(today())
}

/// Plain `YYYY-MM-DD`. The result carries no time or zone, so it cannot shift.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow!("Invalid date '{}': {}", input, e))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYYMMDD`, as used in export file names.
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// `"<day>-<Mon>"`, e.g. `1-Aug`. The year is not part of the label.
pub fn day_column_label(date: NaiveDate) -> String {
    format!("{}-{}", date.day(), date.format("%b"))
}

/// One label per day from `start` to `end` inclusive. Ranges longer than a year
/// repeat labels.
pub fn generate_day_columns(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(day_column_label)
        .collect()
}

/// Date argument as typed on the command line: an ISO date or a keyword
/// relative to `today`.
pub fn parse_date_arg(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    match input.trim().to_lowercase().as_str() {
        "today" | "tod" => Ok(today),
        "yesterday" | "yes" => Ok(today - Duration::days(1)),
        "sow" => Ok(week_start(today)),
        "eow" => Ok(week_end(today)),
        "som" => Ok(month_start(today)),
        "eom" => Ok(month_end(today)),
        _ => parse_iso_date(input),
    }
}

/// Month argument: `YYYY-MM`, or any date accepted by `parse_date_arg`.
/// Returns the first day of that month.
pub fn parse_month_arg(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_arg(trimmed, today).map(month_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    #[test]
    fn test_week_bounds() {
        // 2024-08-01 is a Thursday
        assert_eq!(week_start(d("2024-08-01")), d("2024-07-29"));
        assert_eq!(week_end(d("2024-08-01")), d("2024-08-04"));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_start(d("2024-08-04")), d("2024-07-29"));
        // Monday is its own start
        assert_eq!(week_start(d("2024-07-29")), d("2024-07-29"));
    }

    #[test]
    fn test_week_contains_date() {
        let mut date = d("2023-12-20");
        for _ in 0..40 {
            let start = week_start(date);
            let end = week_end(date);
            assert!(start <= date && date <= end);
            assert_eq!((end - start).num_days(), 6);
            date = date + Duration::days(1);
        }
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_start(d("2024-02-17")), d("2024-02-01"));
        assert_eq!(month_end(d("2024-02-17")), d("2024-02-29"));
        assert_eq!(month_end(d("2023-12-05")), d("2023-12-31"));
    }

    #[test]
    fn test_day_columns() {
        assert_eq!(generate_day_columns(d("2024-08-01"), d("2024-08-01")), vec!["1-Aug"]);
        assert_eq!(
            generate_day_columns(d("2024-07-30"), d("2024-08-02")),
            vec!["30-Jul", "31-Jul", "1-Aug", "2-Aug"]
        );
        assert!(generate_day_columns(d("2024-08-02"), d("2024-08-01")).is_empty());
    }

    #[test]
    fn test_day_columns_repeat_after_a_year() {
        let cols = generate_day_columns(d("2023-01-01"), d("2024-01-01"));
        assert_eq!(cols.len(), 366);
        assert_eq!(cols.first(), cols.last());
    }

    #[test]
    fn test_parse_date_arg() {
        let today = d("2024-08-15");
        assert_eq!(parse_date_arg("today", today).unwrap(), today);
        assert_eq!(parse_date_arg("som", today).unwrap(), d("2024-08-01"));
        assert_eq!(parse_date_arg("eom", today).unwrap(), d("2024-08-31"));
        assert_eq!(parse_date_arg("sow", today).unwrap(), d("2024-08-12"));
        assert_eq!(parse_date_arg("2024-01-02", today).unwrap(), d("2024-01-02"));
        assert!(parse_date_arg("someday", today).is_err());
        assert_eq!(compact_date(today), "20240815");
    }

    #[test]
    fn test_parse_month_arg() {
        let today = d("2024-08-15");
        assert_eq!(parse_month_arg("2024-02", today).unwrap(), d("2024-02-01"));
        assert_eq!(parse_month_arg("today", today).unwrap(), d("2024-08-01"));
        assert_eq!(parse_month_arg("2023-12-25", today).unwrap(), d("2023-12-01"));
        assert!(parse_month_arg("2024-13", today).is_err());
    }
}
