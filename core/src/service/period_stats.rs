use std::collections::{BTreeMap, HashMap};
use serde::{Deserialize, Serialize};
use chrono::{Datelike, Duration, NaiveDate};

use crate::model::time_entry::TimeEntryRecord;
use crate::service::ordering::compare_names;
use crate::time::{month_end, month_start, week_start};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyHours {
    pub date: NaiveDate,
    pub day_of_week: String, // Mon, Tue...
    pub hours: f64,
    pub mps_hours: f64,
}

impl DailyHours {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            day_of_week: date.format("%a").to_string(),
            hours: 0.0,
            mps_hours: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeeklyHours {
    pub week_start: NaiveDate,
    pub days: Vec<DailyHours>, // Monday..Sunday
    pub total: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyHours {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DailyHours>, // only days with hours
    pub total: f64,
    pub mps_total: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientHours {
    pub client_name: String,
    pub hours: f64,
}

pub fn weekly_breakdown(records: &[TimeEntryRecord], date_in_week: NaiveDate) -> WeeklyHours {
    let start = week_start(date_in_week);
    let mut days: Vec<DailyHours> = (0..7)
        .map(|i| DailyHours::empty(start + Duration::days(i)))
        .collect();

    for record in records {
        let offset = (record.date - start).num_days();
        if (0..7).contains(&offset) {
            let day = &mut days[offset as usize];
            day.hours += record.total_hours();
            day.mps_hours += record.mps_hours();
        }
    }

    let total = days.iter().map(|d| d.hours).sum();
    WeeklyHours { week_start: start, days, total }
}

pub fn monthly_breakdown(records: &[TimeEntryRecord], date_in_month: NaiveDate) -> MonthlyHours {
    let first = month_start(date_in_month);
    let last = month_end(date_in_month);

    let mut by_day: BTreeMap<NaiveDate, DailyHours> = BTreeMap::new();
    for record in records.iter().filter(|r| r.date >= first && r.date <= last) {
        let hours = record.total_hours();
        if hours <= 0.0 {
            continue;
        }
        let day = by_day.entry(record.date).or_insert_with(|| DailyHours::empty(record.date));
        day.hours += hours;
        day.mps_hours += record.mps_hours();
    }

    let days: Vec<DailyHours> = by_day.into_values().collect();
    MonthlyHours {
        year: first.year(),
        month: first.month(),
        total: days.iter().map(|d| d.hours).sum(),
        mps_total: days.iter().map(|d| d.mps_hours).sum(),
        days,
    }
}

/// Hours per client, largest first.
pub fn client_breakdown(records: &[TimeEntryRecord]) -> Vec<ClientHours> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for record in records {
        for project in &record.projects {
            *totals.entry(project.client_name.as_str()).or_default() += project.hours;
        }
    }

    let mut clients: Vec<ClientHours> = totals
        .into_iter()
        .map(|(name, hours)| ClientHours { client_name: name.to_string(), hours })
        .collect();
    clients.sort_by(|a, b| {
        b.hours
            .partial_cmp(&a.hours)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| compare_names(&a.client_name, &b.client_name))
    });
    clients
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time_entry::ProjectContribution;
    use crate::time::parse_iso_date;

    fn record(date: &str, projects: Vec<ProjectContribution>) -> TimeEntryRecord {
        let mut r = TimeEntryRecord::new("Ann", parse_iso_date(date).unwrap());
        r.projects = projects;
        r
    }

    fn mps(client: &str, hours: f64) -> ProjectContribution {
        let mut p = ProjectContribution::new(client, "P", hours);
        p.is_mps = true;
        p
    }

    #[test]
    fn test_weekly_breakdown() {
        let records = vec![
            record("2024-07-29", vec![ProjectContribution::new("C", "P", 8.0)]),
            record("2024-08-04", vec![mps("C", 2.0)]),
            record("2024-08-05", vec![ProjectContribution::new("C", "P", 5.0)]),
        ];
        let week = weekly_breakdown(&records, parse_iso_date("2024-08-01").unwrap());

        assert_eq!(week.week_start, parse_iso_date("2024-07-29").unwrap());
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].day_of_week, "Mon");
        assert_eq!(week.days[0].hours, 8.0);
        assert_eq!(week.days[6].mps_hours, 2.0);
        assert_eq!(week.total, 10.0);
    }

    #[test]
    fn test_monthly_breakdown() {
        let records = vec![
            record("2024-08-02", vec![ProjectContribution::new("C", "P", 3.0), mps("D", 1.0)]),
            record("2024-08-01", vec![ProjectContribution::new("C", "P", 2.0)]),
            record("2024-08-03", vec![]),
            record("2024-09-01", vec![ProjectContribution::new("C", "P", 9.0)]),
        ];
        let month = monthly_breakdown(&records, parse_iso_date("2024-08-20").unwrap());

        assert_eq!((month.year, month.month), (2024, 8));
        assert_eq!(month.days.len(), 2);
        assert_eq!(month.days[0].date, parse_iso_date("2024-08-01").unwrap());
        assert_eq!(month.total, 6.0);
        assert_eq!(month.mps_total, 1.0);
    }

    #[test]
    fn test_client_breakdown() {
        let records = vec![
            record("2024-08-01", vec![ProjectContribution::new("beta", "P", 2.0), mps("Acme", 5.0)]),
            record("2024-08-02", vec![ProjectContribution::new("Gamma", "P", 2.0)]),
        ];
        let clients = client_breakdown(&records);
        let names: Vec<_> = clients.iter().map(|c| c.client_name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "beta", "Gamma"]);
    }
}
