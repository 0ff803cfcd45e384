use std::collections::HashMap;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use crate::model::time_entry::ProjectContribution;
use crate::time::parse_date_arg;

pub const ENTRY_KEYS: [&str; 6] = ["client", "project", "hours", "date", "mps", "notes"];

/// A contribution as typed on the command line, e.g.
/// `client:Acme project:Portal hours:2.5 date:yesterday mps:yes`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInput {
    pub date: NaiveDate,
    pub contribution: ProjectContribution,
}

/// Splits `key:value` tokens from free text. Free text becomes the notes
/// unless a `notes:` key is given.
pub fn parse_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut free = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        free.push(arg.clone());
    }

    (free, metadata)
}

/// Resolves an abbreviated key against `candidates` by unique prefix.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err(anyhow!("Expected yes/no, got '{}'", value)),
    }
}

/// Builds an entry from CLI tokens. Field-level checks (blank names, hour
/// bounds) are left to the validators.
pub fn parse_entry(args: &[String], today: NaiveDate) -> Result<EntryInput> {
    let (free, raw) = parse_args(args);

    let mut fields = HashMap::new();
    for (key, value) in raw {
        fields.insert(expand_key(&key, &ENTRY_KEYS)?, value);
    }

    let hours = match fields.get("hours") {
        Some(h) => h.parse::<f64>().with_context(|| format!("Invalid hours '{}'", h))?,
        None => return Err(anyhow!("hours: is required")),
    };
    let date = match fields.get("date") {
        Some(d) => parse_date_arg(d, today)?,
        None => today,
    };
    let is_mps = match fields.get("mps") {
        Some(v) => parse_flag(v)?,
        None => false,
    };
    let notes = fields
        .get("notes")
        .cloned()
        .or_else(|| if free.is_empty() { None } else { Some(free.join(" ")) });

    Ok(EntryInput {
        date,
        contribution: ProjectContribution {
            client_name: fields.get("client").cloned().unwrap_or_default(),
            project_name: fields.get("project").cloned().unwrap_or_default(),
            hours,
            is_mps,
            notes,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_expand_key() {
        assert_eq!(expand_key("cl", &ENTRY_KEYS).unwrap(), "client");
        assert_eq!(expand_key("pro", &ENTRY_KEYS).unwrap(), "project");
        assert_eq!(expand_key("h", &ENTRY_KEYS).unwrap(), "hours");
        assert!(expand_key("x", &ENTRY_KEYS).is_err());
    }

    #[test]
    fn test_parse_entry() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        let entry = parse_entry(
            &args(&["cl:Acme", "pro:Portal", "h:2.5", "date:yesterday", "mps:yes", "Sprint", "review"]),
            today,
        )
        .unwrap();

        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 8, 14).unwrap());
        assert_eq!(entry.contribution.client_name, "Acme");
        assert_eq!(entry.contribution.project_name, "Portal");
        assert_eq!(entry.contribution.hours, 2.5);
        assert!(entry.contribution.is_mps);
        assert_eq!(entry.contribution.notes.as_deref(), Some("Sprint review"));
    }

    #[test]
    fn test_parse_entry_errors() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        assert!(parse_entry(&args(&["client:Acme"]), today).is_err());
        assert!(parse_entry(&args(&["hours:two"]), today).is_err());
        assert!(parse_entry(&args(&["hours:1", "mps:maybe"]), today).is_err());

        let bare = parse_entry(&args(&["hours:1"]), today).unwrap();
        assert_eq!(bare.date, today);
        assert_eq!(bare.contribution.client_name, "");
    }
}
