//! Report rendering and persistence.
//!
//! Supports Markdown reports, CSV exports and pretty JSON for both per-event
//! rosters and the attendance leaderboard.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::attendance::Leaderboard;
use crate::roster::EventRoster;
use crate::services::ticketing_api::Event;

/// Shown in Markdown tables for empty cells.
const EMPTY_CELL: &str = "—";

fn cell(value: &str) -> &str {
    if value.is_empty() { EMPTY_CELL } else { value }
}

/// Human-readable start date, e.g. `Thursday, March 12 2026 at 18:30`.
///
/// Falls back to the raw string when it cannot be parsed.
pub fn format_event_date(event: &Event) -> String {
    match event.start() {
        Some(start) => start.format("%A, %B %-d %Y at %H:%M").to_string(),
        None => event.start_local.clone().unwrap_or_default(),
    }
}

/// File stem for an event's report files: `report_{date}_{safe_title}`.
pub fn report_stem(event: &Event) -> String {
    let safe: String = event
        .title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe: String = safe.trim().replace(' ', "_").chars().take(60).collect();
    format!("report_{}_{}", event.start_date(), safe)
}

fn footer(lines: &mut Vec<String>, generated_at: NaiveDateTime) {
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(format!(
        "*Report generated on {}*",
        generated_at.format("%Y-%m-%d at %H:%M")
    ));
}

/// Renders the Markdown report for one event.
pub fn render_event_report(event: &Event, roster: &EventRoster, generated_at: NaiveDateTime) -> String {
    let mut lines = vec![
        format!("# {}", event.title),
        String::new(),
        format!("**Date:** {}  ", format_event_date(event)),
        format!("**Location:** {}  ", event.location()),
        format!("**Registrations:** {}  ", roster.len()),
        String::new(),
        "---".to_string(),
        String::new(),
        "## Attendees".to_string(),
        String::new(),
    ];

    if roster.is_empty() {
        lines.push("_No confirmed attendees._".to_string());
    } else {
        lines.push("| # | First Name | Last Name | Company | Dietary |".to_string());
        lines.push("|---|------------|-----------|---------|---------|".to_string());
        for (i, a) in roster.iter().enumerate() {
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                i + 1,
                cell(&a.first_name),
                cell(&a.last_name),
                cell(&a.company),
                cell(&a.dietary),
            ));
        }
    }

    footer(&mut lines, generated_at);
    lines.join("\n")
}

/// Renders the attendance leaderboard as Markdown.
pub fn render_attendance_report(board: &Leaderboard, generated_at: NaiveDateTime) -> String {
    let mut lines = vec![
        "# Attendance overview".to_string(),
        String::new(),
        format!("**Events:** {}  ", board.total_events),
        format!("**People:** {}  ", board.len()),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    if board.is_empty() {
        lines.push("_No attendance recorded._".to_string());
    } else {
        lines.push("| # | Name | Company | Events |".to_string());
        lines.push("|---|------|---------|--------|".to_string());
        for (i, e) in board.entries.iter().enumerate() {
            lines.push(format!(
                "| {} | {} | {} | {} |",
                i + 1,
                cell(&e.canonical_name),
                cell(&e.company),
                e.events_attended,
            ));
        }
    }

    footer(&mut lines, generated_at);
    lines.join("\n")
}

/// Writes a text file, creating parent directories as needed.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "File written");
    Ok(())
}

/// Writes `value` as pretty-printed JSON.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    write_text(path, &serde_json::to_string_pretty(value)?)
}

/// Opens a CSV writer and writes `headers` up front, so empty exports still
/// carry a header row.
fn csv_writer(path: &Path, headers: &[&str]) -> Result<csv::Writer<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(headers)?;
    Ok(writer)
}

#[derive(Serialize)]
struct RosterRow<'a> {
    position: usize,
    first_name: &'a str,
    last_name: &'a str,
    company: &'a str,
    dietary: &'a str,
}

/// Writes a roster as CSV: `#, First Name, Last Name, Company, Dietary`.
pub fn write_roster_csv(path: &Path, roster: &EventRoster) -> Result<()> {
    let mut writer = csv_writer(path, &["#", "First Name", "Last Name", "Company", "Dietary"])?;
    for (i, a) in roster.iter().enumerate() {
        writer.serialize(RosterRow {
            position: i + 1,
            first_name: &a.first_name,
            last_name: &a.last_name,
            company: &a.company,
            dietary: &a.dietary,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct LeaderboardRow<'a> {
    position: usize,
    name: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    company: &'a str,
    events: usize,
}

/// Writes the leaderboard as CSV, one ranked person per row.
pub fn write_leaderboard_csv(path: &Path, board: &Leaderboard) -> Result<()> {
    let mut writer = csv_writer(
        path,
        &["#", "Name", "First Name", "Last Name", "Company", "Events"],
    )?;
    for (i, e) in board.entries.iter().enumerate() {
        writer.serialize(LeaderboardRow {
            position: i + 1,
            name: &e.canonical_name,
            first_name: &e.first_name,
            last_name: &e.last_name,
            company: &e.company,
            events: e.events_attended,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::tally;
    use crate::registration::RegistrationRecord;
    use crate::roster::RosterBuilder;
    use chrono::NaiveDate;
    use std::fs;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
    }

    fn event(title: &str, start: Option<&str>) -> Event {
        Event {
            id: "1".to_string(),
            title: title.to_string(),
            start_local: start.map(str::to_string),
            venue: None,
        }
    }

    fn sample_roster() -> EventRoster {
        RosterBuilder::default().build(&[
            RegistrationRecord::confirmed("Bob", "Lee"),
            RegistrationRecord::confirmed("Alice", "Smith")
                .with_company("Acme")
                .with_answer("Allergies", "Vegan"),
        ])
    }

    #[test]
    fn test_format_event_date() {
        let e = event("x", Some("2026-03-12T18:30:00"));
        assert_eq!(format_event_date(&e), "Thursday, March 12 2026 at 18:30");
    }

    #[test]
    fn test_format_event_date_unparseable() {
        assert_eq!(format_event_date(&event("x", Some("tomorrow"))), "tomorrow");
        assert_eq!(format_event_date(&event("x", None)), "");
    }

    #[test]
    fn test_report_stem_sanitizes_title() {
        let e = event("Rust & Friends: Meetup #3", Some("2026-03-12T18:30:00"));
        assert_eq!(report_stem(&e), "report_2026-03-12_Rust__Friends_Meetup_3");
    }

    #[test]
    fn test_report_stem_truncates() {
        let e = event(&"a".repeat(100), None);
        assert_eq!(report_stem(&e), format!("report__{}", "a".repeat(60)));
    }

    #[test]
    fn test_render_event_report_table() {
        let md = render_event_report(&event("Meetup", None), &sample_roster(), generated_at());

        assert!(md.starts_with("# Meetup\n"));
        assert!(md.contains("**Location:** Online / TBD"));
        assert!(md.contains("**Registrations:** 2"));
        assert!(md.contains("| 1 | Alice | Smith | Acme | Vegan |"));
        assert!(md.contains("| 2 | Bob | Lee | — | — |"));
        assert!(md.ends_with("*Report generated on 2026-03-01 at 09:05*"));
    }

    #[test]
    fn test_render_event_report_empty() {
        let md = render_event_report(&event("Meetup", None), &EventRoster::default(), generated_at());
        assert!(md.contains("**Registrations:** 0"));
        assert!(md.contains("_No confirmed attendees._"));
        assert!(!md.contains("| # |"));
    }

    #[test]
    fn test_render_attendance_report() {
        let a = sample_roster();
        let b = RosterBuilder::default().build(&[RegistrationRecord::confirmed("Alice", "Smith")]);
        let board = tally([&a, &b]).finalize();

        let md = render_attendance_report(&board, generated_at());
        assert!(md.contains("**Events:** 2"));
        assert!(md.contains("| 1 | Alice Smith | — | 2 |"));
        assert!(md.contains("| 2 | Bob Lee | — | 1 |"));
    }

    #[test]
    fn test_write_roster_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");

        write_roster_csv(&path, &sample_roster()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "#,First Name,Last Name,Company,Dietary");
        assert_eq!(lines[1], "1,Alice,Smith,Acme,Vegan");
        assert_eq!(lines[2], "2,Bob,Lee,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_roster_csv_empty_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");

        write_roster_csv(&path, &EventRoster::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "#,First Name,Last Name,Company,Dietary\n");
    }

    #[test]
    fn test_write_leaderboard_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let board = tally([&sample_roster()]).finalize();

        let csv_path = dir.path().join("attendance.csv");
        write_leaderboard_csv(&csv_path, &board).unwrap();
        let content = fs::read_to_string(&csv_path).unwrap();
        assert!(content.starts_with("#,Name,First Name,Last Name,Company,Events\n"));
        assert!(content.contains("1,Alice Smith,Alice,Smith,Acme,1"));

        let json_path = dir.path().join("nested/attendance.json");
        write_json(&json_path, &board).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["total_events"], 1);
        assert_eq!(json["entries"][0]["canonical_name"], "Alice Smith");
    }
}
