//! Cross-event attendance counting.
//!
//! Each event's roster is folded into an [`AttendanceTally`] exactly once;
//! [`AttendanceTally::finalize`] then ranks everyone into a [`Leaderboard`].

use serde::Serialize;
use std::collections::HashMap;

use crate::roster::EventRoster;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TallyEntry {
    events_attended: usize,
    first_name: String,
    last_name: String,
    company: String,
}

/// Running per-person attendance counters, keyed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct AttendanceTally {
    entries: HashMap<String, TallyEntry>,
    events: usize,
}

impl AttendanceTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event's roster into the tally.
    ///
    /// Every call counts as a distinct event: folding the same roster twice
    /// counts it twice. Display fields are overwritten, so whichever roster is
    /// folded last decides the shown spelling and company.
    pub fn accumulate(mut self, roster: &EventRoster) -> Self {
        self.events += 1;

        for attendee in roster {
            let entry = self
                .entries
                .entry(attendee.canonical_name.clone())
                .or_insert_with(|| TallyEntry {
                    events_attended: 0,
                    first_name: String::new(),
                    last_name: String::new(),
                    company: String::new(),
                });

            entry.events_attended += 1;
            entry.first_name.clone_from(&attendee.first_name);
            entry.last_name.clone_from(&attendee.last_name);
            entry.company.clone_from(&attendee.company);
        }

        self
    }

    /// Number of rosters folded so far.
    pub fn events(&self) -> usize {
        self.events
    }

    /// Number of distinct people seen so far.
    pub fn people(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, canonical_name: &str) -> usize {
        self.entries
            .get(canonical_name)
            .map_or(0, |e| e.events_attended)
    }

    /// Ranks the tally: most events first, ties by canonical name
    /// (case-insensitive, then exact for a total order).
    pub fn finalize(self) -> Leaderboard {
        let mut entries: Vec<LeaderboardEntry> = self
            .entries
            .into_iter()
            .map(|(canonical_name, e)| LeaderboardEntry {
                canonical_name,
                first_name: e.first_name,
                last_name: e.last_name,
                company: e.company,
                events_attended: e.events_attended,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.events_attended
                .cmp(&a.events_attended)
                .then_with(|| {
                    a.canonical_name
                        .to_lowercase()
                        .cmp(&b.canonical_name.to_lowercase())
                })
                .then_with(|| a.canonical_name.cmp(&b.canonical_name))
        });

        Leaderboard {
            total_events: self.events,
            entries,
        }
    }
}

/// Tallies a whole event history in one go.
pub fn tally<'a, I>(rosters: I) -> AttendanceTally
where
    I: IntoIterator<Item = &'a EventRoster>,
{
    rosters
        .into_iter()
        .fold(AttendanceTally::new(), AttendanceTally::accumulate)
}

/// One ranked person on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub canonical_name: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub events_attended: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    pub total_events: usize,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::RegistrationRecord;
    use crate::roster::RosterBuilder;

    fn roster(people: &[(&str, &str, &str)]) -> EventRoster {
        let registrations: Vec<_> = people
            .iter()
            .map(|(first, last, company)| {
                RegistrationRecord::confirmed(first, last).with_company(company)
            })
            .collect();
        RosterBuilder::default().build(&registrations)
    }

    fn counts(board: &Leaderboard) -> Vec<(&str, usize)> {
        board
            .entries
            .iter()
            .map(|e| (e.canonical_name.as_str(), e.events_attended))
            .collect()
    }

    #[test]
    fn test_two_event_leaderboard() {
        let a = roster(&[("Alice", "Smith", ""), ("Bob", "Lee", "")]);
        let b = roster(&[("Alice", "Smith", "")]);

        let board = tally([&a, &b]).finalize();

        assert_eq!(counts(&board), vec![("Alice Smith", 2), ("Bob Lee", 1)]);
        assert_eq!(board.total_events, 2);
    }

    #[test]
    fn test_empty_history() {
        let board = AttendanceTally::new().finalize();
        assert!(board.is_empty());
        assert_eq!(board.total_events, 0);
    }

    #[test]
    fn test_empty_roster_leaves_counts_unchanged() {
        let a = roster(&[("Alice", "Smith", "")]);
        let before = AttendanceTally::new().accumulate(&a);
        let after = before.clone().accumulate(&EventRoster::default());

        assert_eq!(after.count("Alice Smith"), before.count("Alice Smith"));
        assert_eq!(after.people(), before.people());
    }

    #[test]
    fn test_counts_independent_of_fold_order() {
        let a = roster(&[("Alice", "Smith", "Acme"), ("Bob", "Lee", "")]);
        let b = roster(&[("Alice", "Smith", "Initech"), ("Carol", "King", "")]);
        let c = roster(&[("Bob", "Lee", ""), ("Carol", "King", "")]);

        let forward = tally([&a, &b, &c]).finalize();
        let backward = tally([&c, &b, &a]).finalize();

        assert_eq!(counts(&forward), counts(&backward));
    }

    #[test]
    fn test_last_folded_roster_wins_display_fields() {
        let a = roster(&[("Alice", "Smith", "Acme")]);
        let b = roster(&[("Alice", "Smith", "Initech")]);

        let board = tally([&a, &b]).finalize();
        assert_eq!(board.entries[0].company, "Initech");

        let board = tally([&b, &a]).finalize();
        assert_eq!(board.entries[0].company, "Acme");
    }

    #[test]
    fn test_ties_broken_by_name_case_insensitive() {
        let a = roster(&[("bob", "Lee", ""), ("Alice", "Smith", ""), ("Carl", "Ng", "")]);

        let board = tally([&a]).finalize();
        assert_eq!(
            counts(&board),
            vec![("Alice Smith", 1), ("bob Lee", 1), ("Carl Ng", 1)]
        );
    }

    #[test]
    fn test_reapplying_roster_counts_twice() {
        let a = roster(&[("Alice", "Smith", "")]);
        let t = tally([&a, &a]);
        assert_eq!(t.count("Alice Smith"), 2);
        assert_eq!(t.events(), 2);
    }
}
