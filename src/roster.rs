//! Per-event attendee rosters.
//!
//! A [`RosterBuilder`] turns the raw registrations of one event into an
//! [`EventRoster`]: confirmed attendees only, one entry per canonical
//! identity, sorted by first name.

use std::collections::HashSet;
use tracing::debug;

use crate::identity::{AliasMap, full_name};
use crate::questions::extract_dietary_value;
use crate::registration::RegistrationRecord;

/// A confirmed attendee of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeEntry {
    pub canonical_name: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub dietary: String,
}

/// The deduplicated, sorted attendee list of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRoster {
    entries: Vec<AttendeeEntry>,
}

impl EventRoster {
    pub fn entries(&self) -> &[AttendeeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttendeeEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a EventRoster {
    type Item = &'a AttendeeEntry;
    type IntoIter = std::slice::Iter<'a, AttendeeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds rosters against a fixed alias map.
#[derive(Debug, Clone, Default)]
pub struct RosterBuilder {
    aliases: AliasMap,
}

impl RosterBuilder {
    pub fn new(aliases: AliasMap) -> Self {
        Self { aliases }
    }

    /// Builds the roster for one event.
    ///
    /// When several confirmed registrations resolve to the same canonical
    /// name, the first one in input order is kept. Ordering is by first name,
    /// then last name (both case-insensitive), then input order.
    pub fn build(&self, registrations: &[RegistrationRecord]) -> EventRoster {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for registration in registrations {
            if !registration.status.is_confirmed() {
                continue;
            }

            let raw = full_name(&registration.first_name, &registration.last_name);
            let canonical = self.aliases.normalize(&raw).to_string();

            if !seen.insert(canonical.clone()) {
                debug!(name = %canonical, "Skipping duplicate registration");
                continue;
            }

            entries.push(AttendeeEntry {
                canonical_name: canonical,
                first_name: registration.first_name.clone(),
                last_name: registration.last_name.clone(),
                company: registration.company.clone().unwrap_or_default(),
                dietary: extract_dietary_value(&registration.answers),
            });
        }

        // Stable sort keeps input order for equal names.
        entries.sort_by_cached_key(|e| (e.first_name.to_lowercase(), e.last_name.to_lowercase()));

        debug!(
            registrations = registrations.len(),
            attendees = entries.len(),
            "Roster built"
        );

        EventRoster { entries }
    }
}
