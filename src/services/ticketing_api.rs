//! Trait and types for talking to a ticketing platform.

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::registration::RegistrationRecord;

/// Venue label used when an event has no physical venue.
pub const NO_VENUE: &str = "Online / TBD";

/// Metadata for a single event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub title: String,
    /// Local start time as sent by the platform (ISO 8601, no offset).
    pub start_local: Option<String>,
    pub venue: Option<String>,
}

impl Event {
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start_local
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
    }

    /// `YYYY-MM-DD` part of the start time, or an empty string.
    pub fn start_date(&self) -> &str {
        self.start_local
            .as_deref()
            .and_then(|s| s.get(..10))
            .unwrap_or("")
    }

    pub fn location(&self) -> &str {
        self.venue.as_deref().unwrap_or(NO_VENUE)
    }
}

/// Abstraction over a ticketing provider (e.g., Eventbrite).
///
/// Implementations report failures with their own error type inside the
/// `anyhow::Error`; callers that care can `downcast_ref` it.
#[async_trait::async_trait]
pub trait TicketingApi {
    /// Returns the id of the first organization the token belongs to.
    async fn organization_id(&self) -> Result<String>;

    /// Returns the soonest live or started event of `org_id`.
    async fn next_event(&self, org_id: &str) -> Result<Event>;

    /// Returns every past event of `org_id`, oldest first.
    async fn past_events(&self, org_id: &str) -> Result<Vec<Event>>;

    async fn event(&self, event_id: &str) -> Result<Event>;

    /// Returns every registration of `event_id` across all result pages.
    async fn attendees(&self, event_id: &str) -> Result<Vec<RegistrationRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: Option<&str>, venue: Option<&str>) -> Event {
        Event {
            id: "1".to_string(),
            title: "Meetup".to_string(),
            start_local: start.map(str::to_string),
            venue: venue.map(str::to_string),
        }
    }

    #[test]
    fn test_start_parses_local_time() {
        let e = event(Some("2026-03-12T18:30:00"), None);
        let start = e.start().unwrap();
        assert_eq!(start.format("%H:%M").to_string(), "18:30");
        assert_eq!(e.start_date(), "2026-03-12");
    }

    #[test]
    fn test_start_missing_or_invalid() {
        assert!(event(None, None).start().is_none());
        assert!(event(Some("soon"), None).start().is_none());
        assert_eq!(event(None, None).start_date(), "");
        assert_eq!(event(Some("soon"), None).start_date(), "");
    }

    #[test]
    fn test_location_fallback() {
        assert_eq!(event(None, None).location(), NO_VENUE);
        assert_eq!(event(None, Some("Library")).location(), "Library");
    }
}
