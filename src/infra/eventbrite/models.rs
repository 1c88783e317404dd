//! Wire types for the subset of the Eventbrite API we read.
//!
//! Every field is defaulted: Eventbrite omits or nulls fields freely and a
//! missing company or answer must never fail a report.

use serde::Deserialize;

use crate::registration::{AttendanceStatus, QuestionAnswer, RegistrationRecord};
use crate::services::ticketing_api::Event;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub has_more_items: bool,
    pub continuation: Option<String>,
}

/// A list response that may span several pages.
pub trait Page {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Pagination);
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrganizationsPage {
    pub organizations: Vec<OrganizationDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrganizationDto {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventsPage {
    pub events: Vec<EventDto>,
    pub pagination: Pagination,
}

impl Page for EventsPage {
    type Item = EventDto;

    fn into_parts(self) -> (Vec<EventDto>, Pagination) {
        (self.events, self.pagination)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TextDto {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DateTimeDto {
    pub local: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VenueDto {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventDto {
    pub id: String,
    pub name: Option<TextDto>,
    pub start: Option<DateTimeDto>,
    pub venue: Option<VenueDto>,
}

impl From<EventDto> for Event {
    fn from(dto: EventDto) -> Self {
        Event {
            title: dto
                .name
                .and_then(|n| n.text)
                .unwrap_or_else(|| "Untitled Event".to_string()),
            start_local: dto.start.and_then(|s| s.local),
            venue: dto.venue.and_then(|v| v.name).filter(|n| !n.is_empty()),
            id: dto.id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttendeesPage {
    pub attendees: Vec<AttendeeDto>,
    pub pagination: Pagination,
}

impl Page for AttendeesPage {
    type Item = AttendeeDto;

    fn into_parts(self) -> (Vec<AttendeeDto>, Pagination) {
        (self.attendees, self.pagination)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnswerDto {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttendeeDto {
    pub status: Option<String>,
    /// Sent as `null` for some cancelled or transferred orders.
    pub profile: Option<ProfileDto>,
    pub answers: Option<Vec<AnswerDto>>,
}

impl From<AttendeeDto> for RegistrationRecord {
    fn from(dto: AttendeeDto) -> Self {
        let profile = dto.profile.unwrap_or_default();
        RegistrationRecord {
            first_name: profile.first_name.unwrap_or_default(),
            last_name: profile.last_name.unwrap_or_default(),
            company: profile.company.filter(|c| !c.is_empty()),
            status: AttendanceStatus::from_api(dto.status.as_deref().unwrap_or("")),
            answers: dto
                .answers
                .unwrap_or_default()
                .into_iter()
                .map(|a| {
                    QuestionAnswer::new(a.question.unwrap_or_default(), a.answer.unwrap_or_default())
                })
                .collect(),
        }
    }
}
