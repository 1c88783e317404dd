//! Registration records as handed over by the ticketing client.

/// Whether a ticket holder counts as attending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceStatus {
    Confirmed,
    /// Any other upstream status, kept verbatim for logging.
    Other(String),
}

impl AttendanceStatus {
    /// Maps an Eventbrite attendee status onto [`AttendanceStatus`].
    ///
    /// `Attending` and `Checked In` are confirmed, in any case and with
    /// either a space or an underscore.
    pub fn from_api(status: &str) -> Self {
        let normalized = status.trim().to_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "attending" | "checked_in" => AttendanceStatus::Confirmed,
            _ => AttendanceStatus::Other(status.to_string()),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, AttendanceStatus::Confirmed)
    }
}

/// One answer to a custom registration question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionAnswer {
    pub label: String,
    pub answer: String,
}

impl QuestionAnswer {
    pub fn new(label: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            answer: answer.into(),
        }
    }
}

/// One ticket holder for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub status: AttendanceStatus,
    /// In the order the event defines its questions.
    pub answers: Vec<QuestionAnswer>,
}

impl RegistrationRecord {
    /// A confirmed registration without company or answers.
    pub fn confirmed(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            company: None,
            status: AttendanceStatus::Confirmed,
            answers: Vec::new(),
        }
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }

    pub fn with_status(mut self, status: AttendanceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_answer(mut self, label: &str, answer: &str) -> Self {
        self.answers.push(QuestionAnswer::new(label, answer));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_api_confirmed_variants() {
        assert!(AttendanceStatus::from_api("Attending").is_confirmed());
        assert!(AttendanceStatus::from_api("attending").is_confirmed());
        assert!(AttendanceStatus::from_api("Checked In").is_confirmed());
        assert!(AttendanceStatus::from_api("checked_in").is_confirmed());
    }

    #[test]
    fn test_status_from_api_other() {
        assert_eq!(
            AttendanceStatus::from_api("Not Attending"),
            AttendanceStatus::Other("Not Attending".to_string())
        );
        assert!(!AttendanceStatus::from_api("").is_confirmed());
        assert!(!AttendanceStatus::from_api("Deleted").is_confirmed());
    }

    #[test]
    fn test_builder_helpers() {
        let record = RegistrationRecord::confirmed("Alice", "Smith")
            .with_company("Acme")
            .with_answer("T-shirt size", "L");

        assert_eq!(record.company.as_deref(), Some("Acme"));
        assert_eq!(record.answers.len(), 1);
        assert!(record.status.is_confirmed());
    }
}
