//! Extraction of structured attributes from custom registration questions.

use crate::registration::QuestionAnswer;

/// Label fragment identifying the dietary-restrictions question.
///
/// Matches Dutch labels like `Allergieën/dieetwensen` as well as English
/// ones like `Food allergies`.
pub const DIETARY_MARKER: &str = "allergie";

/// Returns the trimmed answer to the first question whose label contains
/// [`DIETARY_MARKER`] (case-insensitive), or an empty string when the event
/// has no such question.
///
/// If an event defines the marker twice, the first one in upstream question
/// order wins.
pub fn extract_dietary_value(answers: &[QuestionAnswer]) -> String {
    answers
        .iter()
        .find(|qa| qa.label.to_lowercase().contains(DIETARY_MARKER))
        .map(|qa| qa.answer.trim().to_string())
        .unwrap_or_default()
}
