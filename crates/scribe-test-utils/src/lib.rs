//! Testing utilities for the Scribe workspace
//!
//! Shared transcripts, pipeline helpers and tracker doubles.

#![allow(missing_docs)]

use once_cell::sync::Lazy;
use scribe_core::{
    BatchTicket, Epic, Scribe, ScribeConfig, StructuredDocument, SubmissionError, TicketTracker,
    TicketType,
};

/// Two tabs and one access rule, no columns or fields
pub const MEDICATION_LOG: &str = "Sarah: We need a Medication Log with Active and History tabs.\n\
Lee: Nurses should be able to view medications.";

/// A field list with no feature name
pub const FIELD_LIST: &str = "fields: Patient Name (mandatory), Notes (optional, large text)";

/// Small talk only
pub const NO_REQUIREMENTS: &str = "Sarah: Morning everyone.\nLee: Morning! How was the weekend?";

/// Header, several speakers, stories, fields, backend work, a priority
/// signal and an owned action item
pub const WOUND_CARE: &str = "Date: 2024-03-05
Attendees: Sarah Chen, Lee Park
Duration: 45 minutes
Topics: Wound care

Sarah Chen (Product): Epic: Wound Care.
Sarah Chen (Product): Nurses should be able to add a new wound assessment for a patient.
Lee Park (Engineering): Nurses can edit assessments. Users can export the list.
Sarah Chen: Fields: Size (number), Stage (dropdown).
Lee Park: Data should be stored in the database.
Sarah Chen: This is urgent.
Action item: Lee will send the mockups by Friday.
";

/// Three features in one meeting
pub const THREE_FEATURES: &str =
    "Epic: Wound Care. Tabs: Open, Closed. Epic: Lab Orders. Tabs: Pending. Epic: Vitals. Tabs: Today";

static SHARED: Lazy<Scribe> = Lazy::new(scribe);

pub fn scribe() -> Scribe {
    Scribe::new(ScribeConfig::default()).unwrap()
}

/// Default pipeline, compiled once per test binary
pub fn shared() -> &'static Scribe {
    &SHARED
}

pub fn process(text: &str) -> StructuredDocument {
    shared().process_text(text)
}

pub fn questions(doc: &StructuredDocument) -> Vec<&str> {
    doc.clarifications_needed
        .iter()
        .map(|c| c.question.as_str())
        .collect()
}

pub fn ticket_types(epic: &Epic) -> Vec<TicketType> {
    epic.tickets.iter().map(|t| t.ticket_type).collect()
}

/// Tracker that fails chosen calls, 0-based, and counts every attempt
#[derive(Debug, Default)]
pub struct FailingTracker {
    fail_on: Vec<usize>,
    pub attempts: usize,
    pub created: Vec<String>,
}

impl FailingTracker {
    pub fn failing_on(calls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_on: calls.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl TicketTracker for FailingTracker {
    fn create_issue(
        &mut self,
        project: &str,
        ticket: &BatchTicket,
        _epic_key: Option<&str>,
    ) -> Result<String, SubmissionError> {
        let call = self.attempts;
        self.attempts += 1;
        if self.fail_on.contains(&call) {
            return Err(SubmissionError::Unavailable(format!("call {call} refused")));
        }
        let key = format!("{project}-{}", self.created.len() + 100);
        self.created.push(ticket.summary.clone());
        Ok(key)
    }
}
