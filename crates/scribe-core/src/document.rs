//! Structured document assembly and (de)serialization

use crate::config::ScribeConfig;
use crate::error::SchemaError;
use crate::schema;
use crate::templates::{self, TemplateContext};
use crate::types::{ActionItem, Clarification, Epic, MeetingMetadata};
use serde::{Deserialize, Serialize};

/// The reviewable artifact: metadata, epics, action items and open questions
///
/// Serializes with the keys `meeting_metadata`, `epics`, `action_items` and
/// `clarifications_needed`, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// Meeting metadata
    pub meeting_metadata: MeetingMetadata,
    /// Epics with their tickets
    pub epics: Vec<Epic>,
    /// Follow-ups
    pub action_items: Vec<ActionItem>,
    /// Questions for the reviewer
    pub clarifications_needed: Vec<Clarification>,
}

impl StructuredDocument {
    /// Assemble a document
    #[must_use]
    pub fn build(
        meeting_metadata: MeetingMetadata,
        epics: Vec<Epic>,
        action_items: Vec<ActionItem>,
        clarifications_needed: Vec<Clarification>,
    ) -> Self {
        Self {
            meeting_metadata,
            epics,
            action_items,
            clarifications_needed,
        }
    }

    /// Total tickets across all epics
    #[must_use]
    pub fn ticket_count(&self) -> usize {
        self.epics.iter().map(|e| e.tickets.len()).sum()
    }

    /// Epic by name, case-insensitive
    #[must_use]
    pub fn epic(&self, name: &str) -> Option<&Epic> {
        self.epics.iter().find(|e| e.epic_name.eq_ignore_ascii_case(name))
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a possibly hand-edited document
    ///
    /// Rejects the whole document on the first structural problem; nothing is
    /// partially accepted.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        schema::parse(text)
    }

    /// Render summaries and descriptions left empty by a hand edit
    ///
    /// Returns the number of tickets filled in.
    pub fn fill_missing_text(&mut self, config: &ScribeConfig) -> usize {
        let mut filled = 0;
        for epic in &mut self.epics {
            let ctx = TemplateContext {
                epic: &epic.epic_name,
                scope: epic.scope,
                nav_parent: &config.nav_parent,
            };
            for ticket in &mut epic.tickets {
                let mut touched = false;
                if ticket.summary.trim().is_empty() {
                    ticket.summary = templates::summary(ticket.ticket_type, &ticket.details, ctx);
                    touched = true;
                }
                if ticket.description.trim().is_empty() {
                    ticket.description =
                        templates::description(ticket.ticket_type, &ticket.details, ctx);
                    touched = true;
                }
                filled += usize::from(touched);
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, Scope, Ticket, TicketDetails, TicketType};
    use pretty_assertions::assert_eq;

    fn sample() -> StructuredDocument {
        let ticket = Ticket {
            ticket_type: TicketType::NavMenu,
            summary: String::new(),
            description: String::new(),
            priority: Priority::High,
            details: TicketDetails::default(),
        };
        StructuredDocument::build(
            MeetingMetadata::default(),
            vec![Epic {
                epic_name: "Wound Care".into(),
                epic_description: "Feature for Wound Care".into(),
                priority: Priority::Medium,
                scope: Scope::Global,
                tabs: vec![],
                tickets: vec![ticket],
            }],
            vec![ActionItem::new("send mockups")],
            vec![],
        )
    }

    #[test]
    fn json_keys_in_document_order() {
        let json = sample().to_json().unwrap();
        let positions: Vec<usize> = ["meeting_metadata", "epics", "action_items", "clarifications_needed"]
            .iter()
            .map(|k| json.find(&format!("\"{k}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn round_trip_through_validation() {
        let doc = sample();
        let back = StructuredDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn missing_text_is_rendered() {
        let mut doc = sample();
        let filled = doc.fill_missing_text(&ScribeConfig::default());
        assert_eq!(filled, 1);
        let ticket = &doc.epics[0].tickets[0];
        assert_eq!(
            ticket.summary,
            "FE: User should be able to view a new menu \"Wound Care\" under \"Clinical\" in nav panel"
        );
        assert!(ticket.description.contains("Clinical"));
        assert_eq!(doc.fill_missing_text(&ScribeConfig::default()), 0);
        assert_eq!(doc.ticket_count(), 1);
        assert!(doc.epic("wound care").is_some());
    }
}
