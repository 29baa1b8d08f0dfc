//! Ticket batch export and tracker submission
//!
//! An approved document is flattened into a [`TicketBatch`], the file handed
//! to a ticket tracker. Submission goes through the [`TicketTracker`] seam;
//! the in-tree [`DryRunTracker`] never touches the network. A failing ticket
//! is recorded in the [`CreationSummary`] and the rest of the batch carries
//! on.

use crate::config::ScribeConfig;
use crate::document::StructuredDocument;
use crate::error::SubmissionError;
use crate::templates::{self, TemplateContext};
use crate::types::{Clarification, Priority};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const RULE_WIDTH: usize = 70;

/// SHA-256 of transcript text, lowercase hex
#[must_use]
pub fn source_digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// One ticket as handed to the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTicket {
    /// Tracker issue type
    #[serde(rename = "type")]
    pub issue_type: String,
    /// Summary line
    pub summary: String,
    /// Markdown description
    pub description: String,
    /// Priority
    pub priority: Priority,
}

/// Batch-level context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMetadata {
    /// Meeting date the batch was generated from
    pub generated_date: String,
    /// Meeting attendees
    pub meeting_attendees: Vec<String>,
    /// Questions still open at export time
    pub clarifications_needed: Vec<Clarification>,
}

/// Ticket batch file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketBatch {
    /// Tracker project key
    pub project: String,
    /// Transcript the batch came from
    pub source_transcript: String,
    /// SHA-256 of the transcript text
    pub source_digest: String,
    /// Number of tickets
    pub total_tickets: usize,
    /// Epic names, in document order
    pub epics: Vec<String>,
    /// Tickets, in document order
    pub tickets: Vec<BatchTicket>,
    /// Batch-level context
    pub metadata: BatchMetadata,
}

impl TicketBatch {
    /// Flatten a document into a batch
    ///
    /// Tickets whose description was cleared by a hand edit get the
    /// template description back.
    #[must_use]
    pub fn from_document(
        doc: &StructuredDocument,
        source: &str,
        source_text: &str,
        config: &ScribeConfig,
    ) -> Self {
        let mut tickets = Vec::with_capacity(doc.ticket_count());
        for epic in &doc.epics {
            let ctx = TemplateContext {
                epic: &epic.epic_name,
                scope: epic.scope,
                nav_parent: &config.nav_parent,
            };
            for ticket in &epic.tickets {
                let description = if ticket.description.trim().is_empty() {
                    templates::description(ticket.ticket_type, &ticket.details, ctx)
                } else {
                    ticket.description.clone()
                };
                tickets.push(BatchTicket {
                    issue_type: config.issue_type.clone(),
                    summary: ticket.summary.clone(),
                    description,
                    priority: ticket.priority,
                });
            }
        }

        Self {
            project: config.project_key.clone(),
            source_transcript: source.to_string(),
            source_digest: source_digest(source_text),
            total_tickets: tickets.len(),
            epics: doc.epics.iter().map(|e| e.epic_name.clone()).collect(),
            tickets,
            metadata: BatchMetadata {
                generated_date: doc.meeting_metadata.date.clone(),
                meeting_attendees: doc.meeting_metadata.attendees.clone(),
                clarifications_needed: doc.clarifications_needed.clone(),
            },
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a batch file
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Human-readable preview of what would be created
    #[must_use]
    pub fn preview(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = format!("{rule}\nTICKET PREVIEW ({} tickets)\n{rule}\n", self.tickets.len());
        for (i, ticket) in self.tickets.iter().enumerate() {
            out.push_str(&format!(
                "\n{}. [{}] {}\n   {}\n   Description length: {} chars\n",
                i + 1,
                ticket.priority,
                ticket.issue_type,
                ticket.summary,
                ticket.description.chars().count()
            ));
        }
        out
    }
}

/// Seam to an external ticket tracker
pub trait TicketTracker {
    /// Create one issue, returning its key
    fn create_issue(
        &mut self,
        project: &str,
        ticket: &BatchTicket,
        epic_key: Option<&str>,
    ) -> Result<String, SubmissionError>;
}

/// Tracker that only hands out keys
#[derive(Debug, Clone, Default)]
pub struct DryRunTracker {
    issued: Vec<String>,
}

impl DryRunTracker {
    /// Create tracker
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys issued so far
    #[inline]
    #[must_use]
    pub fn issued(&self) -> &[String] {
        &self.issued
    }
}

impl TicketTracker for DryRunTracker {
    fn create_issue(
        &mut self,
        project: &str,
        ticket: &BatchTicket,
        epic_key: Option<&str>,
    ) -> Result<String, SubmissionError> {
        if ticket.summary.trim().is_empty() {
            return Err(SubmissionError::Rejected("summary is empty".to_string()));
        }
        let key = format!("{project}-DRY-{}", self.issued.len() + 1);
        tracing::debug!(%key, epic = epic_key.unwrap_or("-"), "dry-run issue created");
        self.issued.push(key.clone());
        Ok(key)
    }
}

/// Ticket that was created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTicket {
    /// Ticket summary
    pub summary: String,
    /// Tracker key
    pub key: String,
}

/// Ticket that could not be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTicket {
    /// Ticket summary
    pub summary: String,
    /// Failure reason
    pub error: String,
}

/// Outcome of submitting a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationSummary {
    /// Created tickets, in batch order
    pub created: Vec<CreatedTicket>,
    /// Failed tickets, in batch order
    pub failed: Vec<FailedTicket>,
    /// Tickets attempted
    pub total: usize,
}

impl CreationSummary {
    /// Whether every ticket was created
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.created.len() == self.total
    }

    /// Plain-text summary block
    #[must_use]
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = format!(
            "{rule}\nCREATION SUMMARY\n{rule}\nCreated: {}\nFailed: {}\nTotal: {}\n",
            self.created.len(),
            self.failed.len(),
            self.total
        );
        if !self.failed.is_empty() {
            out.push_str("\nFailed tickets:\n");
            for failed in &self.failed {
                out.push_str(&format!("  - {}\n    Error: {}\n", failed.summary, failed.error));
            }
        }
        out
    }
}

/// Submit every ticket of a batch, isolating failures per ticket
pub fn submit_batch<T>(batch: &TicketBatch, tracker: &mut T, epic_key: Option<&str>) -> CreationSummary
where
    T: TicketTracker + ?Sized,
{
    let mut summary = CreationSummary {
        total: batch.tickets.len(),
        ..CreationSummary::default()
    };
    for (i, ticket) in batch.tickets.iter().enumerate() {
        match tracker.create_issue(&batch.project, ticket, epic_key) {
            Ok(key) => {
                tracing::info!(n = i + 1, total = summary.total, %key, "ticket created");
                summary.created.push(CreatedTicket {
                    summary: ticket.summary.clone(),
                    key,
                });
            }
            Err(err) => {
                tracing::warn!(n = i + 1, total = summary.total, error = %err, "ticket failed");
                summary.failed.push(FailedTicket {
                    summary: ticket.summary.clone(),
                    error: err.to_string(),
                });
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Epic, MeetingMetadata, Scope, Ticket, TicketDetails, TicketType};

    fn doc() -> StructuredDocument {
        let ticket = |ticket_type, summary: &str, description: &str| Ticket {
            ticket_type,
            summary: summary.to_string(),
            description: description.to_string(),
            priority: Priority::High,
            details: TicketDetails::default(),
        };
        StructuredDocument::build(
            MeetingMetadata::default()
                .with_date("2024-03-05")
                .with_attendees(["Sarah"]),
            vec![Epic {
                epic_name: "Wound Care".into(),
                epic_description: "d".into(),
                priority: Priority::High,
                scope: Scope::FacilitySpecific,
                tabs: vec![],
                tickets: vec![
                    ticket(TicketType::RbacPermissions, "RBAC", "Roles"),
                    ticket(TicketType::NavMenu, "Nav", ""),
                    ticket(TicketType::Download, "", "Export"),
                ],
            }],
            vec![],
            vec![Clarification::new("Which roles?", "ctx")],
        )
    }

    #[test]
    fn digest_is_sha256_hex() {
        assert_eq!(
            source_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn batch_flattens_document() {
        let batch = TicketBatch::from_document(&doc(), "meeting.txt", "abc", &ScribeConfig::default());
        assert_eq!(batch.project, "VDB");
        assert_eq!(batch.total_tickets, 3);
        assert_eq!(batch.epics, vec!["Wound Care"]);
        assert_eq!(batch.metadata.generated_date, "2024-03-05");
        assert_eq!(batch.metadata.clarifications_needed.len(), 1);
        assert!(batch.tickets.iter().all(|t| t.issue_type == "Story"));
        assert_eq!(batch.tickets[0].description, "Roles");
        assert!(batch.tickets[1].description.contains("Clinical"));

        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["tickets"][0]["type"], "Story");
        assert_eq!(TicketBatch::from_json(&batch.to_json().unwrap()).unwrap(), batch);
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let batch = TicketBatch::from_document(&doc(), "m.txt", "", &ScribeConfig::default());
        let mut tracker = DryRunTracker::new();
        let summary = submit_batch(&batch, &mut tracker, Some("VDB-1"));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.created.len(), 2);
        assert_eq!(summary.created[1].key, "VDB-DRY-2");
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].error.contains("summary is empty"));
        assert!(!summary.is_complete());

        let text = summary.render();
        assert!(text.contains("CREATION SUMMARY\n"));
        assert!(text.contains("Created: 2\nFailed: 1\nTotal: 3\n"));
    }

    #[test]
    fn preview_lists_each_ticket() {
        let batch = TicketBatch::from_document(&doc(), "m.txt", "", &ScribeConfig::default());
        let preview = batch.preview();
        assert!(preview.contains("TICKET PREVIEW (3 tickets)"));
        assert!(preview.contains("\n1. [High] Story\n   RBAC\n   Description length: 5 chars\n"));
    }
}
