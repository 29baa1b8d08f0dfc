//! Plain-text review report

use crate::document::StructuredDocument;
use crate::types::TicketType;

const RULE_WIDTH: usize = 70;

/// Render the review report for a document
///
/// Counts are always printed, including zeros, so an empty extraction is
/// visibly empty rather than silently short.
#[must_use]
pub fn summarize(doc: &StructuredDocument) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let metadata = &doc.meeting_metadata;
    let mut lines = vec![
        rule.clone(),
        "EXTRACTED REQUIREMENTS - REVIEW REPORT".to_string(),
        rule.clone(),
        String::new(),
        format!("Meeting Date: {}", metadata.date),
        format!("Attendees: {}", join_or(&metadata.attendees, "Unknown")),
        format!("Duration: {}", metadata.duration),
    ];
    if !metadata.topics.is_empty() {
        lines.push(format!("Topics: {}", metadata.topics.join(", ")));
    }

    lines.push(String::new());
    lines.push(format!("Epics Found: {}", doc.epics.len()));
    lines.push(format!("Total Tickets: {}", doc.ticket_count()));

    for (i, epic) in doc.epics.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {}", i + 1, epic.epic_name));
        lines.push(format!("   Priority: {}", epic.priority));
        lines.push(format!("   Scope: {}", epic.scope));
        lines.push(format!("   Tickets: {}", epic.tickets.len()));
        lines.push(format!("   Tabs: {}", join_or(&epic.tabs, "None")));
        let breakdown: Vec<String> = TicketType::ALL
            .into_iter()
            .map(|ty| (ty, epic.count_of(ty)))
            .filter(|(_, n)| *n > 0)
            .map(|(ty, n)| format!("{ty} x{n}"))
            .collect();
        if !breakdown.is_empty() {
            lines.push(format!("   Breakdown: {}", breakdown.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push(format!("Action Items: {}", doc.action_items.len()));
    for item in &doc.action_items {
        lines.push(format!(
            "   - {} (owner: {}, due: {})",
            item.item, item.owner, item.due_date
        ));
    }

    lines.push(String::new());
    lines.push(format!("Clarifications Needed: {}", doc.clarifications_needed.len()));
    for clarification in &doc.clarifications_needed {
        lines.push(format!("   - {}", clarification.question));
    }

    lines.push(String::new());
    lines.push(rule);
    lines.join("\n")
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionItem, Clarification, Epic, MeetingMetadata, Priority, Scope, Ticket};

    fn epic() -> Epic {
        let ticket = |ticket_type| Ticket {
            ticket_type,
            summary: "s".into(),
            description: String::new(),
            priority: Priority::High,
            details: Default::default(),
        };
        Epic {
            epic_name: "Medication Log".into(),
            epic_description: "d".into(),
            priority: Priority::High,
            scope: Scope::FacilitySpecific,
            tabs: vec!["Active".into(), "History".into()],
            tickets: vec![
                ticket(TicketType::ViewTableData),
                ticket(TicketType::SearchFilter),
                ticket(TicketType::ViewTableData),
            ],
        }
    }

    #[test]
    fn report_lists_epics_and_questions() {
        let doc = StructuredDocument::build(
            MeetingMetadata::default().with_attendees(["Sarah", "Lee"]),
            vec![epic()],
            vec![ActionItem::new("send mockups")],
            vec![Clarification::new("Which columns?", "tabs")],
        );
        let report = summarize(&doc);
        assert!(report.starts_with(&"=".repeat(70)));
        assert!(report.contains("Attendees: Sarah, Lee"));
        assert!(report.contains("1. Medication Log\n   Priority: High"));
        assert!(report.contains("   Tabs: Active, History"));
        assert!(report.contains("Breakdown: view_table_data x2, search_filter x1"));
        assert!(report.contains("   - send mockups (owner: TBD, due: TBD)"));
        assert!(report.contains("Clarifications Needed: 1\n   - Which columns?"));
    }

    #[test]
    fn empty_document_shows_zero_counts() {
        let doc = StructuredDocument::build(MeetingMetadata::default(), vec![], vec![], vec![]);
        let report = summarize(&doc);
        assert!(report.contains("Meeting Date: Unknown"));
        assert!(report.contains("Epics Found: 0"));
        assert!(report.contains("Total Tickets: 0"));
        assert!(report.contains("Action Items: 0"));
        assert!(report.contains("Clarifications Needed: 0"));
    }
}
