//! Pipeline invariants

use proptest::prelude::*;
use scribe_core::segment::segment;
use scribe_core::{ScribeConfig, StructuredDocument, TicketType};
use scribe_test_utils::*;

const TABS: &[&str] = &["Open", "Closed", "Pending", "Draft", "Signed"];
const COLUMNS: &[&str] = &["Drug", "Site", "Stage", "Width", "Owner"];
const EPICS: &[&str] = &["Wound Care", "Lab Orders", "Vitals"];

fn pick(pool: &[&str], count: usize) -> Vec<String> {
    pool.iter().take(count).map(|s| (*s).to_string()).collect()
}

#[test]
fn processing_is_deterministic() {
    for text in [MEDICATION_LOG, FIELD_LIST, WOUND_CARE, THREE_FEATURES, NO_REQUIREMENTS] {
        let first = process(text).to_json().unwrap();
        let second = scribe().process_text(text).to_json().unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn documents_survive_a_json_round_trip() {
    for text in [MEDICATION_LOG, FIELD_LIST, WOUND_CARE, THREE_FEATURES, ""] {
        let doc = process(text);
        let back = StructuredDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }
}

#[test]
fn unstated_priorities_come_from_the_table() {
    let config = ScribeConfig::default();
    for text in [MEDICATION_LOG, FIELD_LIST] {
        let doc = process(text);
        for epic in &doc.epics {
            assert_eq!(epic.priority, config.default_epic_priority);
            for ticket in &epic.tickets {
                assert_eq!(ticket.priority, config.priority_defaults.get(ticket.ticket_type));
            }
        }
    }
}

proptest! {
    #[test]
    fn two_tickets_per_tab_plus_structure(tab_count in 0..=TABS.len(), with_rbac in any::<bool>()) {
        let tabs = pick(TABS, tab_count);
        let mut text = String::from("Epic: Wound Care. Columns: Drug (text), Dose (number).");
        if !tabs.is_empty() {
            text.push_str(&format!(" Tabs: {}.", tabs.join(", ")));
        }
        if with_rbac {
            text.push_str(" Nurses can view records.");
        }
        let doc = process(&text);
        let epic = &doc.epics[0];

        prop_assert_eq!(&epic.tabs, &tabs);
        prop_assert_eq!(epic.tickets.len(), 2 * tab_count + usize::from(with_rbac));
        prop_assert_eq!(epic.count_of(TicketType::ViewTableData), tab_count);
        prop_assert_eq!(epic.count_of(TicketType::SearchFilter), tab_count);
    }

    #[test]
    fn every_ambiguous_epic_gets_its_own_question(epic_count in 1..=EPICS.len()) {
        let text = pick(EPICS, epic_count)
            .iter()
            .map(|name| format!("Epic: {name}. Fields: Notes. Columns: Site."))
            .collect::<Vec<_>>()
            .join(" ");
        let doc = process(&text);
        let asked = questions(&doc);

        prop_assert_eq!(doc.epics.len(), epic_count);
        for epic in &doc.epics {
            let field = format!("Field 'Notes' in '{}'", epic.epic_name);
            let column = format!("Column 'Site' in '{}'", epic.epic_name);
            prop_assert_eq!(asked.iter().filter(|q| q.starts_with(&field)).count(), 1);
            prop_assert_eq!(asked.iter().filter(|q| q.starts_with(&column)).count(), 1);
        }
    }

    #[test]
    fn one_question_per_unformatted_column(column_count in 1..=COLUMNS.len(), repeat in any::<bool>()) {
        let columns = pick(COLUMNS, column_count).join(", ");
        let mut text = format!("Epic: Wound Care. Columns: {columns}.");
        if repeat {
            text.push_str(&format!(" The columns are {columns}."));
        }
        let doc = process(&text);
        let asked = questions(&doc)
            .into_iter()
            .filter(|q| q.starts_with("Column '"))
            .count();
        prop_assert_eq!(asked, column_count);
    }

    #[test]
    fn segments_are_indexed_and_non_empty(text in "[A-Za-z ,.!?:()\n]{0,200}") {
        let units = segment(&text);
        for (i, unit) in units.iter().enumerate() {
            prop_assert_eq!(unit.index, i);
            prop_assert!(!unit.text.trim().is_empty());
        }
    }

    #[test]
    fn arbitrary_text_never_panics(text in "\\PC{0,300}") {
        let doc = process(&text);
        prop_assert!(!doc.epics.is_empty() || !doc.clarifications_needed.is_empty());
    }

    #[test]
    fn arbitrary_lines_produce_valid_documents(
        lines in proptest::collection::vec(
            prop_oneof![
                Just("Epic: Wound Care".to_string()),
                Just("Sarah: Nurses should be able to add a new wound note".to_string()),
                Just("Lee: Tabs: Open, Closed".to_string()),
                Just("Columns: Drug, Dose (number)".to_string()),
                Just("Fields: Size (number), Stage (dropdown)".to_string()),
                Just("Only admins can delete notes".to_string()),
                Just("This is low priority".to_string()),
                Just("Action item: Lee will send the mockups by Friday".to_string()),
                "[a-z ]{0,40}",
            ],
            0..12,
        )
    ) {
        let doc = process(&lines.join("\n"));
        let back = StructuredDocument::from_json(&doc.to_json().unwrap()).unwrap();
        prop_assert_eq!(back, doc);
    }
}
