//! Review checkpoint driven through the public API

use scribe_core::{Decision, ReviewState, ScribeError, Transcript};
use scribe_test_utils::*;
use serde_json::Value;

#[test]
fn approve_then_export() {
    let scribe = shared();
    let transcript = Transcript::new(MEDICATION_LOG).with_source("standup.txt");
    let mut review = scribe.review(scribe.process(&transcript));

    let report = review.present().unwrap().to_string();
    assert!(report.contains("1. Medication Log"));
    assert!(report.contains("Tabs: Active, History"));
    assert!(report.contains("Total Tickets: 5"));

    assert_eq!(review.decide("yes".parse().unwrap()).unwrap(), ReviewState::Approved);
    let doc = review.into_approved().unwrap();
    let batch = scribe.batch(&doc, &transcript);
    assert_eq!(batch.total_tickets, 5);
    assert_eq!(batch.epics, vec!["Medication Log"]);
    assert_eq!(batch.source_transcript, "standup.txt");
}

#[test]
fn cancel_exports_nothing() {
    let mut review = shared().review(process(FIELD_LIST));
    review.present().unwrap();
    assert_eq!(review.decide(Decision::Cancel).unwrap(), ReviewState::Cancelled);
    assert!(review.document().is_none());
    assert!(review.approved().is_err());
    assert!(review.decide(Decision::Proceed).is_err());
}

#[test]
fn edited_document_is_revalidated() {
    let mut review = shared().review(process(MEDICATION_LOG));
    review.present().unwrap();
    review.decide(Decision::Edit).unwrap();

    let mut value: Value =
        serde_json::from_str(&review.document().unwrap().to_json().unwrap()).unwrap();

    // An unknown priority is rejected with its path and the session keeps editing
    value["epics"][0]["tickets"][1]["priority"] = "Sometime".into();
    let err = review.resubmit_json(&value.to_string()).unwrap_err();
    match &err {
        ScribeError::Schema(schema) => assert_eq!(schema.path(), "epics[0].tickets[1].priority"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.requires_human());
    assert_eq!(review.state(), ReviewState::Editing);

    value["epics"][0]["tickets"][1]["priority"] = "Low".into();
    value["epics"][0]["epic_name"] = "Medication Record".into();
    let report = review.resubmit_json(&value.to_string()).unwrap();
    assert!(report.contains("1. Medication Record"));
    assert_eq!(review.revisions(), 1);

    review.decide(Decision::Proceed).unwrap();
    let doc = review.into_approved().unwrap();
    assert_eq!(doc.epics[0].tickets[1].priority.as_str(), "Low");
}

#[test]
fn resume_renders_cleared_text() {
    let doc = process(MEDICATION_LOG);
    let mut value: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    value["epics"][0]["tickets"][0]["description"] = "".into();
    value["epics"][0]["tickets"][0]["summary"] = "".into();

    let resumed = shared().resume(&value.to_string()).unwrap();
    assert_eq!(resumed, doc);
}

#[test]
fn resume_rejects_missing_keys() {
    let err = shared().resume(r#"{"meeting_metadata": {"date": "Unknown", "attendees": []}}"#).unwrap_err();
    match err {
        ScribeError::Schema(schema) => assert_eq!(schema.path(), "epics"),
        other => panic!("unexpected error: {other}"),
    }
}
