//! Human review checkpoint
//!
//! Nothing is exported until a reviewer approves. The session moves through
//! a small state machine:
//!
//! ```text
//! Extracted -> AwaitingReview -> Approved
//!                    |   ^    \-> Cancelled
//!                    v   |
//!                   Editing -> Cancelled
//! ```
//!
//! Approved and Cancelled are terminal. A cancelled session drops its
//! document.

use crate::document::StructuredDocument;
use crate::error::{CheckpointError, ScribeError};
use crate::summary;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Review session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Document produced, not yet shown
    Extracted,
    /// Report shown, waiting for a decision
    AwaitingReview,
    /// Reviewer is editing the document
    Editing,
    /// Approved for export
    Approved,
    /// Cancelled, nothing is exported
    Cancelled,
}

impl ReviewState {
    /// Whether no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        allowed_transitions(self).is_empty()
    }
}

/// Validate a state transition
pub fn validate_transition(from: ReviewState, to: ReviewState) -> Result<(), CheckpointError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CheckpointError::IllegalTransition { from, to })
    }
}

/// States reachable from a state
#[must_use]
pub fn allowed_transitions(from: ReviewState) -> Vec<ReviewState> {
    use ReviewState::*;
    match from {
        Extracted => vec![AwaitingReview],
        AwaitingReview => vec![Approved, Cancelled, Editing],
        Editing => vec![AwaitingReview, Cancelled],
        Approved => vec![],
        Cancelled => vec![],
    }
}

/// Reviewer decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Approve and continue to export
    Proceed,
    /// Abort the run
    Cancel,
    /// Edit the document before deciding
    Edit,
}

impl Decision {
    /// Target state of the decision
    #[inline]
    #[must_use]
    pub fn target(self) -> ReviewState {
        match self {
            Self::Proceed => ReviewState::Approved,
            Self::Cancel => ReviewState::Cancelled,
            Self::Edit => ReviewState::Editing,
        }
    }
}

impl FromStr for Decision {
    type Err = CheckpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "proceed" => Ok(Self::Proceed),
            "no" | "n" | "cancel" => Ok(Self::Cancel),
            "edit" | "e" => Ok(Self::Edit),
            other => Err(CheckpointError::UnknownDecision(other.to_string())),
        }
    }
}

/// One review of one document
#[derive(Debug, Clone)]
pub struct ReviewSession {
    state: ReviewState,
    document: Option<StructuredDocument>,
    report: String,
    revisions: u32,
}

impl ReviewSession {
    /// Start a session for a freshly extracted document
    #[must_use]
    pub fn new(document: StructuredDocument) -> Self {
        Self {
            state: ReviewState::Extracted,
            document: Some(document),
            report: String::new(),
            revisions: 0,
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ReviewState {
        self.state
    }

    /// Document under review, `None` once cancelled
    #[inline]
    #[must_use]
    pub fn document(&self) -> Option<&StructuredDocument> {
        self.document.as_ref()
    }

    /// Number of accepted edits
    #[inline]
    #[must_use]
    pub fn revisions(&self) -> u32 {
        self.revisions
    }

    /// Render the review report and wait for a decision
    pub fn present(&mut self) -> Result<&str, CheckpointError> {
        self.transition(ReviewState::AwaitingReview)?;
        let doc = self
            .document
            .as_ref()
            .ok_or(CheckpointError::NoDocument(self.state))?;
        self.report = summary::summarize(doc);
        Ok(&self.report)
    }

    /// Last rendered report
    #[inline]
    #[must_use]
    pub fn report(&self) -> &str {
        &self.report
    }

    /// Apply a reviewer decision
    pub fn decide(&mut self, decision: Decision) -> Result<ReviewState, CheckpointError> {
        self.transition(decision.target())?;
        if self.state == ReviewState::Cancelled {
            self.document = None;
        }
        tracing::info!(state = ?self.state, "review decision applied");
        Ok(self.state)
    }

    /// Replace the document with an edited one and present it again
    pub fn resubmit(&mut self, document: StructuredDocument) -> Result<&str, CheckpointError> {
        if self.state != ReviewState::Editing {
            return Err(CheckpointError::IllegalTransition {
                from: self.state,
                to: ReviewState::AwaitingReview,
            });
        }
        self.document = Some(document);
        self.revisions += 1;
        self.present()
    }

    /// Re-ingest edited JSON and present it again
    ///
    /// On a schema violation the session stays in `Editing`.
    pub fn resubmit_json(&mut self, json: &str) -> Result<&str, ScribeError> {
        if self.state != ReviewState::Editing {
            return Err(CheckpointError::IllegalTransition {
                from: self.state,
                to: ReviewState::AwaitingReview,
            }
            .into());
        }
        let document = StructuredDocument::from_json(json)?;
        Ok(self.resubmit(document)?)
    }

    /// The approved document
    pub fn approved(&self) -> Result<&StructuredDocument, CheckpointError> {
        if self.state != ReviewState::Approved {
            return Err(CheckpointError::NoDocument(self.state));
        }
        self.document
            .as_ref()
            .ok_or(CheckpointError::NoDocument(self.state))
    }

    /// Take the approved document
    pub fn into_approved(self) -> Result<StructuredDocument, CheckpointError> {
        match (self.state, self.document) {
            (ReviewState::Approved, Some(doc)) => Ok(doc),
            (state, _) => Err(CheckpointError::NoDocument(state)),
        }
    }

    fn transition(&mut self, to: ReviewState) -> Result<(), CheckpointError> {
        validate_transition(self.state, to)?;
        tracing::debug!(from = ?self.state, to = ?to, "review transition");
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeetingMetadata;

    fn doc() -> StructuredDocument {
        StructuredDocument::build(MeetingMetadata::default(), vec![], vec![], vec![])
    }

    #[test]
    fn valid_transitions() {
        use ReviewState::*;
        assert!(validate_transition(Extracted, AwaitingReview).is_ok());
        assert!(validate_transition(AwaitingReview, Approved).is_ok());
        assert!(validate_transition(AwaitingReview, Editing).is_ok());
        assert!(validate_transition(Editing, AwaitingReview).is_ok());
        assert!(validate_transition(Editing, Cancelled).is_ok());
    }

    #[test]
    fn invalid_transitions() {
        use ReviewState::*;
        assert_eq!(
            validate_transition(Extracted, Approved),
            Err(CheckpointError::IllegalTransition {
                from: Extracted,
                to: Approved
            })
        );
        assert!(validate_transition(Editing, Approved).is_err());
        assert!(validate_transition(Approved, AwaitingReview).is_err());
        assert!(Approved.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Editing.is_terminal());
    }

    #[test]
    fn decision_tokens() {
        assert_eq!("YES".parse::<Decision>(), Ok(Decision::Proceed));
        assert_eq!(" n ".parse::<Decision>(), Ok(Decision::Cancel));
        assert_eq!("edit".parse::<Decision>(), Ok(Decision::Edit));
        assert_eq!(
            "maybe".parse::<Decision>(),
            Err(CheckpointError::UnknownDecision("maybe".into()))
        );
    }

    #[test]
    fn cannot_decide_before_presenting() {
        let mut session = ReviewSession::new(doc());
        assert!(session.decide(Decision::Proceed).is_err());
        assert_eq!(session.state(), ReviewState::Extracted);
        assert!(session.approved().is_err());
    }

    #[test]
    fn approve_flow() {
        let mut session = ReviewSession::new(doc());
        let report = session.present().unwrap().to_string();
        assert!(report.contains("REVIEW REPORT"));
        assert_eq!(session.decide(Decision::Proceed), Ok(ReviewState::Approved));
        assert!(session.approved().is_ok());
        assert!(session.into_approved().is_ok());
    }

    #[test]
    fn cancel_drops_document() {
        let mut session = ReviewSession::new(doc());
        session.present().unwrap();
        session.decide(Decision::Cancel).unwrap();
        assert!(session.document().is_none());
        assert!(session.present().is_err());
    }

    #[test]
    fn edit_then_resubmit() {
        let mut session = ReviewSession::new(doc());
        session.present().unwrap();
        session.decide(Decision::Edit).unwrap();

        let err = session.resubmit_json("{\"epics\": []}").unwrap_err();
        assert!(err.requires_human());
        assert_eq!(session.state(), ReviewState::Editing);

        let mut edited = doc();
        edited.meeting_metadata.date = "2024-03-05".into();
        let json = edited.to_json().unwrap();
        let report = session.resubmit_json(&json).unwrap();
        assert!(report.contains("Meeting Date: 2024-03-05"));
        assert_eq!(session.state(), ReviewState::AwaitingReview);
        assert_eq!(session.revisions(), 1);
    }

    #[test]
    fn resubmit_requires_editing() {
        let mut session = ReviewSession::new(doc());
        session.present().unwrap();
        assert!(session.resubmit(doc()).is_err());
        assert_eq!(session.revisions(), 0);
    }
}
